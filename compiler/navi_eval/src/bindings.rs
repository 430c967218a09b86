//! Transient name bindings layered over a scope.
//!
//! A call binds its parameters and a `match` arm binds its `as` name in a
//! small overlay that lives on the evaluator's stack and is dropped when the
//! call or arm returns. Overlays chain to their parent overlay, never into
//! the scope, so the registry is never mutated.

use navi_ir::Name;
use navi_types::TypeValue;
use smallvec::SmallVec;

#[derive(Debug, Default)]
pub struct Bindings<'a> {
    parent: Option<&'a Bindings<'a>>,
    values: SmallVec<[(Name, TypeValue); 4]>,
}

impl<'a> Bindings<'a> {
    /// An empty root overlay.
    pub fn new() -> Self {
        Bindings::default()
    }

    /// An overlay whose lookups fall back to `self`.
    pub fn child(&self) -> Bindings<'_> {
        Bindings {
            parent: Some(self),
            values: SmallVec::new(),
        }
    }

    /// Bind `name`, shadowing any earlier binding of it.
    pub fn bind(&mut self, name: Name, value: TypeValue) {
        self.values.push((name, value));
    }

    #[must_use]
    pub fn with(mut self, name: Name, value: TypeValue) -> Self {
        self.bind(name, value);
        self
    }

    pub fn get(&self, name: Name) -> Option<&TypeValue> {
        let mut frame = self;
        loop {
            if let Some((_, value)) = frame.values.iter().rev().find(|(bound, _)| *bound == name) {
                return Some(value);
            }
            frame = frame.parent?;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.parent.map_or(true, Bindings::is_empty)
    }
}
