//! The definition registry.
//!
//! A [`Scope`] maps names to [`Definition`]s in declaration order. It is
//! assembled by a [`ScopeBuilder`], which rejects duplicate names, and is
//! immutable afterwards: cloning is an `Arc` bump and a scope can be read
//! from any number of threads at once.
//!
//! Scopes may be layered. A child scope looks names up in its own
//! definitions first and then in its parent, so user definitions can be
//! checked on top of the global prelude without copying it.

use std::fmt;
use std::sync::Arc;

use navi_ir::{Expr, Item, ItemKind, Name, ParamDecl, SharedInterner};
use navi_types::{ScopeId, TypeValue};
use rustc_hash::FxHashMap;

use crate::{EvalError, EvalResult};

/// Native implementation of a builtin function.
///
/// Receives the arguments already narrowed to the declared parameter types
/// and returns the result type. Numeric rules may over-approximate.
#[derive(Copy, Clone)]
pub struct NativeRule(pub fn(&[TypeValue]) -> TypeValue);

impl NativeRule {
    #[inline]
    pub fn apply(self, args: &[TypeValue]) -> TypeValue {
        (self.0)(args)
    }
}

impl fmt::Debug for NativeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NativeRule(..)")
    }
}

/// A named declaration.
#[derive(Clone, Debug)]
pub enum Definition {
    /// Only usable as a bound name; has no value on its own.
    Parameter { name: Name, ty: Option<Arc<Expr>> },
    /// A named constant expression.
    Variable { name: Name, value: Arc<Expr> },
    /// A structural record type with ordered, typed fields.
    Struct {
        name: Name,
        fields: Arc<[ParamDecl]>,
    },
    /// A function implemented natively.
    BuiltinFunction {
        name: Name,
        params: Arc<[ParamDecl]>,
        rule: NativeRule,
    },
    /// A function whose result is its body evaluated with the parameters bound.
    Function {
        name: Name,
        params: Arc<[ParamDecl]>,
        body: Arc<Expr>,
    },
}

impl Definition {
    pub fn name(&self) -> Name {
        match self {
            Definition::Parameter { name, .. }
            | Definition::Variable { name, .. }
            | Definition::Struct { name, .. }
            | Definition::BuiltinFunction { name, .. }
            | Definition::Function { name, .. } => *name,
        }
    }

    /// Human-readable kind, e.g. for listings.
    pub fn kind(&self) -> &'static str {
        match self {
            Definition::Parameter { .. } => "parameter",
            Definition::Variable { .. } => "variable",
            Definition::Struct { .. } => "struct",
            Definition::BuiltinFunction { .. } => "builtin-function",
            Definition::Function { .. } => "function",
        }
    }

    /// Declared parameters of a function or builtin.
    pub fn params(&self) -> Option<&[ParamDecl]> {
        match self {
            Definition::BuiltinFunction { params, .. } | Definition::Function { params, .. } => {
                Some(params)
            }
            _ => None,
        }
    }
}

impl From<Item> for Definition {
    fn from(item: Item) -> Self {
        match item.kind {
            ItemKind::Struct { name, fields } => Definition::Struct {
                name,
                fields: fields.into(),
            },
            ItemKind::Let { name, value } => Definition::Variable {
                name,
                value: Arc::new(value),
            },
            ItemKind::Def { name, params, body } => Definition::Function {
                name,
                params: params.into(),
                body: Arc::new(body),
            },
        }
    }
}

struct ScopeData {
    interner: SharedInterner,
    parent: Option<Scope>,
    definitions: Vec<Definition>,
    index: FxHashMap<Name, usize>,
}

/// An immutable, shareable registry of definitions.
#[derive(Clone)]
pub struct Scope {
    data: Arc<ScopeData>,
}

impl Scope {
    /// Look `name` up here and then in the parent chain.
    pub fn get(&self, name: Name) -> EvalResult<&Definition> {
        self.resolve(name)
            .map(|(_, definition)| definition)
            .ok_or_else(|| EvalError::UndefinedName {
                name: self.interner().lookup(name).to_owned(),
            })
    }

    /// Look `name` up and return it with the scope that declares it.
    ///
    /// Definitions are evaluated in their declaring scope, so a child
    /// scope cannot change what a parent definition refers to.
    pub fn resolve(&self, name: Name) -> Option<(&Scope, &Definition)> {
        let mut scope = self;
        loop {
            if let Some(&index) = scope.data.index.get(&name) {
                return Some((scope, &scope.data.definitions[index]));
            }
            scope = scope.data.parent.as_ref()?;
        }
    }

    pub fn has(&self, name: Name) -> bool {
        self.resolve(name).is_some()
    }

    /// A definition declared in this scope itself, ignoring parents.
    pub fn own(&self, name: Name) -> Option<&Definition> {
        let index = *self.data.index.get(&name)?;
        Some(&self.data.definitions[index])
    }

    /// This scope followed by its parents, innermost first.
    pub fn ancestors(&self) -> impl Iterator<Item = &Scope> + '_ {
        std::iter::successors(Some(self), |scope| scope.parent())
    }

    /// Identity of this scope; clones share it, distinct scopes do not.
    pub fn id(&self) -> ScopeId {
        ScopeId::new(Arc::as_ptr(&self.data) as usize)
    }

    /// This scope's own definitions in declaration order (parents excluded).
    pub fn entries(&self) -> impl Iterator<Item = (Name, &Definition)> + '_ {
        self.data
            .definitions
            .iter()
            .map(|definition| (definition.name(), definition))
    }

    pub fn len(&self) -> usize {
        self.data.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.definitions.is_empty()
    }

    pub fn parent(&self) -> Option<&Scope> {
        self.data.parent.as_ref()
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.data.interner
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = self.interner();
        f.debug_struct("Scope")
            .field(
                "definitions",
                &self
                    .entries()
                    .map(|(name, _)| interner.lookup(name))
                    .collect::<Vec<_>>(),
            )
            .field("parent", &self.data.parent)
            .finish()
    }
}

/// Collects definitions and freezes them into a [`Scope`].
pub struct ScopeBuilder {
    interner: SharedInterner,
    parent: Option<Scope>,
    definitions: Vec<Definition>,
    index: FxHashMap<Name, usize>,
}

impl ScopeBuilder {
    pub fn new(interner: SharedInterner) -> Self {
        ScopeBuilder {
            interner,
            parent: None,
            definitions: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// A builder for a scope layered on `parent`, sharing its interner.
    ///
    /// Names already defined in the parent may be shadowed.
    pub fn child_of(parent: &Scope) -> Self {
        ScopeBuilder {
            parent: Some(parent.clone()),
            ..ScopeBuilder::new(parent.interner().clone())
        }
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    /// Register a definition; fails if its name is already defined here.
    pub fn add(&mut self, definition: Definition) -> EvalResult<()> {
        let name = definition.name();
        if self.index.contains_key(&name) {
            return Err(EvalError::DuplicateDefinition {
                name: self.interner.lookup(name).to_owned(),
            });
        }
        self.index.insert(name, self.definitions.len());
        self.definitions.push(definition);
        Ok(())
    }

    /// Register a parsed declaration.
    pub fn add_item(&mut self, item: Item) -> EvalResult<()> {
        self.add(Definition::from(item))
    }

    /// Register every parsed declaration, stopping at the first duplicate.
    pub fn add_items(&mut self, items: impl IntoIterator<Item = Item>) -> EvalResult<()> {
        items.into_iter().try_for_each(|item| self.add_item(item))
    }

    /// Register a natively implemented function.
    pub fn add_builtin(
        &mut self,
        name: &str,
        params: &[(&str, Expr)],
        rule: fn(&[TypeValue]) -> TypeValue,
    ) -> EvalResult<()> {
        let params: Vec<ParamDecl> = params
            .iter()
            .map(|(param, ty)| ParamDecl::new(self.interner.intern(param), ty.clone()))
            .collect();
        self.add(Definition::BuiltinFunction {
            name: self.interner.intern(name),
            params: params.into(),
            rule: NativeRule(rule),
        })
    }

    pub fn build(self) -> Scope {
        Scope {
            data: Arc::new(ScopeData {
                interner: self.interner,
                parent: self.parent,
                definitions: self.definitions,
                index: self.index,
            }),
        }
    }
}
