//! Shared fixtures for unit tests.

#![allow(clippy::unwrap_used, reason = "test fixtures panic on malformed input")]

use navi_ir::SharedInterner;
use navi_types::TypeValue;

use crate::{builtins, evaluate, EvalResult, Scope, ScopeBuilder};

/// Builtins plus the definitions in `source`.
pub fn scope_from(source: &str) -> Scope {
    let interner = SharedInterner::new();
    let items = navi_parse::parse_definitions(source, &interner).unwrap();
    let mut builder = ScopeBuilder::new(interner);
    builtins::register(&mut builder).unwrap();
    builder.add_items(items).unwrap();
    builder.build()
}

/// Parse and evaluate `source` against `scope`.
pub fn eval(scope: &Scope, source: &str) -> EvalResult<TypeValue> {
    let expr = navi_parse::parse_expression(source, scope.interner()).unwrap();
    evaluate(&expr, scope)
}

/// Evaluate and render, panicking on evaluation errors.
pub fn show(scope: &Scope, source: &str) -> String {
    match eval(scope, source) {
        Ok(value) => value.display(scope.interner()).to_string(),
        Err(error) => panic!("`{source}` failed: {error}"),
    }
}

/// The definitions in `source` layered over `parent`.
pub fn child_scope(parent: &Scope, source: &str) -> Scope {
    let items = navi_parse::parse_definitions(source, parent.interner()).unwrap();
    let mut builder = ScopeBuilder::child_of(parent);
    builder.add_items(items).unwrap();
    builder.build()
}
