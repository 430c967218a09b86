//! Scope self-consistency check.
//!
//! Every definition is exercised in isolation: variables and structs are
//! resolved by name, functions are called with their own declared parameter
//! types as arguments. The check is an authoring lint. A function that
//! passes it can still reject narrower arguments at a real call site, and
//! those calls report their own errors.

use navi_ir::{Expr, Name};
use tracing::debug;

use crate::scope::Definition;
use crate::{EvalConfig, EvalError, Evaluator, Scope};

/// A definition that failed its self-check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeDiagnostic {
    pub name: Name,
    pub error: EvalError,
}

/// Check every definition declared in `scope` (parents are not re-checked).
pub fn check_scope(scope: &Scope) -> Vec<ScopeDiagnostic> {
    check_scope_with(scope, EvalConfig::default())
}

#[tracing::instrument(level = "debug", skip_all, fields(definitions = scope.len()))]
pub fn check_scope_with(scope: &Scope, config: EvalConfig) -> Vec<ScopeDiagnostic> {
    let mut diagnostics = Vec::new();
    for (name, definition) in scope.entries() {
        let probe = match definition {
            Definition::Parameter { .. } => continue,
            Definition::Variable { .. } | Definition::Struct { .. } => Expr::Named(name),
            Definition::BuiltinFunction { params, .. } | Definition::Function { params, .. } => {
                Expr::call(name, params.iter().map(|param| param.ty.clone()).collect())
            }
        };
        if let Err(error) = Evaluator::with_config(scope, config).evaluate(&probe) {
            debug!(
                name = scope.interner().lookup(name),
                kind = definition.kind(),
                %error,
                "definition failed its self-check"
            );
            diagnostics.push(ScopeDiagnostic { name, error });
        }
    }
    diagnostics
}
