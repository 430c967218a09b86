//! Navi Eval - definition registry and evaluator for the Navi type language.
//!
//! # Architecture
//!
//! - `Scope` / `ScopeBuilder`: immutable registry of named `Definition`s
//! - `Evaluator`: resolves expressions into `TypeValue`s against a scope
//! - `Bindings`: transient parameter values layered over a scope
//! - `builtins`: natively implemented functions (`number::add`, ..)
//! - `check_scope`: self-consistency check of every definition in a scope
//!
//! Scopes are built once and then shared read-only; evaluation keeps all
//! of its state in the `Evaluator` and on the stack.

mod bindings;
pub mod builtins;
mod check;
mod error;
mod eval;
mod scope;
mod stack;

pub use bindings::Bindings;
pub use check::{check_scope, check_scope_with, ScopeDiagnostic};
pub use error::{EvalError, EvalResult};
pub use eval::{evaluate, evaluate_with, EvalConfig, Evaluator};
pub use scope::{Definition, NativeRule, Scope, ScopeBuilder};

#[cfg(test)]
mod test_helpers;
