//! The `prelude` command: list the global scope and self-check it.

use std::fmt::Write;

use navi_eval::{check_scope_with, EvalConfig};

use super::CommandError;
use crate::diagnostic::render_scope_diagnostic;
use crate::scope::global_scope;

/// One `kind name` line per definition, then the self-check result.
pub fn prelude_report(config: EvalConfig) -> Result<String, CommandError> {
    let scope = global_scope()?;
    let interner = scope.interner();

    let mut out = String::new();
    for (name, definition) in scope.entries() {
        let _ = writeln!(out, "{:<16} {}", definition.kind(), interner.lookup(name));
    }

    let diagnostics = check_scope_with(scope, config);
    if diagnostics.is_empty() {
        let _ = writeln!(out, "OK: {} definitions", scope.len());
        return Ok(out);
    }
    Err(CommandError::CheckFailed {
        diagnostics: diagnostics
            .iter()
            .map(|diagnostic| render_scope_diagnostic(diagnostic, interner))
            .collect(),
    })
}
