//! The `check` command: self-check a definition file layered on the prelude.

use navi_eval::{check_scope_with, EvalConfig};

use super::{layer_definitions, read_file, CommandError};
use crate::diagnostic::render_scope_diagnostic;

/// Outcome of checking one file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckReport {
    pub path: String,
    pub definitions: usize,
    /// Rendered diagnostics, in definition order.
    pub diagnostics: Vec<String>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// The summary line, or `CheckFailed` carrying the diagnostics.
    pub fn into_result(self) -> Result<String, CommandError> {
        if self.is_ok() {
            Ok(self.summary())
        } else {
            Err(CommandError::CheckFailed {
                diagnostics: self.diagnostics,
            })
        }
    }

    pub fn summary(&self) -> String {
        if self.is_ok() {
            format!("OK: {} ({} definitions)", self.path, self.definitions)
        } else {
            format!(
                "{}: {} of {} definitions failed",
                self.path,
                self.diagnostics.len(),
                self.definitions
            )
        }
    }
}

/// Check every definition of `text`.
///
/// Syntax errors and duplicate names abort; evaluation failures are
/// collected into the report.
pub fn check_source(path: &str, text: &str, config: EvalConfig) -> Result<CheckReport, CommandError> {
    let scope = layer_definitions(path, text)?;
    let diagnostics = check_scope_with(&scope, config)
        .iter()
        .map(|diagnostic| render_scope_diagnostic(diagnostic, scope.interner()))
        .collect();
    Ok(CheckReport {
        path: path.to_string(),
        definitions: scope.len(),
        diagnostics,
    })
}

pub fn check_file(path: &str, config: EvalConfig) -> Result<CheckReport, CommandError> {
    let text = read_file(path)?;
    check_source(path, &text, config)
}
