//! Command handlers for the `navi` CLI.
//!
//! Each submodule implements one command. Handlers return their output as
//! a `String` and their failures as a `CommandError`; printing and exit
//! codes are left to the binary.

use navi_eval::{EvalConfig, EvalError, Scope, ScopeBuilder};
use navi_parse::{parse_definitions, ParseError};
use thiserror::Error;

use crate::diagnostic::{render_eval_error, render_parse_error};
use crate::scope::{global_scope, PreludeError};

mod check;
mod eval;
mod prelude;

pub use check::{check_file, check_source, CheckReport};
pub use eval::{eval_expression, eval_expression_with_file};
pub use prelude::prelude_report;

/// Environment variable overriding the evaluation depth limit.
pub const MAX_DEPTH_ENV: &str = "NAVI_MAX_DEPTH";

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("cannot read `{path}`: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// A syntax error, with the text it was found in for rendering.
    #[error("{path}: {error}")]
    Parse {
        path: String,
        text: String,
        error: ParseError,
    },

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    Prelude(#[from] PreludeError),

    /// Rendered diagnostics of every definition that failed its self-check.
    #[error("{} definition(s) failed to check", diagnostics.len())]
    CheckFailed { diagnostics: Vec<String> },

    #[error("invalid maximum depth `{0}`: expected a positive integer")]
    InvalidMaxDepth(String),
}

impl CommandError {
    /// Render for the terminal; syntax errors get a source snippet.
    pub fn render(&self) -> String {
        match self {
            CommandError::Parse { path, text, error } => render_parse_error(path, text, error),
            CommandError::Eval(error) => render_eval_error(error),
            CommandError::CheckFailed { diagnostics } => {
                format!("{}\nerror: {self}", diagnostics.join("\n"))
            }
            other => format!("error: {other}"),
        }
    }
}

/// Pick the evaluation config: the flag wins over the environment, and
/// both fall back to the default depth.
pub fn resolve_config(flag: Option<&str>, env: Option<&str>) -> Result<EvalConfig, CommandError> {
    let Some(raw) = flag.or(env) else {
        return Ok(EvalConfig::default());
    };
    match raw.trim().parse::<usize>() {
        Ok(depth) if depth > 0 => Ok(EvalConfig::default().with_max_depth(depth)),
        _ => Err(CommandError::InvalidMaxDepth(raw.to_string())),
    }
}

pub(crate) fn read_file(path: &str) -> Result<String, CommandError> {
    std::fs::read_to_string(path).map_err(|source| CommandError::Io {
        path: path.to_string(),
        source,
    })
}

/// Parse `text` and layer its definitions over the global scope.
///
/// User definitions may shadow prelude names, but not each other.
pub(crate) fn layer_definitions(path: &str, text: &str) -> Result<Scope, CommandError> {
    let global = global_scope()?;
    let items = parse_definitions(text, global.interner()).map_err(|error| CommandError::Parse {
        path: path.to_string(),
        text: text.to_string(),
        error,
    })?;
    let mut builder = ScopeBuilder::child_of(global);
    builder.add_items(items)?;
    Ok(builder.build())
}

#[cfg(test)]
mod tests;
