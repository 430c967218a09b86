//! The `eval` command: evaluate one type expression.

use navi_eval::{EvalConfig, Evaluator, Scope};
use navi_parse::parse_expression;

use super::{layer_definitions, read_file, CommandError};
use crate::scope::global_scope;

/// Evaluate `expression` against the global scope, or against `defs`
/// (a path and its text) layered over it.
pub fn eval_expression(
    expression: &str,
    defs: Option<(&str, &str)>,
    config: EvalConfig,
) -> Result<String, CommandError> {
    match defs {
        Some((path, text)) => {
            let scope = layer_definitions(path, text)?;
            eval_in(expression, &scope, config)
        }
        None => eval_in(expression, global_scope()?, config),
    }
}

/// Like [`eval_expression`], reading the definitions from `defs_path`.
pub fn eval_expression_with_file(
    expression: &str,
    defs_path: Option<&str>,
    config: EvalConfig,
) -> Result<String, CommandError> {
    match defs_path {
        Some(path) => {
            let text = read_file(path)?;
            eval_expression(expression, Some((path, &text)), config)
        }
        None => eval_expression(expression, None, config),
    }
}

fn eval_in(expression: &str, scope: &Scope, config: EvalConfig) -> Result<String, CommandError> {
    let expr = parse_expression(expression, scope.interner()).map_err(|error| {
        CommandError::Parse {
            path: "<expression>".to_string(),
            text: expression.to_string(),
            error,
        }
    })?;
    let value = Evaluator::with_config(scope, config).evaluate(&expr)?;
    Ok(value.display(scope.interner()).to_string())
}
