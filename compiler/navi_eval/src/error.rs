//! Evaluation errors.
//!
//! Names and types are rendered into the error when it is built, so an
//! error can be displayed, compared and sent across threads without the
//! interner that produced it.

use thiserror::Error;

/// Result type for registry and evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("undefined name `{name}`")]
    UndefinedName { name: String },

    #[error("`{name}` is already defined in this scope")]
    DuplicateDefinition { name: String },

    #[error("`{function}` expects {expected} argument(s) but was given {found}")]
    ArityMismatch {
        function: String,
        expected: usize,
        found: usize,
    },

    /// A value has no overlap with the type it must satisfy.
    #[error("{context}: `{found}` is not compatible with `{expected}`")]
    TypeMismatch {
        context: String,
        expected: String,
        found: String,
    },

    #[error("`{ty}` has no field `{field}`")]
    UnknownField { ty: String, field: String },

    #[error("evaluation exceeded the maximum depth of {limit}")]
    RecursionLimit { limit: usize },

    /// A parameter was referenced where no binding provides its value.
    #[error("parameter `{name}` has no value outside of a binding")]
    UnboundParameter { name: String },

    #[error("`{name}` is defined in terms of itself")]
    CyclicReference { name: String },

    #[error("`{ty}` is not a struct")]
    NotAStruct { ty: String },

    #[error("`{name}` is not a function")]
    NotCallable { name: String },
}

impl EvalError {
    /// Short, stable name of the error kind, used in logs and test output.
    pub fn kind(&self) -> &'static str {
        match self {
            EvalError::UndefinedName { .. } => "undefined-name",
            EvalError::DuplicateDefinition { .. } => "duplicate-definition",
            EvalError::ArityMismatch { .. } => "arity-mismatch",
            EvalError::TypeMismatch { .. } => "type-mismatch",
            EvalError::UnknownField { .. } => "unknown-field",
            EvalError::RecursionLimit { .. } => "recursion-limit",
            EvalError::UnboundParameter { .. } => "unbound-parameter",
            EvalError::CyclicReference { .. } => "cyclic-reference",
            EvalError::NotAStruct { .. } => "not-a-struct",
            EvalError::NotCallable { .. } => "not-callable",
        }
    }
}
