//! Engine error type.

use ormpad_lang::ParseError;
use thiserror::Error;

/// Errors raised while executing a snippet.
///
/// Every variant renders as a single-line message; the executor turns
/// any of them into an `Error: <message>` line in the captured output.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown entity '{0}'")]
    UnknownEntity(String),

    #[error("unknown field '{field}' on {entity}")]
    UnknownField { entity: String, field: String },

    #[error("unknown relation '{relation}' on {entity}")]
    UnknownRelation { entity: String, relation: String },

    #[error("undefined variable '{0}'")]
    UndefinedVariable(String),

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("{0}")]
    Unsupported(String),

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Sql(#[from] rusqlite::Error),
}

/// Convenience alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;
