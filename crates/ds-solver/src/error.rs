//! Error types for solver operations.

use ds_core::CoreError;
use thiserror::Error;

/// Errors that can occur while solving for a root.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Bracket not found: {what}")]
    BracketNotFound { what: String },

    #[error("Numeric error: {0}")]
    Numeric(#[from] CoreError),
}

pub type SolverResult<T> = Result<T, SolverError>;
