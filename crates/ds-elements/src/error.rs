//! Error types for step elements.

use ds_core::CoreError;
use ds_solver::SolverError;
use thiserror::Error;

/// Result type for element operations.
pub type ElementResult<T> = Result<T, ElementError>;

/// Errors raised while building or stepping an element.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ElementError {
    /// Tuning parameters violate an element invariant (construction or retune).
    #[error("Invalid configuration: {what}")]
    InvalidConfiguration { what: &'static str },

    /// Per-tick input rejected; element state is unchanged.
    #[error("Invalid step input: {what}")]
    InvalidStepInput { what: &'static str },

    /// Time constant derivation could not bracket a root.
    #[error("Solver divergence: {0}")]
    SolverDivergence(#[from] SolverError),

    /// Element configuration could not be parsed.
    #[error("Config error: {what}")]
    Config { what: String },
}

impl ElementError {
    pub(crate) fn config(what: &'static str) -> impl Fn(CoreError) -> Self {
        move |_| ElementError::InvalidConfiguration { what }
    }

    pub(crate) fn step_input(what: &'static str) -> impl Fn(CoreError) -> Self {
        move |_| ElementError::InvalidStepInput { what }
    }
}
