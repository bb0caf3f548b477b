//! Scalar root finding for dynstep.
//!
//! The solvers here are pure numeric procedures over scalars. They know
//! nothing about the elements that use them, so they can be exercised in
//! isolation.

pub mod bisection;
pub mod error;

pub use bisection::{BisectionConfig, BisectionResult, bisect};
pub use error::{SolverError, SolverResult};
