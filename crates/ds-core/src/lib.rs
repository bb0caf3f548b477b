//! ds-core: numeric foundation for dynstep.
//!
//! Contains:
//! - numeric (generic float checks and conversions)
//! - error (shared error types)

pub mod error;
pub mod numeric;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
