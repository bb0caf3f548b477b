//! Discrete-time step elements for control loops.
//!
//! Every element is built once from static tuning and then advanced once
//! per control tick with the elapsed time `dt` and a `target`:
//!
//! - [`DampedLinearMovement`] / [`TimedLinearMovement`]: trapezoidal motion
//!   profiles with a damped approach to the target
//! - [`FirstOrderLag`]: PT1 low-pass, exact exponential update
//! - [`FourthOrderLag`]: PT4 low-pass, four Euler-integrated stages whose
//!   time constant is derived from a settle time
//!
//! Time and value types are independent `num_traits::Float` parameters.
//!
//! # Concurrency
//!
//! Elements hold plain numeric state with no interior locking. Step an
//! instance from one thread at a time; separate instances are independent.
//! Only [`FourthOrderLag::new`] has input-dependent cost (a bounded
//! bisection), so build elements outside hard real-time ticks.

pub mod config;
pub mod error;
pub mod first_order;
pub mod fourth_order;
pub mod movement;

pub use config::{Element, ElementConfig};
pub use error::{ElementError, ElementResult};
pub use first_order::FirstOrderLag;
pub use fourth_order::FourthOrderLag;
pub use movement::{DampedLinearMovement, TimedLinearMovement};
