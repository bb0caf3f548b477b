//! First-order lag (PT1) element.
//!
//! Dynamics: `tau * dy/dt = K * target - y`.
//!
//! The update uses the exact solution of the ODE for a target held
//! constant over the step, so the result does not depend on how the
//! interval is sliced:
//!
//! ```text
//! a = exp(-dt / tau)
//! y = a * y + (1 - a) * K * target
//! ```

use ds_core::{cast, ensure_finite, ensure_positive};
use num_traits::Float;

use crate::error::{ElementError, ElementResult};

/// PT1 element with gain `K` and time constant `tau`.
///
/// # Example
///
/// ```
/// use ds_elements::FirstOrderLag;
///
/// let mut lag = FirstOrderLag::<f64, f64>::new(1.0, 1.0, 0.0).unwrap();
/// let y = lag.step(1.0, 1.0).unwrap();
/// assert!((y - (1.0 - (-1.0_f64).exp())).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FirstOrderLag<T = f64, V = f64> {
    gain: V,
    tau: T,
    output: V,
}

impl<T: Float, V: Float> FirstOrderLag<T, V> {
    /// Create a PT1 element with initial output `y0`.
    ///
    /// # Errors
    ///
    /// [`ElementError::InvalidConfiguration`] if `k` or `tau` is not finite
    /// or `tau <= 0`.
    pub fn new(k: V, tau: T, y0: V) -> ElementResult<Self> {
        validate_params(k, tau)?;
        tracing::debug!(
            gain = cast::<f64, V>(k),
            tau = cast::<f64, T>(tau),
            "first-order lag configured"
        );
        Ok(Self {
            gain: k,
            tau,
            output: y0,
        })
    }

    /// Advance the filter by `dt` toward `target` and return the new output.
    ///
    /// # Errors
    ///
    /// [`ElementError::InvalidStepInput`] if `dt` or `target` is not finite
    /// or `dt < 0`. The output is left untouched in that case.
    pub fn step(&mut self, dt: T, target: V) -> ElementResult<V> {
        ensure_finite(dt, "dt").map_err(ElementError::step_input("dt must be finite"))?;
        ensure_finite(target, "target")
            .map_err(ElementError::step_input("target must be finite"))?;
        if dt < T::zero() {
            return Err(ElementError::InvalidStepInput {
                what: "dt must be >= 0",
            });
        }

        if dt == T::zero() {
            return Ok(self.output);
        }

        let a: V = cast((-dt / self.tau).exp());
        self.output = a * self.output + (V::one() - a) * (self.gain * target);
        Ok(self.output)
    }

    /// Retune gain and time constant without touching the output.
    ///
    /// On error the previous parameters are kept.
    pub fn set_params(&mut self, k: V, tau: T) -> ElementResult<()> {
        validate_params(k, tau)?;
        self.gain = k;
        self.tau = tau;
        Ok(())
    }

    /// Force the output to `y0`.
    pub fn reset(&mut self, y0: V) {
        self.output = y0;
    }

    pub fn output(&self) -> V {
        self.output
    }

    pub fn gain(&self) -> V {
        self.gain
    }

    pub fn time_constant(&self) -> T {
        self.tau
    }
}

fn validate_params<T: Float, V: Float>(k: V, tau: T) -> ElementResult<()> {
    ensure_finite(k, "gain").map_err(ElementError::config("gain K must be finite"))?;
    ensure_positive(tau, "tau")
        .map_err(ElementError::config("time constant must be finite and > 0"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_step_after_one_time_constant() {
        let mut lag = FirstOrderLag::<f64, f64>::new(1.0, 1.0, 0.0).unwrap();
        let y = lag.step(1.0, 1.0).unwrap();
        assert!((y - 0.632_120_558_828_557_7).abs() < 1e-12);
    }

    #[test]
    fn zero_dt_is_noop() {
        let mut lag = FirstOrderLag::<f64, f64>::new(2.0, 0.5, 0.3).unwrap();
        assert_eq!(lag.step(0.0, 100.0).unwrap(), 0.3);
        assert_eq!(lag.output(), 0.3);
    }

    #[test]
    fn gain_scales_steady_state() {
        let mut lag = FirstOrderLag::<f64, f64>::new(2.5, 0.2, 0.0).unwrap();
        for _ in 0..1000 {
            lag.step(0.01, 4.0).unwrap();
        }
        assert!((lag.output() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_negative_dt_without_touching_state() {
        let mut lag = FirstOrderLag::<f64, f64>::new(1.0, 1.0, 0.0).unwrap();
        lag.step(0.1, 1.0).unwrap();
        let before = lag.output();

        assert_eq!(
            lag.step(-0.001, 1.0).unwrap_err(),
            ElementError::InvalidStepInput {
                what: "dt must be >= 0"
            }
        );
        assert_eq!(lag.output(), before);
    }

    #[test]
    fn rejects_non_finite_step_inputs() {
        let mut lag = FirstOrderLag::<f64, f64>::new(1.0, 1.0, 0.5).unwrap();
        assert!(matches!(
            lag.step(0.1, f64::NAN),
            Err(ElementError::InvalidStepInput { .. })
        ));
        assert!(matches!(
            lag.step(f64::INFINITY, 1.0),
            Err(ElementError::InvalidStepInput { .. })
        ));
        assert_eq!(lag.output(), 0.5);
    }

    #[test]
    fn invalid_parameters() {
        assert!(FirstOrderLag::<f64, f64>::new(1.0, 0.0, 0.0).is_err());
        assert!(FirstOrderLag::<f64, f64>::new(1.0, -1.0, 0.0).is_err());
        assert!(FirstOrderLag::<f64, f64>::new(f64::NAN, 1.0, 0.0).is_err());
        assert!(FirstOrderLag::<f64, f64>::new(1.0, f64::INFINITY, 0.0).is_err());
    }

    #[test]
    fn time_constant_error_message() {
        for tau in [0.0, -1.0, f64::NAN] {
            assert_eq!(
                FirstOrderLag::<f64, f64>::new(1.0, tau, 0.0).unwrap_err(),
                ElementError::InvalidConfiguration {
                    what: "time constant must be finite and > 0"
                }
            );
        }
    }

    #[test]
    fn set_params_keeps_output() {
        let mut lag = FirstOrderLag::<f64, f64>::new(1.0, 1.0, 0.0).unwrap();
        lag.step(0.5, 1.0).unwrap();
        let y = lag.output();

        lag.set_params(3.0, 0.1).unwrap();
        assert_eq!(lag.output(), y);
        assert_eq!(lag.gain(), 3.0);
        assert_eq!(lag.time_constant(), 0.1);

        assert!(lag.set_params(1.0, 0.0).is_err());
        assert_eq!(lag.gain(), 3.0);
        assert_eq!(lag.time_constant(), 0.1);
    }

    #[test]
    fn reset_sets_output() {
        let mut lag = FirstOrderLag::<f64, f64>::new(1.0, 1.0, 0.0).unwrap();
        lag.step(0.5, 1.0).unwrap();
        lag.reset(-2.0);
        assert_eq!(lag.output(), -2.0);
    }

    #[test]
    fn single_precision_time_with_double_value() {
        let mut lag = FirstOrderLag::<f32, f64>::new(1.0, 1.0_f32, 0.0).unwrap();
        let y = lag.step(1.0_f32, 1.0).unwrap();
        assert!((y - 0.632_120_558_828_557_7).abs() < 1e-6);
    }
}
