//! Fourth-order lag (PT4) element.
//!
//! Four first-order stages in series share one time constant `tau`. The
//! time constant is derived from a settle specification: a unit step must
//! bring the last stage to `settle_tolerance` at `settle_time`.
//!
//! The normalized step response of four equal lags at `x = t / tau` is
//! `1 - exp(-x) * (1 + x + x^2/2 + x^3/6)`, so `tau = settle_time / x`
//! where `x` is the root of
//!
//! ```text
//! exp(-x) * (1 + x + x^2/2 + x^3/6) - (1 - settle_tolerance) = 0
//! ```

use ds_core::{cast, ensure_finite, ensure_positive};
use ds_solver::{BisectionConfig, bisect};
use num_traits::Float;

use crate::error::{ElementError, ElementResult};

/// Number of cascaded first-order stages.
pub const STAGES: usize = 4;

/// Residual of the settle equation at normalized time `x`.
///
/// Positive before the settle point, negative after it.
pub fn settle_residual<F: Float>(x: F, epsilon: F) -> F {
    let half: F = cast(0.5_f64);
    let sixth = F::one() / cast::<F, f64>(6.0);
    let polynom = F::one() + x + half * x * x + sixth * x * x * x;
    (-x).exp() * polynom - epsilon
}

/// Solve the settle equation for the normalized settle time `x`.
///
/// # Errors
///
/// [`ElementError::SolverDivergence`] if no sign change exists below `1e6`,
/// which happens for `settle_tolerance > 1`.
pub fn normalized_settle_time<F: Float>(settle_tolerance: F) -> ElementResult<F> {
    let epsilon = F::one() - settle_tolerance;
    let result = bisect(
        |x| settle_residual(x, epsilon),
        F::zero(),
        cast(10.0_f64),
        &BisectionConfig::default(),
    )?;
    Ok(result.root)
}

/// PT4 element.
///
/// The gain `k` is accepted and reported but the step response always has
/// unit gain.
///
/// # Example
///
/// ```
/// use ds_elements::FourthOrderLag;
///
/// let mut pt4 = FourthOrderLag::<f64, f64>::new(1.0, 2.0, 0.99).unwrap();
/// let dt = 1e-3;
/// for _ in 0..2000 {
///     pt4.step(dt, 1.0);
/// }
/// assert!(pt4.output() > 0.98);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FourthOrderLag<T = f64, V = f64> {
    gain: V,
    tau: T,
    stages: [V; STAGES],
}

impl<T: Float, V: Float> FourthOrderLag<T, V> {
    /// Create a PT4 element at rest at zero.
    ///
    /// # Errors
    ///
    /// - [`ElementError::InvalidConfiguration`] if `settle_time` is not
    ///   finite and positive, or `settle_tolerance` is not finite, `<= 0`
    ///   or exactly `1`. Both ends of `(0, 1)` are rejected: zero would put
    ///   the root at `x = 0` (infinite `tau`), and one has no finite root,
    ///   only an artifact of `exp` underflowing.
    /// - [`ElementError::SolverDivergence`] if the settle equation has no
    ///   root (tolerance above one).
    pub fn new(k: V, settle_time: T, settle_tolerance: V) -> ElementResult<Self> {
        ensure_positive(settle_time, "settle time")
            .map_err(ElementError::config("settle time must be finite and positive"))?;
        ensure_finite(settle_tolerance, "settle tolerance")
            .map_err(ElementError::config("settle tolerance must be finite"))?;
        if settle_tolerance <= V::zero() || settle_tolerance == V::one() {
            return Err(ElementError::InvalidConfiguration {
                what: "settle tolerance must lie in (0, 1)",
            });
        }

        let x: T = cast(normalized_settle_time(settle_tolerance)?);
        let tau = settle_time / x;
        if !(tau.is_finite() && tau > T::zero()) {
            return Err(ElementError::InvalidConfiguration {
                what: "derived time constant must be positive and finite",
            });
        }

        tracing::debug!(
            tau = cast::<f64, T>(tau),
            normalized_settle_time = cast::<f64, T>(x),
            "fourth-order lag configured"
        );

        Ok(Self {
            gain: k,
            tau,
            stages: [V::zero(); STAGES],
        })
    }

    /// Advance all four stages by `dt` and return the last stage.
    ///
    /// Each stage is driven by the previous stage's value from before this
    /// step. Explicit Euler; `dt` and `target` are not validated.
    pub fn step(&mut self, dt: T, target: V) -> V {
        let tau: V = cast(self.tau);
        let dt: V = cast(dt);

        let mut input = target;
        for stage in self.stages.iter_mut() {
            let previous = *stage;
            *stage = previous + (input - previous) / tau * dt;
            input = previous;
        }
        self.output()
    }

    /// Settle every stage at `value`.
    pub fn reset(&mut self, value: V) {
        self.stages = [value; STAGES];
    }

    /// Output of the last stage.
    pub fn output(&self) -> V {
        self.stages[STAGES - 1]
    }

    pub fn stages(&self) -> &[V; STAGES] {
        &self.stages
    }

    pub fn time_constant(&self) -> T {
        self.tau
    }

    /// Gain passed at construction. Not applied by [`Self::step`].
    pub fn gain(&self) -> V {
        self.gain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ds_solver::SolverError;

    #[test]
    fn residual_is_one_minus_epsilon_at_zero() {
        assert_eq!(settle_residual(0.0, 0.25), 0.75);
    }

    #[test]
    fn normalized_time_for_one_percent() {
        let x = normalized_settle_time(0.99_f64).unwrap();
        assert!((x - 10.045_117_514_831_645).abs() < 1e-9);
        assert!(settle_residual(x, 0.01).abs() < 1e-12);
    }

    #[test]
    fn time_constant_scales_with_settle_time() {
        let a = FourthOrderLag::<f64, f64>::new(1.0, 1.0, 0.95).unwrap();
        let b = FourthOrderLag::<f64, f64>::new(1.0, 3.0, 0.95).unwrap();
        assert!((b.time_constant() / a.time_constant() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn stages_use_pre_step_values() {
        let mut pt4 = FourthOrderLag::<f64, f64>::new(1.0, 1.0, 0.9).unwrap();
        let tau = pt4.time_constant();
        let dt = 0.01;

        pt4.step(dt, 1.0);
        let s = *pt4.stages();
        assert!((s[0] - dt / tau).abs() < 1e-15);
        // stage 2 saw stage 1 at zero, not its updated value
        assert_eq!(s[1], 0.0);
        assert_eq!(s[3], 0.0);

        pt4.step(dt, 1.0);
        let s2 = *pt4.stages();
        assert!((s2[1] - s[0] * dt / tau).abs() < 1e-15);
        assert_eq!(s2[2], 0.0);
    }

    #[test]
    fn gain_is_not_applied() {
        let mut unit = FourthOrderLag::<f64, f64>::new(1.0, 1.0, 0.99).unwrap();
        let mut scaled = FourthOrderLag::<f64, f64>::new(5.0, 1.0, 0.99).unwrap();
        for _ in 0..500 {
            assert_eq!(unit.step(0.01, 2.0), scaled.step(0.01, 2.0));
        }
        assert_eq!(scaled.gain(), 5.0);
    }

    #[test]
    fn reset_settles_all_stages() {
        let mut pt4 = FourthOrderLag::<f64, f64>::new(1.0, 1.0, 0.99).unwrap();
        pt4.reset(3.0);
        assert_eq!(pt4.stages(), &[3.0; STAGES]);
        assert_eq!(pt4.step(0.01, 3.0), 3.0);
    }

    #[test]
    fn tolerance_above_one_diverges() {
        let err = FourthOrderLag::<f64, f64>::new(1.0, 1.0, 1.5).unwrap_err();
        assert!(matches!(
            err,
            ElementError::SolverDivergence(SolverError::BracketNotFound { .. })
        ));
    }

    #[test]
    fn invalid_settle_spec() {
        type P = FourthOrderLag<f64, f64>;
        assert!(matches!(
            P::new(1.0, 0.0, 0.99),
            Err(ElementError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            P::new(1.0, -1.0, 0.99),
            Err(ElementError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            P::new(1.0, 1.0, 0.0),
            Err(ElementError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            P::new(1.0, 1.0, f64::NAN),
            Err(ElementError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn tolerance_bounds_are_exclusive() {
        type P = FourthOrderLag<f64, f64>;
        for tolerance in [0.0, -0.1, 1.0] {
            assert_eq!(
                P::new(1.0, 1.0, tolerance).unwrap_err(),
                ElementError::InvalidConfiguration {
                    what: "settle tolerance must lie in (0, 1)"
                }
            );
        }
        assert!(P::new(1.0, 1.0, 1e-6).is_ok());
        assert!(P::new(1.0, 1.0, 1.0 - 1e-9).is_ok());
    }

    #[test]
    fn single_precision() {
        let pt4 = FourthOrderLag::<f32, f32>::new(1.0, 2.0, 0.99).unwrap();
        assert!((pt4.time_constant() - 0.199_101_7).abs() < 1e-4);
    }
}
