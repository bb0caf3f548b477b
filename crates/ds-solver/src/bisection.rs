//! Bisection with upper-bracket expansion.

use ds_core::{cast, ensure_finite};
use num_traits::Float;

use crate::error::{SolverError, SolverResult};

/// Bisection solver configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BisectionConfig<F> {
    /// Maximum bisection iterations (bracket expansion not included)
    pub max_iterations: usize,
    /// Early exit once `|f(mid)|` drops below this
    pub tolerance: F,
    /// Upper bound for the doubled `high` before giving up
    pub bracket_limit: F,
}

impl<F: Float> Default for BisectionConfig<F> {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: F::epsilon(),
            bracket_limit: cast(1e6_f64),
        }
    }
}

/// Bisection result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BisectionResult<F> {
    /// Root estimate
    pub root: F,
    /// Objective evaluated at `root`
    pub residual: F,
    /// Number of bisection iterations performed
    pub iterations: usize,
    /// `true` if the residual tolerance was met before the iteration budget ran out
    pub converged: bool,
}

/// Find a root of a monotonically decreasing `objective` on `[low, high]`.
///
/// While `objective(high)` is still positive, `high` is doubled; exceeding
/// `config.bracket_limit` fails with [`SolverError::BracketNotFound`].
///
/// Running out of iterations is not an error: the midpoint of the final
/// bracket is returned with `converged == false`. Its error is bounded by
/// half the final bracket width.
pub fn bisect<F, O>(
    objective: O,
    low: F,
    high: F,
    config: &BisectionConfig<F>,
) -> SolverResult<BisectionResult<F>>
where
    F: Float,
    O: Fn(F) -> F,
{
    let mut low = ensure_finite(low, "bisection lower bound")?;
    let mut high = ensure_finite(high, "bisection upper bound")?;
    if low >= high {
        return Err(SolverError::InvalidArg {
            what: "bisection lower bound must be below upper bound",
        });
    }

    let two = F::one() + F::one();

    while objective(high) > F::zero() {
        high = high * two;
        tracing::trace!(high = cast::<f64, F>(high), "expanding bisection bracket");
        if high > config.bracket_limit {
            return Err(SolverError::BracketNotFound {
                what: format!(
                    "objective still positive at {} (limit {})",
                    cast::<f64, F>(high),
                    cast::<f64, F>(config.bracket_limit)
                ),
            });
        }
    }

    for iter in 0..config.max_iterations {
        let mid = (low + high) / two;
        let value = objective(mid);
        if value.abs() < config.tolerance {
            return Ok(BisectionResult {
                root: mid,
                residual: value,
                iterations: iter + 1,
                converged: true,
            });
        }
        if value > F::zero() {
            low = mid;
        } else {
            high = mid;
        }
    }

    let root = (low + high) / two;
    let residual = objective(root);
    tracing::debug!(
        iterations = config.max_iterations,
        root = cast::<f64, F>(root),
        residual = cast::<f64, F>(residual),
        "bisection budget exhausted, using bracket midpoint"
    );
    Ok(BisectionResult {
        root,
        residual,
        iterations: config.max_iterations,
        converged: false,
    })
}
