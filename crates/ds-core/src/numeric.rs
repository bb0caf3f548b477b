use num_traits::Float;

use crate::CoreError;

/// Convert between float types (time type and value type may differ).
///
/// A value the target type cannot represent becomes NaN rather than panicking,
/// so it is caught by the finiteness checks downstream.
#[inline]
pub fn cast<To: Float, Src: Float>(v: Src) -> To {
    To::from(v).unwrap_or_else(To::nan)
}

pub fn ensure_finite<F: Float>(v: F, what: &'static str) -> Result<F, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite {
            what,
            value: v.to_f64().unwrap_or(f64::NAN),
        })
    }
}

/// Require a finite, strictly positive value.
pub fn ensure_positive<F: Float>(v: F, what: &'static str) -> Result<F, CoreError> {
    let v = ensure_finite(v, what)?;
    if v > F::zero() {
        Ok(v)
    } else {
        Err(CoreError::InvalidArg { what })
    }
}

/// `-1` for negative values, `+1` otherwise (zero counts as positive).
#[inline]
pub fn direction<F: Float>(v: F) -> F {
    if v < F::zero() { -F::one() } else { F::one() }
}
