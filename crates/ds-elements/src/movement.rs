//! Trapezoidal motion profiles with damped approach.
//!
//! Both profilers accelerate toward the target at a constant rate while
//! the remaining distance is larger than the damping width, brake at the
//! same rate inside it, and cruise at the velocity limit in between.
//! Position is integrated with explicit Euler.
//!
//! The two types differ in how the limits are derived and in when they
//! snap onto the target:
//! - [`DampedLinearMovement`] takes the damping stroke directly and snaps
//!   once the next step would reach or pass the target.
//! - [`TimedLinearMovement`] takes an acceleration time and snaps once the
//!   remaining distance is within one full-speed step.
//!
//! Both snap rules are overshoot heuristics. At low tick rates they may
//! stop up to one step early or late.
//!
//! Settling is not guaranteed. Braking is integrated with explicit Euler,
//! so the velocity can reverse before the target is reached; the profile
//! then swings back and forth short of the target. Whether that happens
//! depends on the tuning and on `dt`, and it affects full-stroke moves as
//! well as moves that start inside the braking zone. With stroke 10,
//! duration 2 and damping stroke 2 full strokes settle for any tick between
//! 0.5 ms and 100 ms.

use std::marker::PhantomData;

use ds_core::{cast, direction, ensure_finite};
use num_traits::Float;

use crate::error::{ElementError, ElementResult};

/// Velocity update shared by both profilers.
///
/// Brakes inside `damping`, accelerates outside it, then clamps to
/// `max_velocity` in the direction of the target.
#[inline]
fn profile_velocity<V: Float>(
    velocity: V,
    deviation: V,
    damping: V,
    max_acceleration: V,
    max_velocity: V,
    dt: V,
) -> V {
    let dir = direction(deviation);
    let dv = dir * max_acceleration * dt;
    let velocity = if deviation.abs() <= damping {
        velocity - dv
    } else {
        velocity + dv
    };
    if velocity.abs() >= max_velocity {
        max_velocity * dir
    } else {
        velocity
    }
}

fn ensure_limits<V: Float>(max_acceleration: V, max_velocity: V) -> ElementResult<()> {
    let ok = |v: V| v.is_finite() && v > V::zero();
    if ok(max_acceleration) && ok(max_velocity) {
        Ok(())
    } else {
        Err(ElementError::InvalidConfiguration {
            what: "derived acceleration and velocity must be positive and finite",
        })
    }
}

/// Motion profile parameterized by a damping stroke.
///
/// # Example
///
/// ```
/// use ds_elements::DampedLinearMovement;
///
/// let mut mv = DampedLinearMovement::<f64, f64>::new(10.0, 2.0, 2.0, 0.0).unwrap();
/// let mut ticks = 0;
/// while mv.step(0.01, 10.0) != 10.0 {
///     ticks += 1;
/// }
/// assert!(ticks < 1000);
/// assert_eq!(mv.velocity(), 0.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DampedLinearMovement<T = f64, V = f64> {
    max_acceleration: V,
    max_velocity: V,
    damping_stroke: V,
    position: V,
    velocity: V,
    _time: PhantomData<T>,
}

impl<T: Float, V: Float> DampedLinearMovement<T, V> {
    /// Create a profiler at rest at `current`.
    ///
    /// # Errors
    ///
    /// [`ElementError::InvalidConfiguration`] if `stroke < 0`, `duration <= 0`,
    /// `damping_stroke <= 0` or `2 * damping_stroke > stroke`.
    pub fn new(stroke: V, duration: T, damping_stroke: V, current: V) -> ElementResult<Self> {
        ensure_finite(stroke, "stroke").map_err(ElementError::config("stroke must be finite"))?;
        ensure_finite(duration, "duration")
            .map_err(ElementError::config("duration must be finite"))?;
        ensure_finite(damping_stroke, "damping stroke")
            .map_err(ElementError::config("damping stroke must be finite"))?;
        ensure_finite(current, "position")
            .map_err(ElementError::config("initial position must be finite"))?;

        if stroke < V::zero() {
            return Err(ElementError::InvalidConfiguration {
                what: "stroke is negative",
            });
        }
        if duration <= T::zero() {
            return Err(ElementError::InvalidConfiguration {
                what: "duration must be positive",
            });
        }
        if damping_stroke <= V::zero() {
            return Err(ElementError::InvalidConfiguration {
                what: "damping stroke must be positive",
            });
        }
        let two = V::one() + V::one();
        if damping_stroke * two > stroke {
            return Err(ElementError::InvalidConfiguration {
                what: "damping stroke exceeds half the stroke",
            });
        }

        let four = two + two;
        let duration: V = cast(duration);
        let max_acceleration = (stroke * stroke
            + four * damping_stroke
            + four * damping_stroke * damping_stroke)
            / (two * damping_stroke * duration * duration);
        let max_velocity = (two * damping_stroke * max_acceleration).sqrt();
        ensure_limits(max_acceleration, max_velocity)?;

        tracing::debug!(
            max_acceleration = cast::<f64, V>(max_acceleration),
            max_velocity = cast::<f64, V>(max_velocity),
            damping_stroke = cast::<f64, V>(damping_stroke),
            "damped linear movement configured"
        );

        Ok(Self {
            max_acceleration,
            max_velocity,
            damping_stroke,
            position: current,
            velocity: V::zero(),
            _time: PhantomData,
        })
    }

    /// Advance the profile by `dt` toward `target` and return the new position.
    ///
    /// `dt` is not validated; negative values give meaningless results.
    pub fn step(&mut self, dt: T, target: V) -> V {
        if target == self.position {
            self.velocity = V::zero();
            return self.position;
        }

        let dt: V = cast(dt);
        let deviation = target - self.position;
        self.velocity = profile_velocity(
            self.velocity,
            deviation,
            self.damping_stroke,
            self.max_acceleration,
            self.max_velocity,
            dt,
        );

        let step = self.velocity * dt;
        if step.abs() >= deviation.abs() {
            self.position = target;
            self.velocity = V::zero();
        } else {
            self.position = self.position + step;
        }
        self.position
    }

    /// Put the profiler at rest at `position`.
    pub fn reset(&mut self, position: V) {
        self.position = position;
        self.velocity = V::zero();
    }

    pub fn position(&self) -> V {
        self.position
    }

    pub fn velocity(&self) -> V {
        self.velocity
    }

    pub fn max_acceleration(&self) -> V {
        self.max_acceleration
    }

    pub fn max_velocity(&self) -> V {
        self.max_velocity
    }

    pub fn damping_stroke(&self) -> V {
        self.damping_stroke
    }
}

/// Motion profile parameterized by the time spent accelerating.
///
/// For a move over `stroke` in `duration` with acceleration phase `ta`,
/// the cruise velocity is `stroke / (duration - ta)` and the braking
/// distance from cruise speed (`v * ta / 2`) is the damping width.
#[derive(Clone, Debug, PartialEq)]
pub struct TimedLinearMovement<T = f64, V = f64> {
    max_acceleration: V,
    max_velocity: V,
    damping_stroke: V,
    acceleration_time: T,
    position: V,
    velocity: V,
}

impl<T: Float, V: Float> TimedLinearMovement<T, V> {
    /// Create a profiler at rest at `current`.
    ///
    /// # Errors
    ///
    /// [`ElementError::InvalidConfiguration`] if `stroke < 0`, `duration < 0`,
    /// `acceleration_time <= 0`, `acceleration_time * (duration - acceleration_time)`
    /// is zero, or the acceleration phase takes more than half the stroke.
    pub fn new(stroke: V, duration: T, acceleration_time: T, current: V) -> ElementResult<Self> {
        ensure_finite(stroke, "stroke").map_err(ElementError::config("stroke must be finite"))?;
        ensure_finite(duration, "duration")
            .map_err(ElementError::config("duration must be finite"))?;
        ensure_finite(acceleration_time, "acceleration time")
            .map_err(ElementError::config("acceleration time must be finite"))?;
        ensure_finite(current, "position")
            .map_err(ElementError::config("initial position must be finite"))?;

        if stroke < V::zero() {
            return Err(ElementError::InvalidConfiguration {
                what: "stroke is negative",
            });
        }
        if duration < T::zero() {
            return Err(ElementError::InvalidConfiguration {
                what: "duration is negative",
            });
        }
        if acceleration_time <= T::zero() {
            return Err(ElementError::InvalidConfiguration {
                what: "acceleration time must be positive",
            });
        }

        let ta: V = cast(acceleration_time);
        let cruise_time = cast::<V, T>(duration) - ta;
        let denominator = ta * cruise_time;
        if denominator == V::zero() {
            return Err(ElementError::InvalidConfiguration {
                what: "acceleration time leaves no cruise phase (zero denominator)",
            });
        }

        let two = V::one() + V::one();
        let max_velocity = stroke / cruise_time;
        let max_acceleration = stroke / denominator;
        let damping_stroke = max_velocity * ta / two;
        if damping_stroke * two > stroke {
            return Err(ElementError::InvalidConfiguration {
                what: "acceleration phase exceeds half the stroke",
            });
        }
        ensure_limits(max_acceleration, max_velocity)?;

        tracing::debug!(
            max_acceleration = cast::<f64, V>(max_acceleration),
            max_velocity = cast::<f64, V>(max_velocity),
            damping_stroke = cast::<f64, V>(damping_stroke),
            "timed linear movement configured"
        );

        Ok(Self {
            max_acceleration,
            max_velocity,
            damping_stroke,
            acceleration_time,
            position: current,
            velocity: V::zero(),
        })
    }

    /// Advance the profile by `dt` toward `target` and return the new position.
    ///
    /// There is no shortcut for `target == position`; a zero deviation falls
    /// into the snap branch and still clears the velocity.
    pub fn step(&mut self, dt: T, target: V) -> V {
        let dt: V = cast(dt);
        let deviation = target - self.position;
        self.velocity = profile_velocity(
            self.velocity,
            deviation,
            self.damping_stroke,
            self.max_acceleration,
            self.max_velocity,
            dt,
        );

        if deviation.abs() <= dt * self.max_velocity {
            self.position = target;
            self.velocity = V::zero();
        } else {
            self.position = self.position + self.velocity * dt;
        }
        self.position
    }

    /// Put the profiler at rest at `position`.
    pub fn reset(&mut self, position: V) {
        self.position = position;
        self.velocity = V::zero();
    }

    pub fn position(&self) -> V {
        self.position
    }

    pub fn velocity(&self) -> V {
        self.velocity
    }

    pub fn max_acceleration(&self) -> V {
        self.max_acceleration
    }

    pub fn max_velocity(&self) -> V {
        self.max_velocity
    }

    /// Braking distance from cruise velocity.
    pub fn damping_stroke(&self) -> V {
        self.damping_stroke
    }

    pub fn acceleration_time(&self) -> T {
        self.acceleration_time
    }
}
