//! Bisection on the normalized fourth-order step response.

use ds_solver::{BisectionConfig, SolverError, bisect};

fn settle_residual(x: f64, epsilon: f64) -> f64 {
    (-x).exp() * (1.0 + x + 0.5 * x * x + x * x * x / 6.0) - epsilon
}

#[test]
fn roots_for_common_tolerances() {
    let config = BisectionConfig::default();
    for (tolerance, expected) in [
        (0.99, 10.045_117_514_831_645),
        (0.95, 7.753_656_527_932_726),
        (0.5, 3.672_060_748_850_896),
    ] {
        let epsilon = 1.0 - tolerance;
        let result = bisect(|x| settle_residual(x, epsilon), 0.0, 10.0, &config).unwrap();
        assert!(
            (result.root - expected).abs() < 1e-8,
            "tolerance {tolerance}: {}",
            result.root
        );
        assert!(result.residual.abs() < 1e-12);
    }
}

#[test]
fn negative_epsilon_has_no_bracket() {
    let err = bisect(
        |x| settle_residual(x, -0.5),
        0.0,
        10.0,
        &BisectionConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SolverError::BracketNotFound { .. }));
}

#[test]
fn tighter_bracket_limit_fails_earlier() {
    // root near 10.05 needs high = 20, which a limit of 15 forbids
    let config = BisectionConfig {
        bracket_limit: 15.0,
        ..BisectionConfig::default()
    };
    assert!(bisect(|x| settle_residual(x, 0.01), 0.0, 10.0, &config).is_err());
}
