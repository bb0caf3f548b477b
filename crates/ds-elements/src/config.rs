//! Serializable element definitions.
//!
//! An [`ElementConfig`] names one element and its tuning in `f64`. Building
//! it runs the same validation as the element constructors and yields an
//! [`Element`] that can be stepped without knowing the concrete type.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ElementError, ElementResult};
use crate::{DampedLinearMovement, FirstOrderLag, FourthOrderLag, TimedLinearMovement};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ElementConfig {
    DampedMovement {
        stroke: f64,
        duration_s: f64,
        damping_stroke: f64,
        #[serde(default)]
        initial_position: f64,
    },
    TimedMovement {
        stroke: f64,
        duration_s: f64,
        acceleration_time_s: f64,
        #[serde(default)]
        initial_position: f64,
    },
    FirstOrderLag {
        #[serde(default = "default_gain")]
        gain: f64,
        tau_s: f64,
        #[serde(default)]
        initial_output: f64,
    },
    FourthOrderLag {
        #[serde(default = "default_gain")]
        gain: f64,
        settle_time_s: f64,
        settle_tolerance: f64,
    },
}

fn default_gain() -> f64 {
    1.0
}

impl ElementConfig {
    pub fn from_yaml_str(content: &str) -> ElementResult<Self> {
        serde_yaml::from_str(content).map_err(|e| ElementError::Config {
            what: format!("YAML: {e}"),
        })
    }

    pub fn from_json_str(content: &str) -> ElementResult<Self> {
        serde_json::from_str(content).map_err(|e| ElementError::Config {
            what: format!("JSON: {e}"),
        })
    }

    pub fn to_yaml_string(&self) -> ElementResult<String> {
        serde_yaml::to_string(self).map_err(|e| ElementError::Config {
            what: format!("YAML: {e}"),
        })
    }

    pub fn to_json_string(&self) -> ElementResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ElementError::Config {
            what: format!("JSON: {e}"),
        })
    }

    /// Construct the element, validating its tuning.
    pub fn build(&self) -> ElementResult<Element> {
        let element = match *self {
            ElementConfig::DampedMovement {
                stroke,
                duration_s,
                damping_stroke,
                initial_position,
            } => Element::DampedMovement(DampedLinearMovement::new(
                stroke,
                duration_s,
                damping_stroke,
                initial_position,
            )?),
            ElementConfig::TimedMovement {
                stroke,
                duration_s,
                acceleration_time_s,
                initial_position,
            } => Element::TimedMovement(TimedLinearMovement::new(
                stroke,
                duration_s,
                acceleration_time_s,
                initial_position,
            )?),
            ElementConfig::FirstOrderLag {
                gain,
                tau_s,
                initial_output,
            } => Element::FirstOrderLag(FirstOrderLag::new(gain, tau_s, initial_output)?),
            ElementConfig::FourthOrderLag {
                gain,
                settle_time_s,
                settle_tolerance,
            } => Element::FourthOrderLag(FourthOrderLag::new(
                gain,
                settle_time_s,
                settle_tolerance,
            )?),
        };
        Ok(element)
    }
}

/// Read and parse a YAML element definition.
pub fn load_yaml(path: &Path) -> ElementResult<ElementConfig> {
    let content = read(path)?;
    ElementConfig::from_yaml_str(&content)
}

/// Read and parse a JSON element definition.
pub fn load_json(path: &Path) -> ElementResult<ElementConfig> {
    let content = read(path)?;
    ElementConfig::from_json_str(&content)
}

fn read(path: &Path) -> ElementResult<String> {
    std::fs::read_to_string(path).map_err(|e| ElementError::Config {
        what: format!("{}: {e}", path.display()),
    })
}

/// A built element in `f64`, stepped through one interface.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    DampedMovement(DampedLinearMovement),
    TimedMovement(TimedLinearMovement),
    FirstOrderLag(FirstOrderLag),
    FourthOrderLag(FourthOrderLag),
}

impl Element {
    /// Advance by `dt` toward `target`.
    ///
    /// Only the first-order lag validates its inputs and can fail here.
    pub fn step(&mut self, dt: f64, target: f64) -> ElementResult<f64> {
        match self {
            Element::DampedMovement(m) => Ok(m.step(dt, target)),
            Element::TimedMovement(m) => Ok(m.step(dt, target)),
            Element::FirstOrderLag(lag) => lag.step(dt, target),
            Element::FourthOrderLag(lag) => Ok(lag.step(dt, target)),
        }
    }

    /// Current position (movements) or filter output (lags).
    pub fn output(&self) -> f64 {
        match self {
            Element::DampedMovement(m) => m.position(),
            Element::TimedMovement(m) => m.position(),
            Element::FirstOrderLag(lag) => lag.output(),
            Element::FourthOrderLag(lag) => lag.output(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Element::DampedMovement(_) => "DampedMovement",
            Element::TimedMovement(_) => "TimedMovement",
            Element::FirstOrderLag(_) => "FirstOrderLag",
            Element::FourthOrderLag(_) => "FourthOrderLag",
        }
    }
}
