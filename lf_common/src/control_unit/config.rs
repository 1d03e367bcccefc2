//! Runtime configuration document for the line-follower.
//!
//! All sections except `[shared]` default to the reference chassis values,
//! so a minimal file only names the service. Unknown fields are rejected.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::config::{ConfigError, ConfigLoader, SharedConfig};
use crate::consts::DEFAULT_PERIOD_US;

use super::control::{IncPidParameters, PidParameters};
use super::sensor::SensorPolarity;

// ─── Enums ──────────────────────────────────────────────────────────

/// How elapsed time enters the PID integral and derivative terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeStep {
    /// One `compute` call is one unit of time.
    #[default]
    Iteration,
    /// `dt` measured on the monotonic clock, in seconds.
    Measured,
}

/// Control strategy driven by the cycle runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Discrete line following through the track decision table.
    #[default]
    Track,
    /// Positional PID on wheel speed plus incremental PID on steering.
    Pid,
}

/// Controller overwritten by the serial tuning protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TuningTarget {
    #[default]
    Speed,
    Steering,
}

// ─── Sections ───────────────────────────────────────────────────────

/// `[cycle]` section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CycleConfig {
    /// Loop period [µs]; 0 runs the loop as fast as it polls.
    pub period_us: u64,
    pub timestep: TimeStep,
    pub strategy: Strategy,
    /// Cycles between statistics log lines (0 = never).
    pub stats_interval: u64,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            period_us: DEFAULT_PERIOD_US,
            timestep: TimeStep::Iteration,
            strategy: Strategy::Track,
            stats_interval: 1000,
        }
    }
}

/// `[sensor]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SensorConfig {
    pub polarity: SensorPolarity,
}

/// `[speed_filter]` section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// EWMA weight of the newest sample, `[0, 1]`.
    pub alpha: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self { alpha: 1.0 }
    }
}

/// `[tuning]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TuningConfig {
    pub target: TuningTarget,
}

/// `[driver]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriverConfig {
    /// Registered driver name.
    pub name: String,
    /// Raw readings replayed by the `scripted` driver.
    pub script: Vec<u8>,
    /// Initial lateral offset of the simulated robot [mm], positive = right of the line.
    pub initial_offset_mm: f64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            name: "simulation".to_string(),
            script: Vec::new(),
            initial_offset_mm: 0.0,
        }
    }
}

// ─── Top-Level Config ───────────────────────────────────────────────

/// Complete runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RobotConfig {
    pub shared: SharedConfig,
    #[serde(default)]
    pub cycle: CycleConfig,
    #[serde(default)]
    pub sensor: SensorConfig,
    #[serde(default)]
    pub speed_pid: PidParameters,
    #[serde(default)]
    pub steering_pid: IncPidParameters,
    #[serde(default)]
    pub speed_filter: FilterConfig,
    #[serde(default)]
    pub tuning: TuningConfig,
    #[serde(default)]
    pub driver: DriverConfig,
}

impl RobotConfig {
    /// Configuration with every section at its default.
    pub fn with_service_name(service_name: impl Into<String>) -> Self {
        Self {
            shared: SharedConfig {
                log_level: Default::default(),
                service_name: service_name.into(),
            },
            cycle: CycleConfig::default(),
            sensor: SensorConfig::default(),
            speed_pid: PidParameters::default(),
            steering_pid: IncPidParameters::default(),
            speed_filter: FilterConfig::default(),
            tuning: TuningConfig::default(),
            driver: DriverConfig::default(),
        }
    }

    /// Semantic validation across all sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.speed_pid.validate("speed_pid")?;
        self.steering_pid.validate("steering_pid")?;

        let alpha = self.speed_filter.alpha;
        if !(0.0..=1.0).contains(&alpha) {
            return Err(ConfigError::ValidationError(format!(
                "[speed_filter] alpha must be within [0, 1], got {alpha}"
            )));
        }
        if self.driver.name.is_empty() {
            return Err(ConfigError::ValidationError(
                "[driver] name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Load a TOML file and validate it.
    pub fn load_validated(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        debug!(
            path = %path.display(),
            strategy = ?config.cycle.strategy,
            driver = %config.driver.name,
            "robot config loaded"
        );
        Ok(config)
    }

    /// Parse a TOML string and validate it.
    pub fn from_toml_validated(content: &str) -> Result<Self, ConfigError> {
        let config = Self::from_toml(content)?;
        config.validate()?;
        Ok(config)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
