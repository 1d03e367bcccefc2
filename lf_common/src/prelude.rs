//! Prelude module for common re-exports.
//!
//! ```rust
//! use lf_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig};
pub use crate::control_unit::config::{RobotConfig, Strategy, TimeStep, TuningTarget};

// ─── Control Types ──────────────────────────────────────────────────
pub use crate::control_unit::control::{
    Coefficient, Command, Direction, Duty, IncPidParameters, PidParameters,
};
pub use crate::control_unit::sensor::{SensorBits, SensorPolarity};

// ─── Drivers ────────────────────────────────────────────────────────
pub use crate::hal::driver::{HalError, RobotDriver};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{DECISION_MASK, MAX_DUTY, SENSOR_COUNT};
