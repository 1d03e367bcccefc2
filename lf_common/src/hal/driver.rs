//! Robot driver trait and error types.
//!
//! This module defines:
//! - `RobotDriver` trait - Interface for pluggable sensor/actuator backends
//! - `HalError` enum - Error types for driver creation
//! - `DriverFactory` type alias - Factory function type

use std::time::Duration;
use thiserror::Error;

use crate::control_unit::config::DriverConfig;
use crate::control_unit::control::Command;
use crate::control_unit::sensor::SensorBits;

/// Error types for driver operations.
#[derive(Debug, Clone, Error)]
pub enum HalError {
    /// Driver not found
    #[error("Driver not found: {0}")]
    DriverNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Factory function type for creating driver instances.
pub type DriverFactory = fn(&DriverConfig) -> Result<Box<dyn RobotDriver>, HalError>;

/// Trait defining the interface between the control unit and the robot.
///
/// Reads never fail: a hardware read is assumed to always succeed, so the
/// sensor methods have no error channel.
///
/// # Lifecycle
///
/// Each cycle the runner calls, in order: the `read_*` methods, then
/// `apply` (and `steer` for the PID strategy), then `cycle` with the time
/// elapsed since the previous cycle.
pub trait RobotDriver: Send {
    /// Returns the driver's unique identifier (e.g., "simulation").
    fn name(&self) -> &'static str;

    /// Read the 5-channel line sensor as wired.
    fn read_line(&mut self) -> SensorBits;

    /// Read the wheel-speed process variable [encoder units].
    fn read_speed(&mut self) -> f64;

    /// Read the line position seen by the steering sensor [camera units].
    fn read_track_offset(&mut self) -> f64;

    /// Drive both wheels. `Stop` de-energises the motors and ignores duties.
    fn apply(&mut self, command: &Command);

    /// Set the steering servo duty [%].
    ///
    /// Default: no-op (differential chassis without a servo).
    fn steer(&mut self, _duty: f64) {}

    /// Advance by `dt`. Hardware drivers ignore this.
    fn cycle(&mut self, _dt: Duration) {}
}

impl<T: RobotDriver + ?Sized> RobotDriver for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn read_line(&mut self) -> SensorBits {
        (**self).read_line()
    }

    fn read_speed(&mut self) -> f64 {
        (**self).read_speed()
    }

    fn read_track_offset(&mut self) -> f64 {
        (**self).read_track_offset()
    }

    fn apply(&mut self, command: &Command) {
        (**self).apply(command)
    }

    fn steer(&mut self, duty: f64) {
        (**self).steer(duty)
    }

    fn cycle(&mut self, dt: Duration) {
        (**self).cycle(dt)
    }
}
