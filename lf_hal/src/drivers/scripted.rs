//! Scripted replay driver.
//!
//! Returns a fixed sequence of raw line-sensor readings, one per
//! `read_line` call, wrapping around at the end. Speed and track offset
//! read as constants. Commands are recorded, not executed.

use lf_common::consts::SENSOR_MASK;
use lf_common::control_unit::config::DriverConfig;
use lf_common::control_unit::control::Command;
use lf_common::control_unit::sensor::SensorBits;
use lf_common::hal::driver::{HalError, RobotDriver};

/// Track offset reported by the scripted driver (camera centre).
pub const SCRIPTED_TRACK_OFFSET: f64 = 70.0;

/// Replay driver implementing `RobotDriver`.
pub struct ScriptedDriver {
    script: Vec<SensorBits>,
    cursor: usize,
    last_command: Command,
    servo_duty: Option<f64>,
    applied: u64,
}

impl ScriptedDriver {
    /// Create a driver replaying `script`.
    ///
    /// # Errors
    /// `HalError::ConfigError` if the script is empty or holds a value with
    /// bits above the five sensor channels.
    pub fn new(script: &[u8]) -> Result<Self, HalError> {
        if script.is_empty() {
            return Err(HalError::ConfigError(
                "[driver] script must not be empty for the scripted driver".to_string(),
            ));
        }
        if let Some(bad) = script.iter().find(|&&raw| raw & !SENSOR_MASK != 0) {
            return Err(HalError::ConfigError(format!(
                "[driver] script value {bad:#04x} exceeds the sensor mask {SENSOR_MASK:#04x}"
            )));
        }
        Ok(Self {
            script: script.iter().map(|&raw| SensorBits::from_raw(raw)).collect(),
            cursor: 0,
            last_command: Command::STOP,
            servo_duty: None,
            applied: 0,
        })
    }

    /// Last command applied.
    #[inline]
    pub fn last_command(&self) -> Command {
        self.last_command
    }

    /// Last servo duty set, if any.
    #[inline]
    pub fn servo_duty(&self) -> Option<f64> {
        self.servo_duty
    }

    /// Number of commands applied so far.
    #[inline]
    pub fn applied_count(&self) -> u64 {
        self.applied
    }
}

impl RobotDriver for ScriptedDriver {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn read_line(&mut self) -> SensorBits {
        let reading = self.script[self.cursor];
        self.cursor = (self.cursor + 1) % self.script.len();
        reading
    }

    fn read_speed(&mut self) -> f64 {
        0.0
    }

    fn read_track_offset(&mut self) -> f64 {
        SCRIPTED_TRACK_OFFSET
    }

    fn apply(&mut self, command: &Command) {
        self.last_command = *command;
        self.applied += 1;
    }

    fn steer(&mut self, duty: f64) {
        self.servo_duty = Some(duty);
    }
}

/// Factory function to create a scripted driver from `[driver] script`.
pub fn create_driver(config: &DriverConfig) -> Result<Box<dyn RobotDriver>, HalError> {
    Ok(Box::new(ScriptedDriver::new(&config.script)?))
}
