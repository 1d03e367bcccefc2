//! Simulation driver module.
//!
//! Software model of the robot for development and testing without
//! hardware: kinematic chassis, IR line array, encoders and camera.

mod driver;
mod physics;

pub use driver::{SensorParams, SimulatedRobot};
pub use physics::{Chassis, ChassisParams, Pose};

use lf_common::control_unit::config::DriverConfig;
use lf_common::hal::driver::{HalError, RobotDriver};

/// Factory function to create a simulation driver instance.
///
/// The robot starts at rest at `initial_offset_mm` from the line.
pub fn create_driver(config: &DriverConfig) -> Result<Box<dyn RobotDriver>, HalError> {
    if !config.initial_offset_mm.is_finite() {
        return Err(HalError::ConfigError(format!(
            "[driver] initial_offset_mm must be finite, got {}",
            config.initial_offset_mm
        )));
    }
    Ok(Box::new(SimulatedRobot::new(config.initial_offset_mm)))
}
