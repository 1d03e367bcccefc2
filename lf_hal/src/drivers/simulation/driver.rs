//! Simulated robot driver.
//!
//! Wraps a [`Chassis`] with the robot's sensors:
//! - a five-channel IR array mounted ahead of the axle, active-low (a
//!   channel over the line reads 0),
//! - wheel encoders reporting mean surface speed in counts,
//! - a camera reporting the line position across its image.

use std::time::Duration;

use lf_common::consts::SENSOR_COUNT;
use lf_common::control_unit::control::Command;
use lf_common::control_unit::sensor::SensorBits;
use lf_common::hal::driver::RobotDriver;
use tracing::trace;

use super::physics::{Chassis, ChassisParams, Pose};

/// Sensor placement and scaling of the simulated robot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorParams {
    /// Spacing between adjacent IR channels [mm].
    pub ir_spacing_mm: f64,
    /// Distance of the IR array ahead of the axle [mm].
    pub ir_lookahead_mm: f64,
    /// Half the width of the line [mm].
    pub line_half_width_mm: f64,
    /// Encoder counts per millimetre of travel.
    pub encoder_counts_per_mm: f64,
    /// Camera reading when the line is straight under the axle.
    pub camera_center: f64,
    /// Camera units per millimetre of lateral offset.
    pub camera_per_mm: f64,
}

impl Default for SensorParams {
    fn default() -> Self {
        Self {
            ir_spacing_mm: 15.0,
            ir_lookahead_mm: 60.0,
            line_half_width_mm: 10.0,
            encoder_counts_per_mm: 1.48,
            camera_center: 70.0,
            camera_per_mm: 1.0,
        }
    }
}

/// Simulation driver implementing `RobotDriver`.
pub struct SimulatedRobot {
    chassis: Chassis,
    sensors: SensorParams,
    last_command: Command,
}

impl SimulatedRobot {
    /// Robot at rest, parallel to the line at lateral offset `y_mm`.
    pub fn new(y_mm: f64) -> Self {
        Self::with_params(ChassisParams::default(), SensorParams::default(), y_mm)
    }

    /// Robot with explicit chassis and sensor parameters.
    pub fn with_params(chassis: ChassisParams, sensors: SensorParams, y_mm: f64) -> Self {
        Self {
            chassis: Chassis::new(chassis, y_mm),
            sensors,
            last_command: Command::STOP,
        }
    }

    /// Current pose.
    #[inline]
    pub fn pose(&self) -> Pose {
        self.chassis.pose()
    }

    /// Underlying chassis.
    #[inline]
    pub fn chassis(&self) -> &Chassis {
        &self.chassis
    }

    /// Last command applied.
    #[inline]
    pub fn last_command(&self) -> Command {
        self.last_command
    }

    /// Channel offsets to the right of the centre line, left-2 first [mm].
    fn channel_offsets(&self) -> [f64; SENSOR_COUNT] {
        let s = self.sensors.ir_spacing_mm;
        [-2.0 * s, -s, 0.0, s, 2.0 * s]
    }
}

impl Default for SimulatedRobot {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl RobotDriver for SimulatedRobot {
    fn name(&self) -> &'static str {
        "simulation"
    }

    fn read_line(&mut self) -> SensorBits {
        let ahead = self.sensors.ir_lookahead_mm;
        let half_width = self.sensors.line_half_width_mm;
        let levels = self
            .channel_offsets()
            .map(|right| self.chassis.lateral_of(ahead, right).abs() >= half_width);
        SensorBits::pack(levels)
    }

    fn read_speed(&mut self) -> f64 {
        self.chassis.forward_speed() * self.sensors.encoder_counts_per_mm
    }

    fn read_track_offset(&mut self) -> f64 {
        self.sensors.camera_center + self.chassis.pose().y_mm * self.sensors.camera_per_mm
    }

    fn apply(&mut self, command: &Command) {
        self.last_command = *command;
        self.chassis.drive(command);
    }

    fn steer(&mut self, duty: f64) {
        self.chassis.set_servo(duty);
    }

    fn cycle(&mut self, dt: Duration) {
        self.chassis.step(dt.as_secs_f64());
        let pose = self.chassis.pose();
        trace!(
            y_mm = pose.y_mm,
            heading_rad = pose.heading_rad,
            speed = self.chassis.forward_speed(),
            "sim step"
        );
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
