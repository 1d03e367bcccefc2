//! Chassis kinematics.
//!
//! Planar model of a two-wheeled chassis with an optional steering servo.
//! Lateral offset `y` is measured from the line, positive to the right of
//! it; heading is positive clockwise, so a faster left wheel turns right and
//! increases `y`.
//!
//! ```text
//! v     = (v_left + v_right) / 2
//! ω     = (v_left − v_right) / track_width + v · κ · (servo − neutral)
//! θ'    = ω
//! y'    = v · sin θ
//! v_w'  = (target_w − v_w) / τ          (first-order wheel lag)
//! ```

use lf_common::consts::{MAX_DUTY, SERVO_NEUTRAL_DUTY};
use lf_common::control_unit::control::{Command, Direction};

/// Physical constants of the simulated chassis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChassisParams {
    /// Distance between the wheels [mm].
    pub track_width_mm: f64,
    /// Wheel surface speed at full duty [mm/s].
    pub max_wheel_speed_mm_s: f64,
    /// Wheel speed time constant [s].
    pub wheel_tau_s: f64,
    /// Path curvature per percent of servo duty away from neutral [1/mm].
    pub curvature_per_duty: f64,
    /// Servo duty that steers straight [%].
    pub servo_neutral_duty: f64,
}

impl Default for ChassisParams {
    fn default() -> Self {
        Self {
            track_width_mm: 120.0,
            max_wheel_speed_mm_s: 500.0,
            wheel_tau_s: 0.05,
            curvature_per_duty: 0.002,
            servo_neutral_duty: SERVO_NEUTRAL_DUTY,
        }
    }
}

/// Position and heading relative to the line.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    /// Distance travelled along the line [mm].
    pub x_mm: f64,
    /// Lateral offset from the line, positive right [mm].
    pub y_mm: f64,
    /// Heading relative to the line, positive clockwise [rad].
    pub heading_rad: f64,
}

/// Integrated chassis state.
#[derive(Debug, Clone)]
pub struct Chassis {
    params: ChassisParams,
    pose: Pose,
    /// Wheel surface speeds `[left, right]` [mm/s].
    wheel_speed: [f64; 2],
    wheel_target: [f64; 2],
    servo_duty: f64,
}

impl Chassis {
    /// Chassis at rest, parallel to the line at lateral offset `y_mm`.
    pub fn new(params: ChassisParams, y_mm: f64) -> Self {
        Self {
            params,
            pose: Pose {
                y_mm,
                ..Pose::default()
            },
            wheel_speed: [0.0; 2],
            wheel_target: [0.0; 2],
            servo_duty: params.servo_neutral_duty,
        }
    }

    /// Latch new wheel speed targets from a drive command.
    pub fn drive(&mut self, command: &Command) {
        let scale = self.params.max_wheel_speed_mm_s / f64::from(MAX_DUTY);
        let (left, right) = command.effective_duties();
        let sign = match command.direction {
            Direction::Stop => 0.0,
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        };
        self.wheel_target = [
            sign * f64::from(left) * scale,
            sign * f64::from(right) * scale,
        ];
    }

    /// Set the steering servo duty [%]. Non-finite values are ignored.
    pub fn set_servo(&mut self, duty: f64) {
        if duty.is_finite() {
            self.servo_duty = duty;
        }
    }

    /// Integrate over `dt_s` seconds (forward Euler).
    pub fn step(&mut self, dt_s: f64) {
        if !(dt_s.is_finite() && dt_s > 0.0) {
            return;
        }
        let k = (dt_s / self.params.wheel_tau_s).min(1.0);
        for (speed, target) in self.wheel_speed.iter_mut().zip(self.wheel_target) {
            *speed += (target - *speed) * k;
        }

        let [left, right] = self.wheel_speed;
        let v = self.forward_speed();
        let steer = self.servo_duty - self.params.servo_neutral_duty;
        let omega = (left - right) / self.params.track_width_mm
            + v * self.params.curvature_per_duty * steer;

        self.pose.heading_rad += omega * dt_s;
        self.pose.x_mm += v * self.pose.heading_rad.cos() * dt_s;
        self.pose.y_mm += v * self.pose.heading_rad.sin() * dt_s;
    }

    /// Mean wheel surface speed [mm/s].
    #[inline]
    pub fn forward_speed(&self) -> f64 {
        (self.wheel_speed[0] + self.wheel_speed[1]) / 2.0
    }

    /// Wheel surface speeds `[left, right]` [mm/s].
    #[inline]
    pub fn wheel_speeds(&self) -> [f64; 2] {
        self.wheel_speed
    }

    /// Current servo duty [%].
    #[inline]
    pub fn servo_duty(&self) -> f64 {
        self.servo_duty
    }

    /// Current pose.
    #[inline]
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Lateral line offset of a body point `ahead_mm` forward and
    /// `right_mm` to the right of the axle centre.
    pub fn lateral_of(&self, ahead_mm: f64, right_mm: f64) -> f64 {
        let (sin, cos) = self.pose.heading_rad.sin_cos();
        self.pose.y_mm + ahead_mm * sin + right_mm * cos
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
