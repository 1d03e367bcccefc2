//! Actuation and controller parameter types.
//!
//! Defines the wheel `Command` produced every cycle, the `Coefficient`
//! selector consumed by runtime tuning, and the parameter blocks that
//! initialise the positional and incremental PID controllers.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::consts::MAX_DUTY;

// ─── Direction ──────────────────────────────────────────────────────

/// Drive direction for both wheels.
///
/// `Stop` de-energises the motors; duty values are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Stop,
    Forward,
    Backward,
}

// ─── Duty ───────────────────────────────────────────────────────────

/// PWM duty cycle as an integer percentage, always in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duty(u8);

impl Duty {
    /// 0 %.
    pub const ZERO: Self = Self(0);

    /// 100 %.
    pub const FULL: Self = Self(MAX_DUTY);

    /// Build a duty, saturating values above 100.
    #[inline]
    pub const fn new_saturating(percent: u8) -> Self {
        if percent > MAX_DUTY {
            Self(MAX_DUTY)
        } else {
            Self(percent)
        }
    }

    /// Build a duty, rejecting values above 100.
    #[inline]
    pub const fn new(percent: u8) -> Option<Self> {
        if percent > MAX_DUTY {
            None
        } else {
            Some(Self(percent))
        }
    }

    /// Convert a controller output into a duty.
    ///
    /// Clamps to `[0, 100]` and rounds to the nearest percent. NaN maps to 0.
    #[inline]
    pub fn saturating(value: f64) -> Self {
        if value.is_nan() || value <= 0.0 {
            Self::ZERO
        } else if value >= MAX_DUTY as f64 {
            Self::FULL
        } else {
            Self(value.round() as u8)
        }
    }

    /// Duty as a percentage.
    #[inline]
    pub const fn percent(self) -> u8 {
        self.0
    }
}

// ─── Command ────────────────────────────────────────────────────────

/// Wheel command: direction plus left/right duty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Command {
    pub direction: Direction,
    pub left: Duty,
    pub right: Duty,
}

impl Command {
    /// Both wheels de-energised.
    pub const STOP: Self = Self {
        direction: Direction::Stop,
        left: Duty::ZERO,
        right: Duty::ZERO,
    };

    /// Drive forward with the given duties.
    #[inline]
    pub const fn forward(left: Duty, right: Duty) -> Self {
        Self {
            direction: Direction::Forward,
            left,
            right,
        }
    }

    /// Drive backward with the given duties.
    #[inline]
    pub const fn backward(left: Duty, right: Duty) -> Self {
        Self {
            direction: Direction::Backward,
            left,
            right,
        }
    }

    /// Duties actually delivered to the motors, `(0, 0)` when stopped.
    #[inline]
    pub const fn effective_duties(&self) -> (u8, u8) {
        match self.direction {
            Direction::Stop => (0, 0),
            Direction::Forward | Direction::Backward => (self.left.percent(), self.right.percent()),
        }
    }

    /// Returns true if this command de-energises the motors.
    #[inline]
    pub const fn is_stop(&self) -> bool {
        matches!(self.direction, Direction::Stop)
    }
}

// ─── Coefficient Selector ───────────────────────────────────────────

/// Which PID gain a tuning operation overwrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coefficient {
    Kp,
    Ki,
    Kd,
}

impl Coefficient {
    /// Map a tuning-protocol selector byte (`p`, `i`, `d`).
    #[inline]
    pub const fn from_selector(byte: u8) -> Option<Self> {
        match byte {
            b'p' => Some(Self::Kp),
            b'i' => Some(Self::Ki),
            b'd' => Some(Self::Kd),
            _ => None,
        }
    }

    /// The selector byte used on the tuning link.
    #[inline]
    pub const fn selector(self) -> u8 {
        match self {
            Self::Kp => b'p',
            Self::Ki => b'i',
            Self::Kd => b'd',
        }
    }
}

/// Legacy integer tags: `1 = Kp`, `2 = Ki`, `3 = Kd`.
impl TryFrom<u8> for Coefficient {
    type Error = u8;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            1 => Ok(Self::Kp),
            2 => Ok(Self::Ki),
            3 => Ok(Self::Kd),
            other => Err(other),
        }
    }
}

// ─── Controller Parameters ──────────────────────────────────────────

/// Initial parameters for a positional PID controller.
///
/// `min_integral`/`max_integral` bound the scaled integral term
/// (`ki * integral`), not the raw accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PidParameters {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    pub target: f64,
    pub min_integral: f64,
    pub max_integral: f64,
    pub min_output: f64,
    pub max_output: f64,
}

impl Default for PidParameters {
    /// Wheel-speed loop of the reference chassis.
    fn default() -> Self {
        Self {
            kp: 0.015,
            ki: 0.014,
            kd: 0.001,
            target: 370.0,
            min_integral: -1850.0,
            max_integral: 1850.0,
            min_output: 0.0,
            max_output: 100.0,
        }
    }
}

impl PidParameters {
    /// Validate gains and bounds.
    pub fn validate(&self, section: &str) -> Result<(), ConfigError> {
        check_finite(section, "kp", self.kp)?;
        check_finite(section, "ki", self.ki)?;
        check_finite(section, "kd", self.kd)?;
        check_finite(section, "target", self.target)?;
        check_bounds(section, "integral", self.min_integral, self.max_integral)?;
        check_bounds(section, "output", self.min_output, self.max_output)
    }
}

/// Initial parameters for an incremental PID controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IncPidParameters {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    pub target: f64,
    pub min_output: f64,
    pub max_output: f64,
}

impl Default for IncPidParameters {
    /// Steering-servo loop of the reference chassis.
    fn default() -> Self {
        Self {
            kp: 0.05,
            ki: 0.0,
            kd: 0.01,
            target: 70.0,
            min_output: 4.5,
            max_output: 9.5,
        }
    }
}

impl IncPidParameters {
    /// Validate gains and bounds.
    pub fn validate(&self, section: &str) -> Result<(), ConfigError> {
        check_finite(section, "kp", self.kp)?;
        check_finite(section, "ki", self.ki)?;
        check_finite(section, "kd", self.kd)?;
        check_finite(section, "target", self.target)?;
        check_bounds(section, "output", self.min_output, self.max_output)
    }
}

fn check_finite(section: &str, field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "[{section}] {field} must be finite, got {value}"
        )))
    }
}

fn check_bounds(section: &str, name: &str, min: f64, max: f64) -> Result<(), ConfigError> {
    check_finite(section, &format!("min_{name}"), min)?;
    check_finite(section, &format!("max_{name}"), max)?;
    if min > max {
        return Err(ConfigError::ValidationError(format!(
            "[{section}] min_{name} ({min}) > max_{name} ({max})"
        )));
    }
    Ok(())
}

// ─── Tests ──────────────────────────────────────────────────────────
