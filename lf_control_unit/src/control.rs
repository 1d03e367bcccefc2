//! Control engine root.
//!
//! Positional PID, incremental PID and the EWMA filter. All of them are
//! total over floating-point input; out-of-range values are handled only
//! by clamping at the configured bounds.

pub mod filters;
pub mod incremental;
pub mod pid;

use lf_common::control_unit::control::Coefficient;

/// Proportional, integral and derivative gains.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl PidGains {
    /// Overwrite exactly one gain.
    #[inline]
    pub fn set(&mut self, which: Coefficient, value: f64) {
        match which {
            Coefficient::Kp => self.kp = value,
            Coefficient::Ki => self.ki = value,
            Coefficient::Kd => self.kd = value,
        }
    }

    /// Read one gain.
    #[inline]
    pub fn get(&self, which: Coefficient) -> f64 {
        match which {
            Coefficient::Kp => self.kp,
            Coefficient::Ki => self.ki,
            Coefficient::Kd => self.kd,
        }
    }
}

/// Clamp `value` into `[min, max]`.
///
/// Upper bound is tested first, then the lower one. Never panics, even when
/// `min > max`; NaN passes through.
#[inline]
pub fn saturate(value: f64, min: f64, max: f64) -> f64 {
    if value > max {
        max
    } else if value < min {
        min
    } else {
        value
    }
}

/// Returns true if `dt` can scale the integral and derivative terms.
#[inline]
pub(crate) fn usable_dt(dt: f64) -> bool {
    dt.is_finite() && dt > 0.0
}
