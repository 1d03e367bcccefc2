//! Positional PID controller.
//!
//! Computes an absolute output from the current error, the accumulated
//! error and the last error difference. Two clamps apply: the scaled
//! integral term `ki * integral` is bounded to `[min_integral, max_integral]`
//! and the sum to `[min_output, max_output]`.
//!
//! The raw accumulator is never clamped. Long saturated runs can therefore
//! leave a large hidden integral that keeps the integral term pinned at its
//! bound for a while after the error reverses sign.

use lf_common::control_unit::control::{Coefficient, PidParameters};

use super::{PidGains, saturate, usable_dt};

/// Individual terms of the last `compute` call.
///
/// `i` is the value after the integral clamp.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PidTerms {
    pub p: f64,
    pub i: f64,
    pub d: f64,
}

/// Positional PID controller state.
#[derive(Debug, Clone)]
pub struct PositionalPid {
    gains: PidGains,
    target: f64,
    /// Most recent error sample.
    error: f64,
    /// Previous error sample (for derivative).
    last_error: f64,
    /// Raw error accumulator.
    integral: f64,
    min_integral: f64,
    max_integral: f64,
    min_output: f64,
    max_output: f64,
    terms: PidTerms,
    output: f64,
}

impl PositionalPid {
    /// Create a controller from its initial parameters.
    pub fn new(params: &PidParameters) -> Self {
        let mut pid = Self {
            gains: PidGains::default(),
            target: 0.0,
            error: 0.0,
            last_error: 0.0,
            integral: 0.0,
            min_integral: 0.0,
            max_integral: 0.0,
            min_output: 0.0,
            max_output: 0.0,
            terms: PidTerms::default(),
            output: 0.0,
        };
        pid.init(params);
        pid
    }

    /// Set gains, target and bounds; zero the error history and integral.
    pub fn init(&mut self, params: &PidParameters) {
        self.gains = PidGains {
            kp: params.kp,
            ki: params.ki,
            kd: params.kd,
        };
        self.target = params.target;
        self.min_integral = params.min_integral;
        self.max_integral = params.max_integral;
        self.min_output = params.min_output;
        self.max_output = params.max_output;
        self.error = 0.0;
        self.last_error = 0.0;
        self.integral = 0.0;
        self.terms = PidTerms::default();
        self.output = saturate(0.0, self.min_output, self.max_output);
    }

    /// Replace the setpoint. Integral and error history are kept.
    #[inline]
    pub fn reset_target(&mut self, target: f64) {
        self.target = target;
    }

    /// Replace exactly one gain.
    #[inline]
    pub fn reset_coefficient(&mut self, which: Coefficient, value: f64) {
        self.gains.set(which, value);
    }

    /// One control step where a call is one unit of time.
    #[inline]
    pub fn compute(&mut self, input: f64) -> f64 {
        self.error = self.target - input;
        self.integral += self.error;
        self.finish(self.error - self.last_error)
    }

    /// One control step over an explicit elapsed time `dt` [s].
    ///
    /// The integral accumulates `error * dt` and the derivative uses
    /// `(error - last_error) / dt`. With `dt == 1.0` this is identical to
    /// [`compute`](Self::compute). A non-finite or non-positive `dt` leaves
    /// the state untouched and returns the previous output.
    #[inline]
    pub fn compute_dt(&mut self, input: f64, dt: f64) -> f64 {
        if !usable_dt(dt) {
            return self.output;
        }
        self.error = self.target - input;
        self.integral += self.error * dt;
        self.finish((self.error - self.last_error) / dt)
    }

    fn finish(&mut self, error_rate: f64) -> f64 {
        let p = self.gains.kp * self.error;
        let i = saturate(
            self.gains.ki * self.integral,
            self.min_integral,
            self.max_integral,
        );
        let d = self.gains.kd * error_rate;

        self.last_error = self.error;
        self.terms = PidTerms { p, i, d };
        self.output = saturate(p + i + d, self.min_output, self.max_output);
        self.output
    }

    #[inline]
    pub fn gains(&self) -> PidGains {
        self.gains
    }

    #[inline]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[inline]
    pub fn error(&self) -> f64 {
        self.error
    }

    #[inline]
    pub fn last_error(&self) -> f64 {
        self.last_error
    }

    /// Raw (unclamped) error accumulator.
    #[inline]
    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// Terms of the last step, integral term after clamping.
    #[inline]
    pub fn terms(&self) -> PidTerms {
        self.terms
    }

    /// Last returned output.
    #[inline]
    pub fn output(&self) -> f64 {
        self.output
    }

    /// Output bounds `(min, max)`.
    #[inline]
    pub fn output_bounds(&self) -> (f64, f64) {
        (self.min_output, self.max_output)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
