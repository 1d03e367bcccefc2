//! Incremental (velocity-form) PID controller.
//!
//! Each step computes an output delta from the last three error samples and
//! adds it to a running command. The running command is clamped in place, so
//! saturation is sticky: increments pushing further past a bound leave it
//! pinned until an increment of the opposite sign moves it back inside.

use lf_common::control_unit::control::{Coefficient, IncPidParameters};

use super::{PidGains, saturate, usable_dt};

/// Incremental PID controller state.
#[derive(Debug, Clone)]
pub struct IncrementalPid {
    gains: PidGains,
    target: f64,
    /// Current error sample.
    error: f64,
    /// Error one step back.
    last_error: f64,
    /// Error two steps back.
    prev_error: f64,
    min_output: f64,
    max_output: f64,
    /// Running command, persisted across calls.
    output: f64,
}

impl IncrementalPid {
    /// Create a controller from its initial parameters.
    pub fn new(params: &IncPidParameters) -> Self {
        let mut pid = Self {
            gains: PidGains::default(),
            target: 0.0,
            error: 0.0,
            last_error: 0.0,
            prev_error: 0.0,
            min_output: 0.0,
            max_output: 0.0,
            output: 0.0,
        };
        pid.init(params);
        pid
    }

    /// Set gains, target and bounds; zero the error history and the running
    /// command. The first step clamps the command into range.
    pub fn init(&mut self, params: &IncPidParameters) {
        self.gains = PidGains {
            kp: params.kp,
            ki: params.ki,
            kd: params.kd,
        };
        self.target = params.target;
        self.min_output = params.min_output;
        self.max_output = params.max_output;
        self.error = 0.0;
        self.last_error = 0.0;
        self.prev_error = 0.0;
        self.output = 0.0;
    }

    /// Replace the setpoint. History and running command are kept.
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
        let p = self.gains.kp * (self.error - self.last_error);
        let i = self.gains.ki * self.error;
        let d = self.gains.kd * (self.error - 2.0 * self.last_error + self.prev_error);
        self.accumulate(p + i + d)
    }

    /// One control step over an explicit elapsed time `dt` [s].
    ///
    /// `i = ki * error * dt`, `d = kd * second_difference / dt`. With
    /// `dt == 1.0` this is identical to [`compute`](Self::compute). A
    /// non-finite or non-positive `dt` leaves the state untouched and returns
    /// the running command.
    #[inline]
    pub fn compute_dt(&mut self, input: f64, dt: f64) -> f64 {
        if !usable_dt(dt) {
            return self.output;
        }
        self.error = self.target - input;
        let p = self.gains.kp * (self.error - self.last_error);
        let i = self.gains.ki * self.error * dt;
        let d = self.gains.kd * (self.error - 2.0 * self.last_error + self.prev_error) / dt;
        self.accumulate(p + i + d)
    }

    fn accumulate(&mut self, delta: f64) -> f64 {
        self.prev_error = self.last_error;
        self.last_error = self.error;
        self.output = saturate(self.output + delta, self.min_output, self.max_output);
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

    #[inline]
    pub fn prev_error(&self) -> f64 {
        self.prev_error
    }

    /// Running command.
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
