//! # Line-Follower Control Unit Library
//!
//! Control core for a small line-following robot. Every cycle it turns the
//! line-sensor array, wheel-speed and track-offset readings into wheel and
//! steering commands.
//!
//! ## Modules
//!
//! - [`control`] - positional PID, incremental PID, EWMA filter
//! - [`track`] - discrete decision table over the inner sensor channels
//! - [`tuning`] - `p|i|d<value>*` runtime gain protocol
//! - [`serial`] - CR LF line framing and lock-free line handoff
//! - [`cycle`] - cycle runner tying drivers, controllers and pacing together
//!
//! The control math is total: no operation returns an error, saturation is
//! silent, and an unknown sensor pattern stops the robot.

pub mod control;
pub mod cycle;
pub mod serial;
pub mod track;
pub mod tuning;
