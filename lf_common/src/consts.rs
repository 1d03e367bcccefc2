//! System-wide constants for the line-follower workspace.
//!
//! Single source of truth for sensor layout, duty limits and default paths.

use static_assertions::const_assert;

/// Number of infrared channels on the line-sensor array.
pub const SENSOR_COUNT: usize = 5;

/// Significant bits of a packed sensor reading.
pub const SENSOR_MASK: u8 = 0x1F;

/// Bits that take part in the track decision (left-1, center, right-1).
pub const DECISION_MASK: u8 = 0x0E;

/// Maximum wheel duty cycle [%].
pub const MAX_DUTY: u8 = 100;

/// Serial receive buffer length [bytes].
pub const RX_BUFFER_LEN: usize = 200;

/// Completed-line slots in the serial handoff queue (usable capacity is one less).
pub const RX_QUEUE_DEPTH: usize = 4;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config/robot.toml";

/// Default control loop period [µs].
pub const DEFAULT_PERIOD_US: u64 = 5000;

/// Steering servo duty that holds the wheels straight [%].
pub const SERVO_NEUTRAL_DUTY: f64 = 7.8;

const_assert!(SENSOR_COUNT <= 8);
const_assert!(DECISION_MASK & !SENSOR_MASK == 0);
const_assert!(RX_QUEUE_DEPTH >= 2);
