//! Track decision table.
//!
//! Maps the inner three line-sensor channels (left-1, center, right-1) to a
//! wheel command. Rules are exact matches evaluated in order; the first hit
//! wins and anything off-table stops the robot. There is no hysteresis: a
//! reading that flickers across a rule boundary produces a flickering
//! command.
//!
//! Row comments name the turn the wheels make. The same rows are often
//! labelled by the drift they correct instead: `0b1000` is the hard-left
//! correction (the robot has drifted left, so it turns right) and `0b0010`
//! is the hard-right correction. Both labels describe the same command.

use lf_common::control_unit::control::{Command, Duty};
use lf_common::control_unit::sensor::SensorBits;

/// One table row: masked key and the command it selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackRule {
    pub key: u8,
    pub command: Command,
}

const fn forward(left: u8, right: u8) -> Command {
    Command::forward(Duty::new_saturating(left), Duty::new_saturating(right))
}

/// Ordered decision rules over `reading & DECISION_MASK`.
#[rustfmt::skip]
pub const TRACK_TABLE: [TrackRule; 6] = [
    // centered on line
    TrackRule { key: 0b1010, command: forward(30, 30) },
    // line under left-1 only, turn left
    TrackRule { key: 0b0110, command: forward(0, 30) },
    // line under right-1 only, turn right
    TrackRule { key: 0b1100, command: forward(30, 0) },
    // line under center and right-1: drifted left, turn right hard
    TrackRule { key: 0b1000, command: forward(50, 0) },
    // line under left-1 and center: drifted right, turn left hard
    TrackRule { key: 0b0010, command: forward(0, 50) },
    // line lost
    TrackRule { key: 0b0000, command: Command::STOP },
];

/// Command for keys that match no rule.
pub const FAIL_SAFE: Command = Command::STOP;

/// Decide on an already-masked key. Bits outside the mask are not stripped.
#[inline]
pub fn decide_key(key: u8) -> Command {
    TRACK_TABLE
        .iter()
        .find(|rule| rule.key == key)
        .map_or(FAIL_SAFE, |rule| rule.command)
}

/// Decide on a full 5-channel reading (reference encoding).
#[inline]
pub fn decide(reading: SensorBits) -> Command {
    decide_key(reading.decision_key())
}

// ─── Tests ──────────────────────────────────────────────────────────
