//! Infrared line-sensor reading.
//!
//! Five channels ordered left-to-right are packed high-bit-first into the
//! low 5 bits of a byte: `LEFT_2` is bit 4, `RIGHT_2` is bit 0.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::consts::{DECISION_MASK, SENSOR_COUNT, SENSOR_MASK};

bitflags! {
    /// Packed 5-channel line-sensor reading.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SensorBits: u8 {
        /// Outer right channel.
        const RIGHT_2 = 0x01;
        /// Inner right channel.
        const RIGHT_1 = 0x02;
        /// Center channel.
        const CENTER  = 0x04;
        /// Inner left channel.
        const LEFT_1  = 0x08;
        /// Outer left channel.
        const LEFT_2  = 0x10;
    }
}

impl Default for SensorBits {
    fn default() -> Self {
        Self::empty()
    }
}

impl SensorBits {
    /// Channels that take part in the track decision.
    pub const DECISION: Self = Self::from_bits_truncate(DECISION_MASK);

    /// Pack channel levels ordered left-to-right, first element ends up in
    /// the highest significant bit.
    pub fn pack(levels: [bool; SENSOR_COUNT]) -> Self {
        let raw = levels
            .iter()
            .fold(0u8, |acc, &level| (acc << 1) | u8::from(level));
        Self::from_bits_truncate(raw)
    }

    /// Build from a raw byte, discarding bits above the 5 channels.
    #[inline]
    pub const fn from_raw(raw: u8) -> Self {
        Self::from_bits_truncate(raw & SENSOR_MASK)
    }

    /// Masked decision key (left-1, center, right-1 only).
    #[inline]
    pub const fn decision_key(self) -> u8 {
        self.bits() & DECISION_MASK
    }

    /// Channel levels ordered left-to-right.
    pub fn levels(self) -> [bool; SENSOR_COUNT] {
        let mut out = [false; SENSOR_COUNT];
        for (i, level) in out.iter_mut().enumerate() {
            *level = self.bits() & (1 << (SENSOR_COUNT - 1 - i)) != 0;
        }
        out
    }
}

/// Relation between the attached sensor's output and the encoding the
/// decision table expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorPolarity {
    /// Same wiring as the reference chassis.
    #[default]
    AsWired,
    /// Every channel reads the opposite level.
    Inverted,
}

impl SensorPolarity {
    /// Normalise a raw reading to the reference encoding.
    #[inline]
    pub const fn normalize(self, reading: SensorBits) -> SensorBits {
        match self {
            Self::AsWired => reading,
            Self::Inverted => SensorBits::from_bits_truncate(!reading.bits() & SENSOR_MASK),
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
