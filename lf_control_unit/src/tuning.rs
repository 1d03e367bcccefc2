//! Runtime tuning protocol.
//!
//! A tuning line is `<selector><float>*` where the selector is `p`, `i` or
//! `d`. A valid line overwrites that gain on the configured controller and
//! is answered with `OK`; anything else is answered with `ERROR` and leaves
//! the controller unchanged.
//!
//! ```text
//! p0.015*   → Kp = 0.015, "OK\n"
//! d1e-3*    → Kd = 0.001, "OK\n"
//! x1.0*     → "ERROR\n"
//! ```

use thiserror::Error;
use tracing::{info, warn};

use lf_common::control_unit::control::Coefficient;

use crate::control::incremental::IncrementalPid;
use crate::control::pid::PositionalPid;

/// Line terminator required after the value.
pub const TERMINATOR: u8 = b'*';

/// Acknowledgement sent back on the tuning link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ack {
    Ok,
    Error,
}

impl Ack {
    /// Wire text, newline included.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK\n",
            Self::Error => "ERROR\n",
        }
    }

    #[inline]
    pub const fn as_bytes(self) -> &'static [u8] {
        self.as_str().as_bytes()
    }
}

/// Reason a tuning line was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuningError {
    #[error("empty tuning line")]
    Empty,

    #[error("unknown selector {0:?}")]
    UnknownSelector(char),

    #[error("missing '*' terminator")]
    MissingTerminator,

    #[error("invalid coefficient value {0:?}")]
    InvalidValue(String),
}

/// A parsed tuning request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TuningCommand {
    pub coefficient: Coefficient,
    pub value: f64,
}

/// Parse one received line (framing bytes already stripped).
pub fn parse(line: &[u8]) -> Result<TuningCommand, TuningError> {
    let (&selector, rest) = line.split_first().ok_or(TuningError::Empty)?;
    let coefficient = Coefficient::from_selector(selector)
        .ok_or(TuningError::UnknownSelector(char::from(selector)))?;

    let body = match rest.split_last() {
        Some((&TERMINATOR, body)) => body,
        _ => return Err(TuningError::MissingTerminator),
    };

    let text = std::str::from_utf8(body)
        .map_err(|_| TuningError::InvalidValue(String::from_utf8_lossy(body).into_owned()))?
        .trim();
    let value: f64 = text
        .parse()
        .map_err(|_| TuningError::InvalidValue(text.to_string()))?;
    if !value.is_finite() {
        return Err(TuningError::InvalidValue(text.to_string()));
    }

    Ok(TuningCommand { coefficient, value })
}

/// A controller whose gains can be overwritten at runtime.
pub trait Tunable {
    fn reset_coefficient(&mut self, which: Coefficient, value: f64);
}

impl Tunable for PositionalPid {
    #[inline]
    fn reset_coefficient(&mut self, which: Coefficient, value: f64) {
        PositionalPid::reset_coefficient(self, which, value);
    }
}

impl Tunable for IncrementalPid {
    #[inline]
    fn reset_coefficient(&mut self, which: Coefficient, value: f64) {
        IncrementalPid::reset_coefficient(self, which, value);
    }
}

/// Parse `line` and apply it to `target`.
pub fn apply_line<T: Tunable + ?Sized>(line: &[u8], target: &mut T) -> Ack {
    match parse(line) {
        Ok(cmd) => {
            target.reset_coefficient(cmd.coefficient, cmd.value);
            info!(coefficient = ?cmd.coefficient, value = cmd.value, "gain updated");
            Ack::Ok
        }
        Err(e) => {
            warn!(line = %String::from_utf8_lossy(line), "tuning rejected: {e}");
            Ack::Error
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use lf_common::control_unit::control::PidParameters;

    #[test]
    fn parses_each_selector() {
        assert_eq!(
            parse(b"p1.234*"),
            Ok(TuningCommand {
                coefficient: Coefficient::Kp,
                value: 1.234
            })
        );
        assert_eq!(parse(b"i0.5*").map(|c| c.coefficient), Ok(Coefficient::Ki));
        assert_eq!(parse(b"d-2*").map(|c| c.value), Ok(-2.0));
        assert_eq!(parse(b"d1e-3*").map(|c| c.value), Ok(0.001));
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(parse(b"p 0.25 *").map(|c| c.value), Ok(0.25));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!(parse(b""), Err(TuningError::Empty));
        assert_eq!(parse(b"x1.0*"), Err(TuningError::UnknownSelector('x')));
        assert_eq!(parse(b"P1.0*"), Err(TuningError::UnknownSelector('P')));
        assert_eq!(parse(b"p1.0"), Err(TuningError::MissingTerminator));
        assert_eq!(parse(b"p"), Err(TuningError::MissingTerminator));
        assert!(matches!(parse(b"p*"), Err(TuningError::InvalidValue(_))));
        assert!(matches!(parse(b"pabc*"), Err(TuningError::InvalidValue(_))));
        assert!(matches!(parse(b"pinf*"), Err(TuningError::InvalidValue(_))));
        assert!(matches!(parse(b"pNaN*"), Err(TuningError::InvalidValue(_))));
        assert!(matches!(
            parse(&[b'p', 0xFF, b'*']),
            Err(TuningError::InvalidValue(_))
        ));
    }

    #[test]
    fn valid_line_acks_ok_and_updates_gain() {
        let mut pid = PositionalPid::new(&PidParameters::default());
        assert_eq!(apply_line(b"i0.2*", &mut pid), Ack::Ok);
        assert_eq!(pid.gains().ki, 0.2);
        assert_eq!(pid.gains().kp, 0.015);
    }

    #[test]
    fn rejected_line_leaves_controller_unchanged() {
        let mut pid = PositionalPid::new(&PidParameters::default());
        let before = pid.gains();
        assert_eq!(apply_line(b"k0.2*", &mut pid), Ack::Error);
        assert_eq!(apply_line(b"p0.2", &mut pid), Ack::Error);
        assert_eq!(pid.gains(), before);
    }

    #[test]
    fn ack_wire_text() {
        assert_eq!(Ack::Ok.as_bytes(), b"OK\n");
        assert_eq!(Ack::Error.as_str(), "ERROR\n");
    }
}
