//! Property tests for the controller bound invariants and the input parsers.

use lf_common::consts::RX_BUFFER_LEN;
use lf_common::control_unit::control::{Command, IncPidParameters, PidParameters};
use lf_common::control_unit::sensor::{SensorBits, SensorPolarity};
use lf_control_unit::control::incremental::IncrementalPid;
use lf_control_unit::control::pid::PositionalPid;
use lf_control_unit::control::saturate;
use lf_control_unit::serial::LineAssembler;
use lf_control_unit::{track, tuning};
use proptest::prelude::*;

fn bounds() -> impl Strategy<Value = (f64, f64)> {
    (-1000.0f64..0.0, 0.0f64..1000.0).prop_map(|(lo, span)| (lo, lo + span))
}

proptest! {
    #[test]
    fn positional_output_within_bounds(
        kp in -100.0f64..100.0,
        ki in -100.0f64..100.0,
        kd in -100.0f64..100.0,
        target in -1e4f64..1e4,
        (min_output, max_output) in bounds(),
        inputs in prop::collection::vec(-1e4f64..1e4, 1..50),
    ) {
        let mut pid = PositionalPid::new(&PidParameters {
            kp, ki, kd, target,
            min_integral: -1850.0,
            max_integral: 1850.0,
            min_output,
            max_output,
        });
        for input in inputs {
            let out = pid.compute(input);
            prop_assert!((min_output..=max_output).contains(&out),
                "output {out} outside [{min_output}, {max_output}]");
            let i = pid.terms().i;
            prop_assert!((-1850.0..=1850.0).contains(&i), "integral term {i}");
        }
    }

    #[test]
    fn incremental_output_within_bounds_after_every_call(
        kp in -10.0f64..10.0,
        ki in -10.0f64..10.0,
        kd in -10.0f64..10.0,
        (min_output, max_output) in bounds(),
        inputs in prop::collection::vec(-1e4f64..1e4, 1..100),
    ) {
        let mut pid = IncrementalPid::new(&IncPidParameters {
            kp, ki, kd,
            target: 0.0,
            min_output,
            max_output,
        });
        for input in inputs {
            let out = pid.compute(input);
            prop_assert!((min_output..=max_output).contains(&out),
                "output {out} outside [{min_output}, {max_output}]");
        }
    }

    #[test]
    fn measured_dt_output_within_bounds(
        input in -1e4f64..1e4,
        dt in 1e-4f64..1.0,
    ) {
        let mut speed = PositionalPid::new(&PidParameters::default());
        let mut steering = IncrementalPid::new(&IncPidParameters::default());
        for _ in 0..10 {
            let out = speed.compute_dt(input, dt);
            prop_assert!((0.0..=100.0).contains(&out));
            let out = steering.compute_dt(input, dt);
            prop_assert!((4.5..=9.5).contains(&out));
        }
    }

    #[test]
    fn saturate_is_monotone(
        a in -1e6f64..1e6,
        b in -1e6f64..1e6,
        (min, max) in bounds(),
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(saturate(lo, min, max) <= saturate(hi, min, max));
    }

    #[test]
    fn any_reading_decides_within_duty_range(raw in any::<u8>()) {
        let cmd = track::decide(SensorBits::from_raw(raw));
        let (left, right) = cmd.effective_duties();
        prop_assert!(left <= 100 && right <= 100);
        if track::TRACK_TABLE.iter().all(|rule| rule.key != raw & 0x0E) {
            prop_assert_eq!(cmd, Command::STOP);
        }
    }

    #[test]
    fn double_inversion_is_identity(raw in 0u8..32) {
        let reading = SensorBits::from_raw(raw);
        let inv = SensorPolarity::Inverted;
        prop_assert_eq!(inv.normalize(inv.normalize(reading)), reading);
    }

    #[test]
    fn framed_lines_are_short_and_free_of_cr(
        bytes in prop::collection::vec(any::<u8>(), 0..1000),
    ) {
        let mut asm = LineAssembler::new();
        for b in bytes {
            if let Some(line) = asm.push(b) {
                prop_assert!(line.len() < RX_BUFFER_LEN);
                prop_assert!(!line.contains(&b'\r'));
            }
            prop_assert!(asm.pending().len() < RX_BUFFER_LEN);
        }
    }

    #[test]
    fn accepted_tuning_values_are_finite(
        line in prop::collection::vec(any::<u8>(), 0..24),
    ) {
        if let Ok(cmd) = tuning::parse(&line) {
            prop_assert!(cmd.value.is_finite());
            prop_assert_eq!(line.last(), Some(&b'*'));
        }
    }

    #[test]
    fn formatted_values_round_trip_through_tuning(value in -1e6f64..1e6) {
        let line = format!("p{value}*");
        let cmd = tuning::parse(line.as_bytes()).unwrap();
        prop_assert_eq!(cmd.value, value);
    }
}
