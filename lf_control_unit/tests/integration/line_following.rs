//! Track strategy against the simulated chassis.
//!
//! The IR array is active-low and mounted ahead of the axle, so a robot
//! right of the line sees it under its left channels and must turn left.

use std::time::Duration;

use lf_common::control_unit::config::{RobotConfig, Strategy};
use lf_common::control_unit::control::Direction;
use lf_common::hal::driver::RobotDriver;
use lf_control_unit::cycle::CycleRunner;
use lf_hal::drivers::scripted::ScriptedDriver;
use lf_hal::drivers::simulation::SimulatedRobot;

const DT: Duration = Duration::from_millis(5);

fn track_config() -> RobotConfig {
    let mut cfg = RobotConfig::with_service_name("line-following-test");
    cfg.cycle.strategy = Strategy::Track;
    cfg.cycle.period_us = 0;
    cfg
}

fn runner_at(offset_mm: f64) -> CycleRunner<SimulatedRobot> {
    CycleRunner::new(&track_config(), SimulatedRobot::new(offset_mm))
}

#[test]
fn centered_robot_drives_straight() {
    let mut runner = runner_at(0.0);
    for _ in 0..1000 {
        let cmd = runner.cycle_body(DT);
        assert_eq!(cmd.direction, Direction::Forward);
        assert_eq!(cmd.effective_duties(), (30, 30));
    }
    let pose = runner.driver().pose();
    assert_eq!(pose.y_mm, 0.0);
    assert!(pose.x_mm > 500.0, "travelled {} mm", pose.x_mm);
}

#[test]
fn robot_right_of_line_turns_left_and_recovers() {
    let mut runner = runner_at(15.0);

    let first = runner.cycle_body(DT);
    let (left, right) = first.effective_duties();
    assert!(left < right, "first command {first:?} should turn left");

    let mut max_offset: f64 = 0.0;
    for _ in 0..2000 {
        let cmd = runner.cycle_body(DT);
        assert!(!cmd.is_stop(), "line lost at y = {}", runner.driver().pose().y_mm);
        max_offset = max_offset.max(runner.driver().pose().y_mm.abs());
    }
    assert!(max_offset <= 15.0 + 1e-6);
    assert!(runner.driver().pose().y_mm.abs() < 10.0);
    assert_eq!(runner.last_command().effective_duties(), (30, 30));
}

#[test]
fn robot_left_of_line_turns_right_and_recovers() {
    let mut runner = runner_at(-15.0);

    let (left, right) = runner.cycle_body(DT).effective_duties();
    assert!(left > right);

    for _ in 0..2000 {
        assert!(!runner.cycle_body(DT).is_stop());
    }
    assert!(runner.driver().pose().y_mm.abs() < 10.0);
}

#[test]
fn lost_line_stops_the_robot() {
    let mut runner = runner_at(100.0);
    for _ in 0..200 {
        assert!(runner.cycle_body(DT).is_stop());
    }
    assert_eq!(runner.driver_mut().read_speed(), 0.0);
    assert_eq!(runner.driver().pose().x_mm, 0.0);
}

#[test]
fn stopping_mid_run_brings_the_wheels_to_rest() {
    let mut runner = runner_at(0.0);
    for _ in 0..400 {
        runner.cycle_body(DT);
    }
    assert!(runner.driver_mut().read_speed() > 200.0);

    runner.stop();
    for _ in 0..400 {
        assert!(runner.cycle_body(DT).is_stop());
    }
    assert!(runner.driver_mut().read_speed() < 1e-6);
}

#[test]
fn scripted_readings_map_through_the_table() {
    // Centered, line under left-1, nothing, line under right-1 and center.
    let script = [0b11011, 0b10111, 0b11111, 0b11001];
    let mut cfg = track_config();
    cfg.driver.name = "scripted".to_string();
    cfg.driver.script = script.to_vec();

    let mut runner = CycleRunner::from_config(&cfg).unwrap();
    let duties: Vec<(u8, u8)> = (0..8)
        .map(|_| runner.cycle_body(DT).effective_duties())
        .collect();
    assert_eq!(
        duties,
        vec![(30, 30), (0, 30), (0, 0), (50, 0), (30, 30), (0, 30), (0, 0), (50, 0)]
    );
}

#[test]
fn scripted_driver_records_every_command() {
    let mut runner = CycleRunner::new(&track_config(), ScriptedDriver::new(&[0b11011]).unwrap());
    for _ in 0..25 {
        runner.cycle_body(DT);
    }
    assert_eq!(runner.driver().applied_count(), 25);
    assert_eq!(runner.driver().servo_duty(), None);
}
