//! PID strategy against the simulated chassis.
//!
//! Wheel duty = positional PID on the encoder speed. At full duty the wheels
//! reach 500 mm/s, 1.48 counts/mm, so the 370-count setpoint sits at 50 %.

use std::time::Duration;

use lf_common::control_unit::config::{RobotConfig, Strategy, TimeStep};
use lf_common::control_unit::control::Direction;
use lf_common::hal::driver::RobotDriver;
use lf_control_unit::cycle::CycleRunner;
use lf_hal::drivers::simulation::SimulatedRobot;

const DT: Duration = Duration::from_millis(5);
const TARGET: f64 = 370.0;

fn pid_config() -> RobotConfig {
    let mut cfg = RobotConfig::with_service_name("speed-loop-test");
    cfg.cycle.strategy = Strategy::Pid;
    cfg.cycle.period_us = 0;
    cfg
}

fn run(runner: &mut CycleRunner<SimulatedRobot>, cycles: usize) {
    for _ in 0..cycles {
        runner.cycle_body(DT);
    }
}

#[test]
fn speed_converges_to_target() {
    let mut runner = CycleRunner::new(&pid_config(), SimulatedRobot::new(0.0));
    run(&mut runner, 600);

    let speed = runner.driver_mut().read_speed();
    assert!((speed - TARGET).abs() < 1.0, "speed {speed}");
    let cmd = runner.last_command();
    assert_eq!(cmd.direction, Direction::Forward);
    assert_eq!(cmd.left, cmd.right);
    assert_eq!(cmd.left.percent(), 50);
}

#[test]
fn filtered_speed_still_converges() {
    for alpha in [0.5, 0.2] {
        let mut cfg = pid_config();
        cfg.speed_filter.alpha = alpha;
        let mut runner = CycleRunner::new(&cfg, SimulatedRobot::new(0.0));
        run(&mut runner, 1000);
        let speed = runner.driver_mut().read_speed();
        assert!((speed - TARGET).abs() < 1.0, "alpha {alpha}: speed {speed}");
    }
}

#[test]
fn servo_duty_stays_within_steering_bounds() {
    let mut runner = CycleRunner::new(&pid_config(), SimulatedRobot::new(20.0));
    for _ in 0..2000 {
        runner.cycle_body(DT);
        let servo = runner.driver().chassis().servo_duty();
        assert!((4.5..=9.5).contains(&servo), "servo {servo}");
        let out = runner.steering_pid().output();
        assert!((4.5..=9.5).contains(&out));
    }
}

#[test]
fn stop_and_restart() {
    let mut runner = CycleRunner::new(&pid_config(), SimulatedRobot::new(0.0));
    run(&mut runner, 600);

    runner.stop();
    run(&mut runner, 400);
    assert!(runner.last_command().is_stop());
    assert!(runner.driver_mut().read_speed() < 1e-6);
    assert_eq!(runner.driver().chassis().servo_duty(), 7.8);
    assert_eq!(runner.speed_pid().target(), 0.0);

    runner.start();
    run(&mut runner, 1500);
    assert_eq!(runner.speed_pid().target(), TARGET);
    assert!((runner.driver_mut().read_speed() - TARGET).abs() < 1.0);
}

#[test]
fn measured_timestep_rises_more_slowly() {
    let mut iteration = CycleRunner::new(&pid_config(), SimulatedRobot::new(0.0));
    let mut cfg = pid_config();
    cfg.cycle.timestep = TimeStep::Measured;
    let mut measured = CycleRunner::new(&cfg, SimulatedRobot::new(0.0));

    run(&mut iteration, 400);
    run(&mut measured, 400);

    let fast = iteration.driver_mut().read_speed();
    let slow = measured.driver_mut().read_speed();
    assert!(slow > 0.0 && slow < fast, "measured {slow}, iteration {fast}");
    // Integral accumulates error·dt rather than error.
    assert!(measured.speed_pid().integral() < iteration.speed_pid().integral());
}
