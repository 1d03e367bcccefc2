//! Runtime tuning through the serial receive path.

use std::sync::atomic::{AtomicBool, Ordering};

use lf_common::control_unit::config::{RobotConfig, Strategy, TuningTarget};
use lf_control_unit::cycle::CycleRunner;
use lf_control_unit::serial::RxChannel;
use lf_control_unit::tuning::Ack;
use lf_hal::drivers::scripted::ScriptedDriver;

fn runner(target: TuningTarget) -> CycleRunner<ScriptedDriver> {
    let mut cfg = RobotConfig::with_service_name("tuning-test");
    cfg.cycle.strategy = Strategy::Pid;
    cfg.cycle.period_us = 0;
    cfg.tuning.target = target;
    CycleRunner::new(&cfg, ScriptedDriver::new(&[0b11011]).unwrap())
}

fn wire(acks: &[Ack]) -> Vec<u8> {
    acks.iter().flat_map(|a| a.as_bytes()).copied().collect()
}

#[test]
fn session_updates_speed_gains_and_answers_each_line() {
    let mut runner = runner(TuningTarget::Speed);
    let mut channel = RxChannel::new();
    let (mut tx, mut rx) = channel.split();

    // Valid, bad selector, stray CR (discarded, no answer), missing '*'.
    tx.on_bytes(b"p0.02*\r\nx1*\r\ni9*\rQd0.5\r\n");

    let shutdown = AtomicBool::new(false);
    let mut acks = Vec::new();
    runner.run(&mut rx, &shutdown, Some(5), |a| acks.push(a));

    assert_eq!(acks, vec![Ack::Ok, Ack::Error, Ack::Error]);
    assert_eq!(wire(&acks), b"OK\nERROR\nERROR\n");

    let gains = runner.speed_pid().gains();
    assert_eq!((gains.kp, gains.ki, gains.kd), (0.02, 0.014, 0.001));
}

#[test]
fn session_can_target_the_steering_loop() {
    let mut runner = runner(TuningTarget::Steering);
    let mut channel = RxChannel::new();
    let (mut tx, mut rx) = channel.split();
    tx.on_bytes(b"i0.3*\r\nd 0.02 *\r\n");

    let shutdown = AtomicBool::new(false);
    let mut acks = Vec::new();
    runner.run(&mut rx, &shutdown, Some(1), |a| acks.push(a));

    assert_eq!(acks, vec![Ack::Ok, Ack::Ok]);
    let steering = runner.steering_pid().gains();
    assert_eq!((steering.kp, steering.ki, steering.kd), (0.05, 0.3, 0.02));
    assert_eq!(runner.speed_pid().gains().ki, 0.014);
}

#[test]
fn every_line_from_another_thread_is_answered_dropped_or_pending() {
    const LINES: u64 = 20;

    let mut runner = runner(TuningTarget::Speed);
    let mut channel = RxChannel::new();
    let (mut tx, mut rx) = channel.split();
    let shutdown = AtomicBool::new(false);

    let mut acks = Vec::new();
    let dropped = std::thread::scope(|s| {
        let shutdown = &shutdown;
        let feeder = s.spawn(move || {
            for i in 1..=LINES {
                tx.on_bytes(format!("p{i}*\r\n").as_bytes());
                std::thread::yield_now();
            }
            shutdown.store(true, Ordering::SeqCst);
            tx.dropped()
        });
        runner.run(&mut rx, shutdown, None, |a| acks.push(a));
        feeder.join().unwrap()
    });

    let mut pending = 0;
    while rx.poll().is_some() {
        pending += 1;
    }

    assert!(acks.iter().all(|&a| a == Ack::Ok));
    assert_eq!(acks.len() as u64 + pending + dropped, LINES);
}
