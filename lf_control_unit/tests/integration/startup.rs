//! Startup from a configuration file on disk.

use std::io::Write;
use std::path::Path;
use std::sync::atomic::AtomicBool;

use lf_common::config::ConfigError;
use lf_common::control_unit::config::{RobotConfig, Strategy};
use lf_common::hal::driver::HalError;
use lf_control_unit::cycle::{CycleError, CycleRunner};
use lf_control_unit::serial::RxChannel;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn shipped_config_loads_and_runs() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../config/robot.toml");
    let mut cfg = RobotConfig::load_validated(&path).unwrap();
    assert_eq!(cfg.cycle.strategy, Strategy::Track);
    assert_eq!(cfg.driver.name, "simulation");

    cfg.cycle.period_us = 0;
    let mut runner = CycleRunner::from_config(&cfg).unwrap();
    let mut channel = RxChannel::new();
    let (_tx, mut rx) = channel.split();
    let stats = runner.run(&mut rx, &AtomicBool::new(false), Some(50), |_| {});
    assert_eq!(stats.cycle_count, 50);
    assert_eq!(stats.overruns, 0);
}

#[test]
fn scripted_pid_config_from_file() {
    let file = write_config(
        r#"
[shared]
service_name = "scripted"

[cycle]
period_us = 0
strategy = "pid"

[tuning]
target = "steering"

[driver]
name = "scripted"
script = [27, 23]
"#,
    );
    let cfg = RobotConfig::load_validated(file.path()).unwrap();
    let mut runner = CycleRunner::from_config(&cfg).unwrap();
    assert_eq!(runner.strategy(), Strategy::Pid);
    assert_eq!(runner.handle_tuning_line(b"p0.1*").as_str(), "OK\n");
    assert_eq!(runner.steering_pid().gains().kp, 0.1);
}

#[test]
fn scripted_driver_without_script_is_a_driver_error() {
    let file = write_config(
        r#"
[shared]
service_name = "scripted"

[driver]
name = "scripted"
"#,
    );
    let cfg = RobotConfig::load_validated(file.path()).unwrap();
    assert!(matches!(
        CycleRunner::from_config(&cfg),
        Err(CycleError::Driver(HalError::ConfigError(_)))
    ));
}

#[test]
fn invalid_file_is_a_config_error() {
    let file = write_config(
        r#"
[shared]
service_name = "bad"

[steering_pid]
min_output = 9.5
max_output = 4.5
"#,
    );
    assert!(matches!(
        RobotConfig::load_validated(file.path()),
        Err(ConfigError::ValidationError(_))
    ));
}
