//! Control cycle: read → decide → actuate.
//!
//! One cooperative loop drives the robot. Each cycle it:
//! 1. answers any complete tuning lines waiting on the serial handoff,
//! 2. reads the sensors the active strategy needs,
//! 3. computes a wheel command (decision table or PID loops),
//! 4. applies it, then lets the driver advance by the elapsed time.
//!
//! ## Strategies
//! - `Track`: polarity-normalised line reading → decision table.
//! - `Pid`: positional PID on the filtered wheel speed drives both wheels;
//!   incremental PID on the track offset drives the steering servo.
//!
//! ## Run/stop gating
//! While stopped the speed target is forced to 0, the wheels are
//! de-energised and the servo is held at its neutral duty. Targets are
//! re-asserted every cycle.
//!
//! ## Pacing
//! With a non-zero period the loop sleeps out the remainder of each cycle.
//! Overruns are counted and logged, never fatal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, trace};

use lf_common::config::ConfigError;
use lf_common::consts::SERVO_NEUTRAL_DUTY;
use lf_common::control_unit::config::{RobotConfig, Strategy, TimeStep, TuningTarget};
use lf_common::control_unit::control::{Command, Duty};
use lf_common::control_unit::sensor::SensorPolarity;
use lf_common::hal::driver::{HalError, RobotDriver};

use crate::control::filters::Ewma;
use crate::control::incremental::IncrementalPid;
use crate::control::pid::PositionalPid;
use crate::serial::RxConsumer;
use crate::track;
use crate::tuning::{self, Ack};

// ─── Cycle Statistics ───────────────────────────────────────────────

/// O(1) per-cycle timing statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleStats {
    /// Total cycles executed.
    pub cycle_count: u64,
    /// Last cycle duration [ns].
    pub last_cycle_ns: u64,
    /// Minimum cycle duration [ns].
    pub min_cycle_ns: u64,
    /// Maximum cycle duration [ns].
    pub max_cycle_ns: u64,
    /// Running sum for average computation.
    pub sum_cycle_ns: u64,
    /// Cycles that took longer than the configured period.
    pub overruns: u64,
}

impl CycleStats {
    /// Create a new zeroed stats instance.
    pub const fn new() -> Self {
        Self {
            cycle_count: 0,
            last_cycle_ns: 0,
            min_cycle_ns: u64::MAX,
            max_cycle_ns: 0,
            sum_cycle_ns: 0,
            overruns: 0,
        }
    }

    /// Record a cycle duration.
    #[inline]
    pub fn record(&mut self, duration_ns: u64) {
        self.cycle_count += 1;
        self.last_cycle_ns = duration_ns;
        self.min_cycle_ns = self.min_cycle_ns.min(duration_ns);
        self.max_cycle_ns = self.max_cycle_ns.max(duration_ns);
        self.sum_cycle_ns = self.sum_cycle_ns.saturating_add(duration_ns);
    }

    /// Average cycle time [ns] (0 if no cycles).
    #[inline]
    pub fn avg_cycle_ns(&self) -> u64 {
        self.sum_cycle_ns.checked_div(self.cycle_count).unwrap_or(0)
    }
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Errors ─────────────────────────────────────────────────────────

/// Errors raised while setting up the cycle runner.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("driver error: {0}")]
    Driver(#[from] HalError),
}

// ─── Cycle Runner ───────────────────────────────────────────────────

/// Owns the driver, both controllers and the loop timing.
pub struct CycleRunner<D: RobotDriver> {
    driver: D,
    strategy: Strategy,
    timestep: TimeStep,
    polarity: SensorPolarity,
    tuning_target: TuningTarget,
    speed_pid: PositionalPid,
    steering_pid: IncrementalPid,
    speed_filter: Ewma,
    /// Configured speed setpoint, restored while running.
    speed_target: f64,
    running: bool,
    period: Duration,
    stats_interval: u64,
    stats: CycleStats,
    last_command: Command,
}

impl CycleRunner<Box<dyn RobotDriver>> {
    /// Validate `config` and create its driver through the built-in registry.
    pub fn from_config(config: &RobotConfig) -> Result<Self, CycleError> {
        config.validate()?;
        let driver = lf_hal::create_driver(&config.driver)?;
        Ok(Self::new(config, driver))
    }
}

impl<D: RobotDriver> CycleRunner<D> {
    /// Create a runner around `driver`. The runner starts in the running state.
    pub fn new(config: &RobotConfig, driver: D) -> Self {
        Self {
            driver,
            strategy: config.cycle.strategy,
            timestep: config.cycle.timestep,
            polarity: config.sensor.polarity,
            tuning_target: config.tuning.target,
            speed_pid: PositionalPid::new(&config.speed_pid),
            steering_pid: IncrementalPid::new(&config.steering_pid),
            speed_filter: Ewma::new(config.speed_filter.alpha, 0.0),
            speed_target: config.speed_pid.target,
            running: true,
            period: Duration::from_micros(config.cycle.period_us),
            stats_interval: config.cycle.stats_interval,
            stats: CycleStats::new(),
            last_command: Command::STOP,
        }
    }

    // ── Run/stop ──

    /// Resume driving. The configured speed target applies from the next cycle.
    pub fn start(&mut self) {
        if !self.running {
            info!("robot started");
        }
        self.running = true;
    }

    /// Stop driving. Wheels are de-energised from the next cycle.
    pub fn stop(&mut self) {
        if self.running {
            info!("robot stopped");
        }
        self.running = false;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Switch control strategy.
    pub fn set_strategy(&mut self, strategy: Strategy) {
        if strategy != self.strategy {
            info!(from = ?self.strategy, to = ?strategy, "strategy changed");
            self.strategy = strategy;
        }
    }

    // ── Tuning ──

    /// Apply one tuning line to the configured controller.
    pub fn handle_tuning_line(&mut self, line: &[u8]) -> Ack {
        match self.tuning_target {
            TuningTarget::Speed => tuning::apply_line(line, &mut self.speed_pid),
            TuningTarget::Steering => tuning::apply_line(line, &mut self.steering_pid),
        }
    }

    // ── Cycle ──

    /// Execute one cycle with `dt` elapsed since the previous one.
    pub fn cycle_body(&mut self, dt: Duration) -> Command {
        let command = match self.strategy {
            Strategy::Track => self.track_step(),
            Strategy::Pid => self.pid_step(dt),
        };
        self.driver.apply(&command);
        self.driver.cycle(dt);
        self.last_command = command;
        command
    }

    fn track_step(&mut self) -> Command {
        let reading = self.polarity.normalize(self.driver.read_line());
        let command = if self.running {
            track::decide(reading)
        } else {
            Command::STOP
        };
        trace!(reading = reading.bits(), ?command, "track cycle");
        command
    }

    fn pid_step(&mut self, dt: Duration) -> Command {
        let target = if self.running { self.speed_target } else { 0.0 };
        self.speed_pid.reset_target(target);

        let speed = self.speed_filter.apply(self.driver.read_speed());
        let offset = self.driver.read_track_offset();
        let (drive, steer) = match self.timestep {
            TimeStep::Iteration => (
                self.speed_pid.compute(speed),
                self.steering_pid.compute(offset),
            ),
            TimeStep::Measured => {
                let dt_s = dt.as_secs_f64();
                (
                    self.speed_pid.compute_dt(speed, dt_s),
                    self.steering_pid.compute_dt(offset, dt_s),
                )
            }
        };

        let (command, servo) = if self.running {
            let duty = Duty::saturating(drive);
            (Command::forward(duty, duty), steer)
        } else {
            (Command::STOP, SERVO_NEUTRAL_DUTY)
        };
        self.driver.steer(servo);
        trace!(speed, offset, drive, servo, ?command, "pid cycle");
        command
    }

    /// Run until `shutdown` is set or `max_cycles` cycles have executed.
    ///
    /// Tuning lines are taken from `rx` at the top of each cycle and every
    /// acknowledgement is passed to `ack`. The wheels are stopped on exit.
    pub fn run(
        &mut self,
        rx: &mut RxConsumer<'_>,
        shutdown: &AtomicBool,
        max_cycles: Option<u64>,
        mut ack: impl FnMut(Ack),
    ) -> CycleStats {
        info!(
            driver = self.driver.name(),
            strategy = ?self.strategy,
            timestep = ?self.timestep,
            period_us = self.period.as_micros() as u64,
            "control loop started"
        );

        let mut last_start = Instant::now();
        while !shutdown.load(Ordering::Relaxed) {
            if max_cycles.is_some_and(|max| self.stats.cycle_count >= max) {
                break;
            }

            let cycle_start = Instant::now();
            let dt = cycle_start.duration_since(last_start);
            last_start = cycle_start;

            while let Some(line) = rx.poll() {
                ack(self.handle_tuning_line(&line));
            }
            self.cycle_body(dt);

            let elapsed = cycle_start.elapsed();
            self.stats.record(elapsed.as_nanos() as u64);
            if !self.period.is_zero() && elapsed > self.period {
                self.stats.overruns += 1;
                debug!(
                    elapsed_us = elapsed.as_micros() as u64,
                    overruns = self.stats.overruns,
                    "cycle overrun"
                );
            }
            if self.stats_interval > 0 && self.stats.cycle_count % self.stats_interval == 0 {
                debug!(
                    cycles = self.stats.cycle_count,
                    avg_ns = self.stats.avg_cycle_ns(),
                    min_ns = self.stats.min_cycle_ns,
                    max_ns = self.stats.max_cycle_ns,
                    overruns = self.stats.overruns,
                    "cycle stats"
                );
            }

            if let Some(remaining) = self.period.checked_sub(elapsed) {
                std::thread::sleep(remaining);
            }
        }

        self.driver.apply(&Command::STOP);
        self.last_command = Command::STOP;
        info!(cycles = self.stats.cycle_count, "control loop stopped");
        self.stats.clone()
    }

    // ── Accessors ──

    #[inline]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    #[inline]
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    #[inline]
    pub fn speed_pid(&self) -> &PositionalPid {
        &self.speed_pid
    }

    #[inline]
    pub fn steering_pid(&self) -> &IncrementalPid {
        &self.steering_pid
    }

    #[inline]
    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    /// Command applied by the last cycle.
    #[inline]
    pub fn last_command(&self) -> Command {
        self.last_command
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
