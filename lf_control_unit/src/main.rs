//! # Line-Follower Control Unit
//!
//! Loads `robot.toml`, creates the configured driver and runs the control
//! loop until Ctrl-C or a cycle limit.
//!
//! A tuning script, when given, is fed byte by byte through the serial
//! receive path from a separate thread, the same way a serial link would
//! deliver it. Acknowledgements are logged.

use clap::{Parser, ValueEnum};
use lf_common::consts::DEFAULT_CONFIG_PATH;
use lf_common::control_unit::config::{RobotConfig, Strategy};
use lf_control_unit::cycle::CycleRunner;
use lf_control_unit::serial::RxChannel;
use lf_control_unit::tuning::Ack;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Delay between bytes of a tuning script, roughly 9600 baud.
const SCRIPT_BYTE_DELAY: Duration = Duration::from_micros(1000);

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    Track,
    Pid,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Track => Strategy::Track,
            StrategyArg::Pid => Strategy::Pid,
        }
    }
}

/// Line-follower control loop
#[derive(Parser, Debug)]
#[command(name = "lf_control_unit")]
#[command(version)]
#[command(about = "Line-following robot control loop with PID and decision-table strategies")]
struct Args {
    /// Path to the robot configuration TOML.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Stop after N cycles (default: run until Ctrl-C).
    #[arg(long, value_name = "N")]
    cycles: Option<u64>,

    /// Feed this file through the serial receive path as tuning input.
    #[arg(long, value_name = "FILE")]
    tuning_script: Option<PathBuf>,

    /// Override the configured control strategy.
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    // The configured log level applies unless --verbose or RUST_LOG say otherwise.
    let loaded = RobotConfig::load_validated(&args.config);
    let level = match &loaded {
        _ if args.verbose => "debug",
        Ok(config) => config.shared.log_level.as_directive(),
        Err(_) => "info",
    };
    setup_tracing(level, args.json);

    info!("Line-follower control unit v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = loaded
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
        .and_then(|config| run(&args, config));
    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("Line-follower control unit shutdown complete");
}

fn run(args: &Args, mut config: RobotConfig) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(strategy) = args.strategy {
        config.cycle.strategy = strategy.into();
    }
    info!(
        "Config OK: service={}, strategy={:?}, period={}µs, driver={}",
        config.shared.service_name,
        config.cycle.strategy,
        config.cycle.period_us,
        config.driver.name,
    );

    let script = match &args.tuning_script {
        Some(path) => {
            let bytes = std::fs::read(path)?;
            info!("Tuning script {} ({} bytes)", path.display(), bytes.len());
            bytes
        }
        None => Vec::new(),
    };

    let mut runner = CycleRunner::from_config(&config)?;

    // Setup signal handler for graceful shutdown.
    let shutdown = Arc::new(AtomicBool::new(false));
    let s = shutdown.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        s.store(true, Ordering::SeqCst);
    })?;

    let mut channel = RxChannel::new();
    let (mut tx, mut rx) = channel.split();

    let stats = std::thread::scope(|scope| {
        if !script.is_empty() {
            let shutdown = &shutdown;
            let script = &script;
            scope.spawn(move || {
                for &byte in script {
                    if shutdown.load(Ordering::Relaxed) {
                        break;
                    }
                    tx.on_byte(byte);
                    std::thread::sleep(SCRIPT_BYTE_DELAY);
                }
                if tx.dropped() > 0 {
                    warn!("{} tuning lines dropped", tx.dropped());
                }
            });
        }

        let stats = runner.run(&mut rx, &shutdown, args.cycles, |ack| match ack {
            Ack::Ok => info!("tuning ack: OK"),
            Ack::Error => warn!("tuning ack: ERROR"),
        });
        // Release the script feeder when the loop ends on its cycle limit.
        shutdown.store(true, Ordering::Relaxed);
        stats
    });

    info!(
        "Loop finished: cycles={}, avg={}ns, min={}ns, max={}ns, overruns={}",
        stats.cycle_count,
        stats.avg_cycle_ns(),
        if stats.cycle_count == 0 { 0 } else { stats.min_cycle_ns },
        stats.max_cycle_ns,
        stats.overruns,
    );

    Ok(())
}

fn setup_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }
}
