//! TOML loading shared by every robot configuration document.
//!
//! Any `DeserializeOwned` type gets [`ConfigLoader`] for free, so a section
//! struct can be read on its own in tests and the full
//! [`RobotConfig`](crate::control_unit::config::RobotConfig) is read the
//! same way at start-up:
//!
//! ```rust,no_run
//! use lf_common::config::{ConfigError, ConfigLoader};
//! use lf_common::control_unit::config::RobotConfig;
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = RobotConfig::load(Path::new("config/robot.toml"))?;
//!     println!("{} drives with {:?}", config.shared.service_name, config.cycle.strategy);
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Why a configuration document could not be used.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// No file at the given path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// Unreadable file or malformed TOML.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Well-formed TOML with values the robot cannot run with.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// `[shared] log_level`, spelled in lowercase in TOML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// `[shared]` section: identity and verbosity of one robot instance.
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "line-follower-01"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SharedConfig {
    #[serde(default)]
    pub log_level: LogLevel,

    /// Name reported in the start-up log line.
    pub service_name: String,
}

impl SharedConfig {
    /// Rejects a blank `service_name`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "[shared] service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// TOML file and string loading.
///
/// A missing file is [`ConfigError::FileNotFound`]; any other I/O failure
/// or a syntax/type error is [`ConfigError::ParseError`]. Semantic checks
/// are left to the caller.
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound,
            _ => ConfigError::ParseError(format!("{}: {e}", path.display())),
        })?;
        Self::from_toml(&content)
    }

    fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
