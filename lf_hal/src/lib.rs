//! # Line-Follower HAL
//!
//! Pluggable robot drivers behind the `RobotDriver` trait from
//! `lf_common::hal::driver`.
//!
//! # Module Structure
//!
//! - [`driver_registry`] - Name → factory lookup
//! - [`drivers`] - Built-in drivers (`simulation`, `scripted`)
//!
//! # Usage
//!
//! ```
//! use lf_common::control_unit::config::DriverConfig;
//! use lf_hal::create_driver;
//!
//! let driver = create_driver(&DriverConfig::default()).unwrap();
//! assert_eq!(driver.name(), "simulation");
//! ```

#![deny(missing_docs)]

pub mod driver_registry;
pub mod drivers;

pub use crate::driver_registry::{DriverRegistry, create_driver};
