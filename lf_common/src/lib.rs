//! Line-Follower Common Library
//!
//! This crate provides the shared types, constants and configuration loading
//! utilities used by every crate in the line-follower workspace.
//!
//! # Module Structure
//!
//! - [`consts`] - Numeric limits and defaults
//! - [`config`] - Configuration loading traits and types
//! - [`control_unit`] - Command, sensor and controller parameter types
//! - [`hal`] - Driver trait implemented by hardware and simulation backends
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use lf_common::prelude::*;
//!
//! let cmd = Command::forward(Duty::new_saturating(30), Duty::new_saturating(30));
//! assert_eq!(cmd.effective_duties(), (30, 30));
//! ```

pub mod config;
pub mod consts;
pub mod control_unit;
pub mod hal;
pub mod prelude;
