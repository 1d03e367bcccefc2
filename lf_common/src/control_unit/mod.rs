//! Control core shared types.
//!
//! Types exchanged between the control unit, the drivers and configuration:
//! wheel commands, coefficient selectors, controller parameters, sensor
//! readings and the runtime configuration document.

pub mod config;
pub mod control;
pub mod sensor;
