//! Hardware abstraction layer interfaces.
//!
//! The control unit reaches sensors and actuators only through the
//! [`driver::RobotDriver`] trait.

pub mod driver;
