//! Built-in robot drivers.
//!
//! - [`simulation`] - Kinematic chassis with an active-low IR line array
//! - [`scripted`] - Replays a fixed list of raw sensor readings
//!
//! # Adding New Drivers
//!
//! 1. Create a new submodule under `drivers/`
//! 2. Implement `RobotDriver` from `lf_common::hal::driver`
//! 3. Register its factory in [`register_builtin_drivers`]

pub mod scripted;
pub mod simulation;

use lf_common::hal::driver::DriverFactory;
use tracing::warn;

use crate::driver_registry::DriverRegistry;

const BUILTIN_DRIVERS: [(&str, DriverFactory); 2] = [
    ("simulation", simulation::create_driver),
    ("scripted", scripted::create_driver),
];

/// Register every built-in driver with `registry`.
pub fn register_builtin_drivers(registry: &mut DriverRegistry) {
    for (name, factory) in BUILTIN_DRIVERS {
        if let Err(e) = registry.register(name, factory) {
            warn!("skipping built-in driver: {e}");
        }
    }
}
