//! Driver registry.
//!
//! Maps driver names from the `[driver]` configuration section to factory
//! functions. The registry is a plain value built at startup and passed to
//! whoever creates drivers; there is no global state.

use std::collections::HashMap;

use lf_common::control_unit::config::DriverConfig;
use lf_common::hal::driver::{DriverFactory, HalError, RobotDriver};
use tracing::debug;

use crate::drivers;

/// Registry of available robot drivers.
pub struct DriverRegistry {
    factories: HashMap<&'static str, DriverFactory>,
}

impl DriverRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry holding every built-in driver.
    pub fn with_builtin_drivers() -> Self {
        let mut registry = Self::new();
        drivers::register_builtin_drivers(&mut registry);
        registry
    }

    /// Register a driver factory.
    ///
    /// # Errors
    /// Returns `HalError::ConfigError` if the name is already taken.
    pub fn register(&mut self, name: &'static str, factory: DriverFactory) -> Result<(), HalError> {
        if self.factories.contains_key(name) {
            return Err(HalError::ConfigError(format!(
                "driver '{name}' is already registered"
            )));
        }
        self.factories.insert(name, factory);
        Ok(())
    }

    /// Get a driver factory by name.
    pub fn get_factory(&self, name: &str) -> Option<DriverFactory> {
        self.factories.get(name).copied()
    }

    /// Create the driver named in `config`.
    ///
    /// # Errors
    /// `HalError::DriverNotFound` for an unknown name, or whatever the
    /// driver's factory rejects.
    pub fn create_driver(&self, config: &DriverConfig) -> Result<Box<dyn RobotDriver>, HalError> {
        let factory = self
            .get_factory(&config.name)
            .ok_or_else(|| HalError::DriverNotFound(config.name.clone()))?;
        let driver = factory(config)?;
        debug!(driver = driver.name(), "driver created");
        Ok(driver)
    }

    /// List all registered driver names, sorted.
    pub fn list_drivers(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a built-in driver from its configuration section.
pub fn create_driver(config: &DriverConfig) -> Result<Box<dyn RobotDriver>, HalError> {
    DriverRegistry::with_builtin_drivers().create_driver(config)
}
