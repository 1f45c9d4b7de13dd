//! Adapter configuration.
//!
//! One TOML-friendly struct covering the fixed device path and the size of
//! the property surface. Parsing and semantic validation are separate steps:
//! serde/toml reads the document, [`AdapterConfig::validate`] rejects values
//! that parse but are logically wrong.
//!
//! The channel counts here size the *property surface* only. The true
//! capability of the board is discovered from the driver at open time, and
//! writes beyond it fail deterministically with an invalid-channel error.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DriverError, DriverResult};

/// Well-known comedi device node for the interface board.
pub const DEFAULT_DEVICE_PATH: &str = "/dev/comedi0";

/// Default number of voltage / enable channels exposed as properties.
pub const DEFAULT_CHANNELS: usize = 5;

/// Default upper bound of the voltage properties, in volts.
pub const DEFAULT_MAX_VOLTAGE: f64 = 5.0;

/// Configuration of the laser driver adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdapterConfig {
    /// Path of the acquisition device node.
    pub device_path: String,
    /// Number of analog voltage properties to expose.
    pub analog_channels: usize,
    /// Number of digital enable properties to expose.
    pub digital_channels: usize,
    /// Upper limit of the voltage properties, in volts.
    pub max_voltage: f64,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            device_path: DEFAULT_DEVICE_PATH.to_string(),
            analog_channels: DEFAULT_CHANNELS,
            digital_channels: DEFAULT_CHANNELS,
            max_voltage: DEFAULT_MAX_VOLTAGE,
        }
    }
}

impl AdapterConfig {
    /// Parse a TOML document into a validated configuration.
    pub fn from_toml_str(text: &str) -> DriverResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> DriverResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject configurations that parse but are semantically invalid.
    pub fn validate(&self) -> DriverResult<()> {
        if self.device_path.is_empty() {
            return Err(DriverError::Configuration(
                "device_path must not be empty".to_string(),
            ));
        }
        if self.analog_channels == 0 || self.digital_channels == 0 {
            return Err(DriverError::Configuration(
                "at least one analog and one digital channel must be configured".to_string(),
            ));
        }
        if self.max_voltage <= 0.0 {
            return Err(DriverError::Configuration(format!(
                "max_voltage must be positive, got {}",
                self.max_voltage
            )));
        }
        Ok(())
    }
}
