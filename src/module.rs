//! Device registry.
//!
//! The host framework discovers adapters through a module-level device list
//! and a factory keyed by device name. This is the Rust rendition of that
//! entry-point pair; device destruction is plain ownership, so there is no
//! matching delete function.

use crate::adapter::DEVICE_NAME;
use crate::config::AdapterConfig;
use crate::device::Device;
use crate::error::{DriverError, DriverResult};

/// One registrable device exposed by this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Name the device registers under.
    pub name: &'static str,
    /// Human-readable description shown by the host.
    pub description: &'static str,
}

/// Devices this adapter module provides.
pub const AVAILABLE_DEVICES: &[DeviceDescriptor] = &[DeviceDescriptor {
    name: DEVICE_NAME,
    description: "Laser driver device adapter (Velleman K8061 via comedi).",
}];

/// Create a device by registered name, backed by the real comedi driver.
///
/// Requires the `hardware` feature; without it the factory reports the
/// missing feature instead of silently substituting a mock.
pub fn create_device(name: &str, config: &AdapterConfig) -> DriverResult<Box<dyn Device>> {
    if name != DEVICE_NAME {
        return Err(DriverError::UnknownDevice(name.to_string()));
    }
    config.validate()?;

    #[cfg(feature = "hardware")]
    {
        let driver = Box::new(crate::hardware::ComediDriver::new());
        Ok(Box::new(crate::adapter::LaserDriver::new(
            config.clone(),
            driver,
        )))
    }

    #[cfg(not(feature = "hardware"))]
    {
        Err(DriverError::FeatureNotEnabled("hardware".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_the_laser_driver() {
        assert_eq!(AVAILABLE_DEVICES.len(), 1);
        assert_eq!(AVAILABLE_DEVICES[0].name, "LaserDriver");
    }

    #[test]
    fn unknown_device_name_is_rejected() {
        let err = create_device("Camera", &AdapterConfig::default()).unwrap_err();
        assert!(matches!(err, DriverError::UnknownDevice(_)));
    }

    #[test]
    fn invalid_config_is_rejected_before_hardware_is_touched() {
        let config = AdapterConfig {
            analog_channels: 0,
            ..AdapterConfig::default()
        };
        let err = create_device(DEVICE_NAME, &config).unwrap_err();
        assert!(matches!(err, DriverError::Configuration(_)));
    }

    #[cfg(not(feature = "hardware"))]
    #[test]
    fn factory_reports_missing_hardware_feature() {
        let err = create_device(DEVICE_NAME, &AdapterConfig::default()).unwrap_err();
        assert!(matches!(err, DriverError::FeatureNotEnabled(_)));
    }
}
