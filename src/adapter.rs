//! Laser driver device adapter.
//!
//! Exposes the analog voltage channels and digital enable lines of the
//! interface board as named, bounded properties: `Voltage Analog 1..N`
//! (float, 0.0 to the configured ceiling) and `Enable Digital 1..N`
//! (`Off`/`On`). Accepted values are forwarded straight to the board; there
//! are no queues, no background threads, and no cached computation.
//!
//! The adapter has exactly two states, Uninitialized and Initialized.
//! Property declaration happens before initialization and never touches
//! hardware; the board is opened only by [`LaserDriver::initialize`].

use std::collections::HashMap;

use log::{error, info, warn};

use crate::config::AdapterConfig;
use crate::device::Device;
use crate::error::{DriverError, DriverResult};
use crate::hardware::{AcquisitionDriver, InterfaceBoard};
use crate::property::{PropertyChange, PropertyDefinition};

/// Name the adapter registers under.
pub const DEVICE_NAME: &str = "LaserDriver";

/// Displayed value of an enabled digital line.
pub const ON: &str = "On";
/// Displayed value of a disabled digital line.
pub const OFF: &str = "Off";

const VOLTAGE_PREFIX: &str = "Voltage Analog";
const ENABLE_PREFIX: &str = "Enable Digital";

fn voltage_property_name(channel: usize) -> String {
    format!("{VOLTAGE_PREFIX} {}", channel + 1)
}

fn enable_property_name(channel: usize) -> String {
    format!("{ENABLE_PREFIX} {}", channel + 1)
}

/// Device adapter for the laser illumination board.
///
/// Owns one [`InterfaceBoard`] and two name-to-channel lookup tables built
/// once at construction, replacing repeated string comparison in the change
/// callback. The number of exposed channels comes from the configuration;
/// the board's own bounds checks cap it at what the driver reports.
pub struct LaserDriver {
    config: AdapterConfig,
    board: InterfaceBoard,
    initialized: bool,
    voltage_channels: HashMap<String, usize>,
    enable_channels: HashMap<String, usize>,
}

impl LaserDriver {
    /// Create an uninitialized adapter over the given driver backend.
    ///
    /// Hardware is not touched here; the board opens in
    /// [`initialize`](Device::initialize).
    pub fn new(config: AdapterConfig, driver: Box<dyn AcquisitionDriver>) -> Self {
        let voltage_channels = (0..config.analog_channels)
            .map(|channel| (voltage_property_name(channel), channel))
            .collect();
        let enable_channels = (0..config.digital_channels)
            .map(|channel| (enable_property_name(channel), channel))
            .collect();
        Self {
            config,
            board: InterfaceBoard::new(driver),
            initialized: false,
            voltage_channels,
            enable_channels,
        }
    }

    /// Whether the adapter is in the Initialized state.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The board interface, mainly for diagnostics.
    pub fn board(&self) -> &InterfaceBoard {
        &self.board
    }

    fn set_channel_voltage(&self, channel: usize, volts: f64) -> DriverResult<()> {
        if !self.board.is_open() {
            return Err(DriverError::DeviceNotOpen);
        }
        self.board.write_analog(channel, volts)
    }

    fn set_channel_enabled(&self, channel: usize, enabled: bool) -> DriverResult<()> {
        if !self.board.is_open() {
            return Err(DriverError::DeviceNotOpen);
        }
        self.board.write_digital(channel, enabled)
    }
}

impl Device for LaserDriver {
    fn name(&self) -> &str {
        DEVICE_NAME
    }

    fn declared_properties(&self) -> Vec<PropertyDefinition> {
        let mut properties =
            Vec::with_capacity(self.config.analog_channels + self.config.digital_channels);
        for channel in 0..self.config.analog_channels {
            properties.push(PropertyDefinition::float(
                voltage_property_name(channel),
                0.0,
                0.0,
                self.config.max_voltage,
            ));
        }
        for channel in 0..self.config.digital_channels {
            properties.push(PropertyDefinition::choice(
                enable_property_name(channel),
                OFF,
                &[OFF, ON],
            ));
        }
        properties
    }

    fn initialize(&mut self) -> DriverResult<()> {
        if self.initialized {
            return Ok(());
        }
        self.board.open(&self.config.device_path).map_err(|err| {
            error!("could not open the acquisition device: {err}");
            err
        })?;
        if self.board.analog_channels() < self.config.analog_channels
            || self.board.digital_channels() < self.config.digital_channels
        {
            warn!(
                "configured {}+{} channels but the driver reports {}+{}; \
                 writes to the missing channels will fail",
                self.config.analog_channels,
                self.config.digital_channels,
                self.board.analog_channels(),
                self.board.digital_channels()
            );
        }
        info!("{DEVICE_NAME} initialized on {}", self.config.device_path);
        self.initialized = true;
        Ok(())
    }

    fn shutdown(&mut self) -> DriverResult<()> {
        if !self.initialized {
            return Ok(());
        }
        self.board.close();
        self.initialized = false;
        info!("{DEVICE_NAME} shut down");
        Ok(())
    }

    fn handle_property_change(&mut self, change: &PropertyChange<'_>) -> DriverResult<()> {
        if let Some(&channel) = self.voltage_channels.get(change.name) {
            let volts =
                change
                    .requested
                    .as_float()
                    .ok_or_else(|| DriverError::InvalidPropertyValue {
                        name: change.name.to_string(),
                        reason: format!("expected a voltage, got '{}'", change.requested),
                    })?;
            return self.set_channel_voltage(channel, volts);
        }

        if let Some(&channel) = self.enable_channels.get(change.name) {
            let enabled = match change.requested.as_text() {
                Some(text) if text == ON => true,
                Some(text) if text == OFF => false,
                _ => {
                    return Err(DriverError::InvalidPropertyValue {
                        name: change.name.to_string(),
                        reason: format!("expected '{OFF}' or '{ON}', got '{}'", change.requested),
                    })
                }
            };
            return self.set_channel_enabled(channel, enabled);
        }

        Err(DriverError::UnknownProperty(change.name.to_string()))
    }
}

impl Drop for LaserDriver {
    fn drop(&mut self) {
        // The host calls shutdown before destruction when it behaves; release
        // the handle regardless.
        if self.initialized {
            let _ = self.shutdown();
        }
    }
}
