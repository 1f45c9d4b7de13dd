//! Board interface for the K8061.
//!
//! [`InterfaceBoard`] owns the open driver handle and the channel counts
//! discovered at open time, and performs validated, unit-converted output
//! writes. Bounds checks live here rather than in the adapter because the
//! channel counts are a property of the opened device, discovered only after
//! a successful open; the adapter must not assume a fixed channel count
//! independent of hardware capability.

use log::{debug, warn};

use crate::error::{DriverError, DriverResult};

use super::{AcquisitionDevice, AcquisitionDriver, Subdevice};

/// Connection to the interface board through the acquisition driver layer.
///
/// The handle is held from a successful [`open`](Self::open) until
/// [`close`](Self::close) or drop, and is released on every failure path.
pub struct InterfaceBoard {
    driver: Box<dyn AcquisitionDriver>,
    device: Option<Box<dyn AcquisitionDevice>>,
    analog_channels: usize,
    digital_channels: usize,
}

impl InterfaceBoard {
    /// Create an unopened board over the given driver backend.
    pub fn new(driver: Box<dyn AcquisitionDriver>) -> Self {
        Self {
            driver,
            device: None,
            analog_channels: 0,
            digital_channels: 0,
        }
    }

    /// Open the device node and cache the output channel counts.
    ///
    /// On any failure the handle stays unset and [`is_open`](Self::is_open)
    /// keeps returning false; the board may be asked to open again later.
    /// The cached counts gate all subsequent bounds checks and never change
    /// while the handle is held.
    pub fn open(&mut self, path: &str) -> DriverResult<()> {
        let device = self.driver.open(path)?;
        let analog_channels = device.channel_count(Subdevice::AnalogOutput)?;
        let digital_channels = device.channel_count(Subdevice::DigitalOutput)?;
        debug!("opened {path}: {analog_channels} analog outputs, {digital_channels} digital outputs");
        self.analog_channels = analog_channels;
        self.digital_channels = digital_channels;
        self.device = Some(device);
        Ok(())
    }

    /// Release the device handle. Safe to call at any time.
    pub fn close(&mut self) {
        if self.device.take().is_some() {
            debug!("released acquisition device handle");
        }
        self.analog_channels = 0;
        self.digital_channels = 0;
    }

    /// Whether a device handle is currently held.
    pub fn is_open(&self) -> bool {
        self.device.is_some()
    }

    /// Analog output channels reported by the driver at open time.
    pub fn analog_channels(&self) -> usize {
        self.analog_channels
    }

    /// Digital output channels reported by the driver at open time.
    pub fn digital_channels(&self) -> usize {
        self.digital_channels
    }

    fn device(&self) -> DriverResult<&dyn AcquisitionDevice> {
        self.device.as_deref().ok_or(DriverError::DeviceNotOpen)
    }

    /// Convert `volts` with the channel's calibrated range and write one sample.
    pub fn write_analog(&self, channel: usize, volts: f64) -> DriverResult<()> {
        let device = self.device()?;
        if channel >= self.analog_channels {
            return Err(DriverError::InvalidChannel {
                channel,
                available: self.analog_channels,
            });
        }
        let range = device.output_range(Subdevice::AnalogOutput, channel)?;
        let sample = range.sample_from_volts(volts);
        debug!("analog write: channel {channel}, {volts} V -> sample {sample}");
        let transferred = device.write_sample(Subdevice::AnalogOutput, channel, sample)?;
        if transferred != 1 {
            warn!("analog write on channel {channel} transferred {transferred} samples");
            return Err(DriverError::WriteFailed { transferred });
        }
        Ok(())
    }

    /// Write one bit to a digital output line.
    pub fn write_digital(&self, channel: usize, level: bool) -> DriverResult<()> {
        let device = self.device()?;
        if channel >= self.digital_channels {
            return Err(DriverError::InvalidChannel {
                channel,
                available: self.digital_channels,
            });
        }
        debug!("digital write: channel {channel} -> {level}");
        let transferred = device.write_bit(Subdevice::DigitalOutput, channel, level)?;
        if transferred != 1 {
            warn!("digital write on channel {channel} transferred {transferred} samples");
            return Err(DriverError::WriteFailed { transferred });
        }
        Ok(())
    }
}
