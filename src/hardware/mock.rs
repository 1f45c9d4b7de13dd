//! Mock acquisition backend.
//!
//! Simulated K8061 for tests and for exercising the adapter without physical
//! hardware. Every output write is recorded in a shared state handle so a
//! test can assert exactly what reached the "driver", and failures can be
//! injected per subdevice: a failed write reports zero samples transferred,
//! which is how a short transfer looks coming out of the real driver.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{DriverError, DriverResult};

use super::{AcquisitionDevice, AcquisitionDriver, OutputRange, Subdevice};

/// Default simulated output range: 0-5 V over 8 bits, matching the K8061 DAC.
pub const K8061_RANGE: OutputRange = OutputRange {
    min_volts: 0.0,
    max_volts: 5.0,
    max_sample: 255,
};

/// Channel counts of the physical K8061 (8 analog outputs, 8 digital outputs).
const K8061_ANALOG_OUTPUTS: usize = 8;
const K8061_DIGITAL_OUTPUTS: usize = 8;

/// Shared, inspectable state of the simulated board.
#[derive(Debug, Default)]
pub struct MockState {
    /// Raw samples written to the analog output subdevice, as (channel, sample).
    pub analog_writes: Vec<(usize, u32)>,
    /// Bits written to the digital output subdevice, as (channel, level).
    pub digital_writes: Vec<(usize, bool)>,
    /// When set, analog writes report zero samples transferred.
    pub fail_analog_writes: bool,
    /// When set, digital writes report zero samples transferred.
    pub fail_digital_writes: bool,
}

/// Handle used by tests to inspect writes and steer failure injection.
pub type MockStateHandle = Arc<Mutex<MockState>>;

/// Driver backend producing simulated devices.
///
/// All devices opened through one `MockDriver` share its state handle, so a
/// test can keep asserting after handing the driver to the adapter.
pub struct MockDriver {
    analog_channels: usize,
    digital_channels: usize,
    range: OutputRange,
    fail_open: bool,
    state: MockStateHandle,
}

impl MockDriver {
    /// Simulated K8061: 8 analog outputs, 8 digital outputs, 0-5 V range.
    pub fn new() -> Self {
        Self {
            analog_channels: K8061_ANALOG_OUTPUTS,
            digital_channels: K8061_DIGITAL_OUTPUTS,
            range: K8061_RANGE,
            fail_open: false,
            state: Arc::default(),
        }
    }

    /// Override the channel counts the simulated device reports.
    pub fn with_channel_counts(mut self, analog: usize, digital: usize) -> Self {
        self.analog_channels = analog;
        self.digital_channels = digital;
        self
    }

    /// Override the simulated output range.
    pub fn with_range(mut self, range: OutputRange) -> Self {
        self.range = range;
        self
    }

    /// Make `open` fail, as if the device node were absent.
    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// Handle for inspecting writes and injecting failures.
    pub fn state(&self) -> MockStateHandle {
        Arc::clone(&self.state)
    }
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl AcquisitionDriver for MockDriver {
    fn open(&self, path: &str) -> DriverResult<Box<dyn AcquisitionDevice>> {
        if self.fail_open {
            return Err(DriverError::OpenFailed {
                path: path.to_string(),
                reason: "No such device".to_string(),
            });
        }
        Ok(Box::new(MockDevice {
            analog_channels: self.analog_channels,
            digital_channels: self.digital_channels,
            range: self.range,
            state: Arc::clone(&self.state),
        }))
    }
}

/// One simulated open device. Write-only, like the real board.
struct MockDevice {
    analog_channels: usize,
    digital_channels: usize,
    range: OutputRange,
    state: MockStateHandle,
}

impl MockDevice {
    fn state(&self) -> MutexGuard<'_, MockState> {
        // A poisoned mock just means an earlier test assertion failed.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AcquisitionDevice for MockDevice {
    fn channel_count(&self, subdevice: Subdevice) -> DriverResult<usize> {
        Ok(match subdevice {
            Subdevice::AnalogOutput => self.analog_channels,
            Subdevice::DigitalOutput => self.digital_channels,
        })
    }

    fn output_range(&self, _subdevice: Subdevice, channel: usize) -> DriverResult<OutputRange> {
        if channel >= self.analog_channels {
            return Err(DriverError::Driver(format!(
                "no range descriptor for channel {channel}"
            )));
        }
        Ok(self.range)
    }

    fn write_sample(
        &self,
        _subdevice: Subdevice,
        channel: usize,
        sample: u32,
    ) -> DriverResult<usize> {
        let mut state = self.state();
        if state.fail_analog_writes {
            return Ok(0);
        }
        if channel >= self.analog_channels {
            return Err(DriverError::Driver(format!(
                "analog write to nonexistent channel {channel}"
            )));
        }
        state.analog_writes.push((channel, sample));
        Ok(1)
    }

    fn write_bit(&self, _subdevice: Subdevice, channel: usize, level: bool) -> DriverResult<usize> {
        let mut state = self.state();
        if state.fail_digital_writes {
            return Ok(0);
        }
        if channel >= self.digital_channels {
            return Err(DriverError::Driver(format!(
                "digital write to nonexistent channel {channel}"
            )));
        }
        state.digital_writes.push((channel, level));
        Ok(1)
    }
}
