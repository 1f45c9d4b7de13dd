//! Hardware abstraction for the acquisition driver layer.
//!
//! Everything below the board interface is reached through two object-safe
//! traits, so the adapter runs against the real comedi backend or the mock
//! interchangeably:
//!
//! - [`AcquisitionDriver`]: opens a device node by path.
//! - [`AcquisitionDevice`]: one open device; channel-count and range queries
//!   plus single-sample output writes.
//!
//! All calls are synchronous and blocking. The driver layer offers no
//! cancellation or timeouts, and this crate does not pretend otherwise: a
//! blocked driver call blocks the calling thread.

pub mod board;
#[cfg(feature = "hardware")]
pub mod comedi;
pub mod mock;

pub use board::InterfaceBoard;
#[cfg(feature = "hardware")]
pub use comedi::ComediDriver;
pub use mock::{MockDriver, MockState};

use crate::error::DriverResult;

/// Functional units of the interface board, addressed by fixed driver-level
/// subdevice indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subdevice {
    /// Analog output (DAC) subdevice.
    AnalogOutput,
    /// Digital output subdevice.
    DigitalOutput,
}

impl Subdevice {
    /// Driver-level subdevice index. These indices are for the K8061 only.
    pub fn index(self) -> u32 {
        match self {
            Subdevice::AnalogOutput => 1,
            Subdevice::DigitalOutput => 3,
        }
    }
}

/// Calibrated output range of one channel.
///
/// Owns the conversion between physical volts and the raw sample encoding the
/// driver consumes. Conversion clamps into the calibrated span first, so it
/// is monotonic over arbitrary inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputRange {
    /// Lower end of the calibrated span, in volts.
    pub min_volts: f64,
    /// Upper end of the calibrated span, in volts.
    pub max_volts: f64,
    /// Largest raw sample the channel accepts.
    pub max_sample: u32,
}

impl OutputRange {
    /// Convert a physical voltage into the raw sample encoding.
    pub fn sample_from_volts(&self, volts: f64) -> u32 {
        let span = self.max_volts - self.min_volts;
        if span <= 0.0 || self.max_sample == 0 {
            return 0;
        }
        let clamped = volts.clamp(self.min_volts, self.max_volts);
        let fraction = (clamped - self.min_volts) / span;
        (fraction * f64::from(self.max_sample)).round() as u32
    }

    /// Decode a raw sample back into volts.
    pub fn volts_from_sample(&self, sample: u32) -> f64 {
        if self.max_sample == 0 {
            return self.min_volts;
        }
        let fraction = f64::from(sample.min(self.max_sample)) / f64::from(self.max_sample);
        self.min_volts + fraction * (self.max_volts - self.min_volts)
    }

    /// Volts represented by one raw step.
    pub fn resolution(&self) -> f64 {
        if self.max_sample == 0 {
            return 0.0;
        }
        (self.max_volts - self.min_volts) / f64::from(self.max_sample)
    }
}

/// One opened acquisition device.
///
/// Mirrors the slice of the comedi API the board interface needs: counts are
/// queried once at open time, ranges per write, and each write transfers a
/// single sample.
pub trait AcquisitionDevice: Send {
    /// Number of channels on a subdevice.
    fn channel_count(&self, subdevice: Subdevice) -> DriverResult<usize>;

    /// Calibrated output range descriptor of one channel.
    fn output_range(&self, subdevice: Subdevice, channel: usize) -> DriverResult<OutputRange>;

    /// Write one raw sample; returns the number of samples transferred.
    fn write_sample(&self, subdevice: Subdevice, channel: usize, sample: u32)
        -> DriverResult<usize>;

    /// Write one digital bit; returns the number of samples transferred.
    fn write_bit(&self, subdevice: Subdevice, channel: usize, level: bool) -> DriverResult<usize>;
}

impl std::fmt::Debug for dyn AcquisitionDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcquisitionDevice").finish_non_exhaustive()
    }
}

/// Factory that opens acquisition devices by path.
pub trait AcquisitionDriver: Send {
    /// Open the device node at `path`.
    fn open(&self, path: &str) -> DriverResult<Box<dyn AcquisitionDevice>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    const RANGE: OutputRange = OutputRange {
        min_volts: 0.0,
        max_volts: 5.0,
        max_sample: 255,
    };

    #[test]
    fn conversion_is_monotonic_over_the_span() {
        let mut previous = RANGE.sample_from_volts(0.0);
        let mut volts = 0.0;
        while volts <= 5.0 {
            let sample = RANGE.sample_from_volts(volts);
            assert!(sample >= previous, "sample dropped at {volts} V");
            previous = sample;
            volts += 0.01;
        }
    }

    #[test]
    fn conversion_clamps_outside_the_span() {
        assert_eq!(RANGE.sample_from_volts(-1.0), 0);
        assert_eq!(RANGE.sample_from_volts(9.0), RANGE.max_sample);
    }

    #[test]
    fn conversion_round_trips_within_resolution() {
        for volts in [0.0, 0.7, 2.5, 3.3, 5.0] {
            let sample = RANGE.sample_from_volts(volts);
            let decoded = RANGE.volts_from_sample(sample);
            assert!(
                (decoded - volts).abs() <= RANGE.resolution(),
                "{volts} V decoded to {decoded} V"
            );
        }
    }

    #[test]
    fn endpoints_map_to_endpoint_samples() {
        assert_eq!(RANGE.sample_from_volts(0.0), 0);
        assert_eq!(RANGE.sample_from_volts(5.0), 255);
        assert_eq!(RANGE.volts_from_sample(255), 5.0);
    }

    #[test]
    fn degenerate_range_never_divides_by_zero() {
        let flat = OutputRange {
            min_volts: 2.0,
            max_volts: 2.0,
            max_sample: 255,
        };
        assert_eq!(flat.sample_from_volts(2.0), 0);

        let empty = OutputRange {
            min_volts: 0.0,
            max_volts: 5.0,
            max_sample: 0,
        };
        assert_eq!(empty.sample_from_volts(3.0), 0);
        assert_eq!(empty.volts_from_sample(7), 0.0);
        assert_eq!(empty.resolution(), 0.0);
    }

    #[test]
    fn k8061_subdevice_indices() {
        assert_eq!(Subdevice::AnalogOutput.index(), 1);
        assert_eq!(Subdevice::DigitalOutput.index(), 3);
    }
}
