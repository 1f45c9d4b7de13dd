//! Custom error types for the adapter.
//!
//! This module defines the primary error type, `DriverError`, for the entire
//! crate. Using the `thiserror` crate, it provides a centralized and
//! consistent way to handle the failure modes of the data path:
//!
//! - **`OpenFailed`**: the acquisition driver could not open the device node
//!   (device absent, permission denied, driver not loaded).
//! - **`DeviceNotOpen`**: a write was attempted before a successful open, or
//!   after the handle was released.
//! - **`InvalidChannel`**: the channel index is outside what the opened
//!   device reported at open time.
//! - **`WriteFailed`**: the driver did not report exactly one sample
//!   transferred for a single-sample write.
//! - **`Driver`**: any other failure surfaced by the driver backend, carried
//!   as the backend's own error text.
//!
//! The remaining variants cover the property surface (unknown names, values
//! rejected by a constraint), configuration, and the module factory. No
//! failure is retried internally and none is fatal to the process; every
//! error is terminal for that one operation only.

use thiserror::Error;

/// Convenience alias for results using the adapter error type.
pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// Error type shared by the board interface, the adapter, and the host glue.
#[derive(Error, Debug)]
pub enum DriverError {
    /// The acquisition driver could not open the device node.
    #[error("Failed to open acquisition device '{path}': {reason}")]
    OpenFailed {
        /// Path of the device node that was attempted.
        path: String,
        /// Driver-supplied reason.
        reason: String,
    },

    /// A write was attempted without an open device handle.
    #[error("Acquisition device is not open")]
    DeviceNotOpen,

    /// The channel index exceeds what the opened device reported.
    #[error("Invalid channel index {channel} (device reports {available} channels)")]
    InvalidChannel {
        /// Requested channel index.
        channel: usize,
        /// Channel count reported by the driver at open time.
        available: usize,
    },

    /// A single-sample write did not transfer exactly one sample.
    #[error("Driver write failed: expected 1 sample transferred, got {transferred}")]
    WriteFailed {
        /// Sample count the driver reported.
        transferred: usize,
    },

    /// Backend-specific driver failure.
    #[error("Driver error: {0}")]
    Driver(String),

    /// The property name is not declared by the device.
    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    /// The value was rejected by the property's declared constraint.
    #[error("Invalid value for property '{name}': {reason}")]
    InvalidPropertyValue {
        /// Property name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The module factory does not know the requested device name.
    #[error("Unknown device: {0}")]
    UnknownDevice(String),

    /// Semantic error in the configuration (parsed fine, makes no sense).
    #[error("Configuration validation error: {0}")]
    Configuration(String),

    /// Configuration file could not be parsed.
    #[error("Configuration file error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error, e.g. while reading a configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Functionality compiled out by a feature flag.
    #[error("Feature '{0}' is not enabled. Rebuild with --features {0}")]
    FeatureNotEnabled(String),
}
