//! Device adapter for a laser illumination board.
//!
//! Drives a Velleman K8061 interface board through the comedi acquisition
//! driver layer, exposing analog voltage channels and digital enable lines as
//! named, bounded properties a microscopy control host can set.
//!
//! The crate is layered strictly:
//!
//! - [`hardware`]: the acquisition driver traits, the comedi and mock
//!   backends, and the [`hardware::InterfaceBoard`] that owns the open handle
//!   and performs validated, unit-converted writes.
//! - [`adapter`]: the [`adapter::LaserDriver`] mapping property names to
//!   channel indices and forwarding accepted values to the board.
//! - [`device`]: the host-facing lifecycle contract plus a minimal property
//!   store that stands in for the host framework in tests and the CLI.
//!
//! Control flow is one-directional and synchronous: host callback -> adapter
//! -> board -> driver write. No queues, no background threads, no locking in
//! the data path.
//!
//! # Example
//!
//! ```rust
//! use laser_driver::adapter::LaserDriver;
//! use laser_driver::config::AdapterConfig;
//! use laser_driver::device::DeviceHost;
//! use laser_driver::hardware::MockDriver;
//!
//! # fn main() -> laser_driver::error::DriverResult<()> {
//! let driver = MockDriver::new();
//! let adapter = LaserDriver::new(AdapterConfig::default(), Box::new(driver));
//! let mut host = DeviceHost::new(Box::new(adapter));
//!
//! host.initialize()?;
//! host.set_property("Voltage Analog 1", 2.5)?;
//! host.set_property("Enable Digital 1", "On")?;
//! host.shutdown()?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod config;
pub mod device;
pub mod error;
pub mod hardware;
pub mod module;
pub mod property;

pub use adapter::LaserDriver;
pub use config::AdapterConfig;
pub use device::{Device, DeviceHost};
pub use error::{DriverError, DriverResult};
pub use hardware::InterfaceBoard;
