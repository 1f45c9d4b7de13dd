//! Minimal FFI declarations for comedilib.
//!
//! Only the entry points needed for single-sample output writes on the
//! K8061 are declared; this is not a full binding. Everything is gated
//! behind the `comedi-sdk` feature so that builds on machines without
//! comedilib carry no link-time dependency.

#![allow(non_camel_case_types)]

#[cfg(feature = "comedi-sdk")]
mod bindings {
    use std::os::raw::{c_char, c_int, c_uint};

    /// Raw sample type used by comedi for single-sample transfers.
    pub type lsampl_t = c_uint;

    /// Opaque device handle returned by `comedi_open`.
    #[repr(C)]
    pub struct comedi_t {
        _private: [u8; 0],
    }

    /// Calibrated range descriptor for one channel/range pair.
    #[repr(C)]
    pub struct comedi_range {
        /// Lower end of the range, in physical units.
        pub min: f64,
        /// Upper end of the range, in physical units.
        pub max: f64,
        /// Unit of the range (UNIT_volt = 0).
        pub unit: c_uint,
    }

    /// Ground-referenced analog reference.
    pub const AREF_GROUND: c_uint = 0;

    #[link(name = "comedi")]
    extern "C" {
        pub fn comedi_open(filename: *const c_char) -> *mut comedi_t;
        pub fn comedi_close(device: *mut comedi_t) -> c_int;
        pub fn comedi_get_n_channels(device: *mut comedi_t, subdevice: c_uint) -> c_int;
        pub fn comedi_get_range(
            device: *mut comedi_t,
            subdevice: c_uint,
            channel: c_uint,
            range: c_uint,
        ) -> *mut comedi_range;
        pub fn comedi_get_maxdata(
            device: *mut comedi_t,
            subdevice: c_uint,
            channel: c_uint,
        ) -> lsampl_t;
        pub fn comedi_data_write(
            device: *mut comedi_t,
            subdevice: c_uint,
            channel: c_uint,
            range: c_uint,
            aref: c_uint,
            data: lsampl_t,
        ) -> c_int;
        pub fn comedi_dio_write(
            device: *mut comedi_t,
            subdevice: c_uint,
            channel: c_uint,
            bit: c_uint,
        ) -> c_int;
        pub fn comedi_errno() -> c_int;
        pub fn comedi_strerror(errnum: c_int) -> *const c_char;
    }
}

#[cfg(feature = "comedi-sdk")]
pub use bindings::*;
