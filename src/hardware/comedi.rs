//! Comedi backend.
//!
//! Real acquisition driver over comedilib via the `comedi-sys` bindings.
//! Writes are single-sample, ground-referenced, against range descriptor 0,
//! which is how the K8061 exposes its outputs.

#![allow(unsafe_code)]

use std::ffi::{CStr, CString};
use std::os::raw::c_uint;
use std::ptr::NonNull;

use comedi_sys as ffi;
use log::debug;

use crate::error::{DriverError, DriverResult};

use super::{AcquisitionDevice, AcquisitionDriver, OutputRange, Subdevice};

/// Driver backend that opens devices through comedilib.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComediDriver;

impl ComediDriver {
    /// Create the backend. Opening happens per device, not here.
    pub fn new() -> Self {
        Self
    }
}

fn last_error() -> String {
    // SAFETY: comedi_strerror returns a pointer into a static message table.
    unsafe {
        let errnum = ffi::comedi_errno();
        let message = ffi::comedi_strerror(errnum);
        if message.is_null() {
            format!("comedi error {errnum}")
        } else {
            CStr::from_ptr(message).to_string_lossy().into_owned()
        }
    }
}

impl AcquisitionDriver for ComediDriver {
    fn open(&self, path: &str) -> DriverResult<Box<dyn AcquisitionDevice>> {
        let c_path = CString::new(path).map_err(|_| DriverError::OpenFailed {
            path: path.to_string(),
            reason: "path contains a NUL byte".to_string(),
        })?;
        // SAFETY: c_path is a valid NUL-terminated string for the duration of
        // the call; comedi_open does not retain the pointer.
        let handle = unsafe { ffi::comedi_open(c_path.as_ptr()) };
        let Some(handle) = NonNull::new(handle) else {
            return Err(DriverError::OpenFailed {
                path: path.to_string(),
                reason: last_error(),
            });
        };
        debug!("comedi_open({path}) succeeded");
        Ok(Box::new(ComediDevice { handle }))
    }
}

/// One open comedi device. The handle is closed on drop.
struct ComediDevice {
    handle: NonNull<ffi::comedi_t>,
}

// SAFETY: a comedi handle is a file-descriptor wrapper with no thread
// affinity; this crate only ever moves it, it never shares it.
unsafe impl Send for ComediDevice {}

impl Drop for ComediDevice {
    fn drop(&mut self) {
        // SAFETY: the handle came from comedi_open and is closed exactly once.
        unsafe {
            ffi::comedi_close(self.handle.as_ptr());
        }
    }
}

impl AcquisitionDevice for ComediDevice {
    fn channel_count(&self, subdevice: Subdevice) -> DriverResult<usize> {
        // SAFETY: valid handle, fixed subdevice index.
        let count =
            unsafe { ffi::comedi_get_n_channels(self.handle.as_ptr(), subdevice.index()) };
        if count < 0 {
            return Err(DriverError::Driver(last_error()));
        }
        Ok(count as usize)
    }

    fn output_range(&self, subdevice: Subdevice, channel: usize) -> DriverResult<OutputRange> {
        // Range descriptor 0 is the only one the K8061 provides.
        // SAFETY: the returned pointer aliases comedilib-owned memory that
        // lives as long as the handle; it is read immediately and not kept.
        unsafe {
            let range = ffi::comedi_get_range(
                self.handle.as_ptr(),
                subdevice.index(),
                channel as c_uint,
                0,
            );
            if range.is_null() {
                return Err(DriverError::Driver(last_error()));
            }
            let max_sample =
                ffi::comedi_get_maxdata(self.handle.as_ptr(), subdevice.index(), channel as c_uint);
            if max_sample == 0 {
                return Err(DriverError::Driver(format!(
                    "channel {channel} reports an empty sample range"
                )));
            }
            Ok(OutputRange {
                min_volts: (*range).min,
                max_volts: (*range).max,
                max_sample,
            })
        }
    }

    fn write_sample(
        &self,
        subdevice: Subdevice,
        channel: usize,
        sample: u32,
    ) -> DriverResult<usize> {
        // SAFETY: valid handle; one synchronous single-sample transfer.
        let written = unsafe {
            ffi::comedi_data_write(
                self.handle.as_ptr(),
                subdevice.index(),
                channel as c_uint,
                0,
                ffi::AREF_GROUND,
                sample,
            )
        };
        if written < 0 {
            return Err(DriverError::Driver(last_error()));
        }
        Ok(written as usize)
    }

    fn write_bit(&self, subdevice: Subdevice, channel: usize, level: bool) -> DriverResult<usize> {
        // SAFETY: valid handle; comedi_dio_write reports 1 on success.
        let written = unsafe {
            ffi::comedi_dio_write(
                self.handle.as_ptr(),
                subdevice.index(),
                channel as c_uint,
                c_uint::from(level),
            )
        };
        if written < 0 {
            return Err(DriverError::Driver(last_error()));
        }
        Ok(written as usize)
    }
}
