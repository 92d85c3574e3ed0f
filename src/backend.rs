//! HID backend abstraction.
//!
//! A backend walks the HID device class and opens devices. The locator drives the walk through
//! [`DeviceSet`], so buffer sizing and matching stay independent of the platform API.

pub mod mock;
pub mod native;

use std::ffi::CStr;

use bytes::Bytes;

use crate::error::TransportError;

pub use native::NativeBackend;

/// Result of reading a device property into a caller supplied buffer.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum Fetch {
    /// Property copied, with its length in bytes.
    Done(usize),
    /// Buffer too small, with the required size in bytes.
    TooSmall(usize),
    /// Device exists but the property could not be read.
    Unavailable,
    /// No device at this index.
    End,
}

impl Fetch {
    /// Copy `value` into `buf` if it fits.
    pub fn copy(value: &[u8], buf: &mut [u8]) -> Self {
        match buf.get_mut(..value.len()) {
            Some(dst) => {
                dst.copy_from_slice(value);
                Fetch::Done(value.len())
            },
            None => Fetch::TooSmall(value.len()),
        }
    }
}

/// Snapshot of the present HID devices.
pub trait DeviceSet {
    /// Handle to a device's HID interface.
    type Interface;

    /// Read the hardware identifier list of the device at `index`.
    ///
    /// The list is NUL separated and double NUL terminated.
    fn hardware_ids(&self, index: usize, buf: &mut [u8]) -> Fetch;

    /// Resolve the HID interface of the device at `index`.
    fn interface(&self, index: usize) -> Option<Self::Interface>;

    /// Read the NUL terminated path of an interface.
    fn interface_path(&self, interface: &Self::Interface, buf: &mut [u8]) -> Fetch;
}

/// Platform access to HID devices.
pub trait HidBackend {
    type Devices: DeviceSet;
    type Device: ReportSink;

    /// Enumerate all present HID devices.
    fn enumerate(&mut self) -> Result<Self::Devices, TransportError>;

    /// Open a device path for shared asynchronous read/write access.
    fn open(&mut self, path: &CStr) -> Result<Self::Device, TransportError>;
}

/// Open device accepting asynchronous output reports.
///
/// A device is closed when it is dropped.
pub trait ReportSink {
    /// Start writing `report`, without waiting for the transfer.
    fn submit(&mut self, io: &mut PendingIo, report: Bytes) -> Result<(), TransportError>;

    /// Block until the submitted write finishes, returning the transferred bytes.
    fn complete(&mut self, io: &mut PendingIo) -> Result<usize, TransportError>;
}

/// Reusable descriptor for the write in flight.
///
/// Only one write may be outstanding per descriptor.
#[derive(Debug)]
pub struct PendingIo {
    offset: u64,
    in_flight: bool,
}

impl PendingIo {
    /// Offset sentinel for devices without a file position.
    pub const APPEND: u64 = u64::max_value();

    pub fn new() -> Self {
        Self { offset: Self::APPEND, in_flight: false }
    }

    /// Reset the offset and drop any stale write.
    pub fn reset(&mut self) {
        self.offset = Self::APPEND;
        self.in_flight = false;
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Mark a write as submitted.
    pub fn begin(&mut self) -> Result<(), TransportError> {
        if self.in_flight {
            return Err(TransportError::Io("write already in flight".into()));
        }

        self.in_flight = true;
        Ok(())
    }

    /// Mark the submitted write as finished.
    pub fn finish(&mut self) -> Result<(), TransportError> {
        if !self.in_flight {
            return Err(TransportError::Idle);
        }

        self.in_flight = false;
        Ok(())
    }
}

impl Default for PendingIo {
    fn default() -> Self {
        Self::new()
    }
}
