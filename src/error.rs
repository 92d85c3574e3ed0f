//! Error types for device discovery and report writes.

use thiserror::Error;

/// Failure reported by a HID backend.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HID error: {0}")]
    Hid(#[from] hidapi::HidError),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("device disconnected")]
    Disconnected,

    #[error("no write in flight")]
    Idle,
}

/// Failure to find or open the device.
///
/// Every variant is fatal to the attempt but never to the process.
#[derive(Error, Debug)]
pub enum LocateError {
    #[error("failed to enumerate the device classes: {0}")]
    Enumerate(#[source] TransportError),

    #[error("no device matches {key}")]
    DeviceNotFound { key: String },

    #[error("failed to get the device interface")]
    Interface,

    #[error("failed to allocate {size} bytes for device details")]
    AllocDetails { size: usize },

    #[error("failed to allocate {size} bytes for the device path")]
    AllocPath { size: usize },

    #[error("failed to copy the device path")]
    CopyPath,

    #[error("failed to get the device details")]
    Details,

    #[error("failed to open the device: {0}")]
    Open(#[source] TransportError),

    #[error("failed to allocate {size} bytes for device descriptions")]
    AllocDescription { size: usize },
}

impl LocateError {
    /// Numeric failure code.
    pub fn code(&self) -> u32 {
        match self {
            Self::Enumerate(_) => 0xC008_0001,
            Self::DeviceNotFound { .. } => 0xC008_0002,
            Self::Interface => 0xC008_0003,
            Self::AllocDetails { .. } => 0xC008_0004,
            Self::AllocPath { .. } => 0xC008_0005,
            Self::CopyPath => 0xC008_0006,
            Self::Details => 0xC008_0007,
            Self::Open(_) => 0xC008_0008,
            Self::AllocDescription { .. } => 0xC008_0009,
        }
    }
}

/// Failure to write a report.
#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("no open device handle")]
    BadHandle,

    #[error("failed to write to the device: {0}")]
    WriteFailed(#[source] TransportError),

    #[error("failed to get the number of sent bytes: {0}")]
    OverlappedFailed(#[source] TransportError),
}

impl UpdateError {
    /// Negative failure code.
    pub fn code(&self) -> i32 {
        match self {
            Self::BadHandle => -1,
            Self::WriteFailed(_) => -2,
            Self::OverlappedFailed(_) => -3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate_codes_are_distinct() {
        let errors = [
            LocateError::Enumerate(TransportError::Disconnected),
            LocateError::DeviceNotFound { key: String::new() },
            LocateError::Interface,
            LocateError::AllocDetails { size: 0 },
            LocateError::AllocPath { size: 0 },
            LocateError::CopyPath,
            LocateError::Details,
            LocateError::Open(TransportError::Disconnected),
            LocateError::AllocDescription { size: 0 },
        ];

        let mut codes: Vec<u32> = errors.iter().map(LocateError::code).collect();
        assert_eq!(codes[0], 0xC008_0001);
        assert_eq!(codes[7], 0xC008_0008);

        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn update_codes_are_negative() {
        assert_eq!(UpdateError::BadHandle.code(), -1);
        assert_eq!(UpdateError::WriteFailed(TransportError::Idle).code(), -2);
        assert_eq!(UpdateError::OverlappedFailed(TransportError::Idle).code(), -3);
    }

    #[test]
    fn messages_describe_the_cause() {
        let err = UpdateError::WriteFailed(TransportError::Io("pipe broken".into()));
        assert_eq!(err.to_string(), "failed to write to the device: I/O error: pipe broken");

        let err = LocateError::DeviceNotFound { key: "HID\\VID_FF01".into() };
        assert_eq!(err.to_string(), "no device matches HID\\VID_FF01");
    }
}
