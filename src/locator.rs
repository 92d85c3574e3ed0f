//! Device discovery.

use std::ffi::CString;

use log::{debug, info, trace};

use crate::backend::{DeviceSet, Fetch, HidBackend};
use crate::error::LocateError;
use crate::hardware_id::{decode_multi_sz, HardwareId};

/// Find the first device matching `key` and open it.
pub fn locate<B: HidBackend>(backend: &mut B, key: &HardwareId) -> Result<B::Device, LocateError> {
    let devices = backend.enumerate().map_err(LocateError::Enumerate)?;

    let index = find_device(&devices, key)?;
    let path = device_path(&devices, index)?;

    let device = backend.open(&path).map_err(LocateError::Open)?;
    info!("Opened {} at {}", key, path.to_string_lossy());

    Ok(device)
}

/// Index of the first device whose most specific hardware identifier is `key`.
pub fn find_device<D: DeviceSet>(devices: &D, key: &HardwareId) -> Result<usize, LocateError> {
    let key = key.to_string();

    for index in 0.. {
        let property = read_property(
            |buf| devices.hardware_ids(index, buf),
            |size| LocateError::AllocDescription { size },
        )?;

        let ids = match property {
            Property::Value(bytes) => decode_multi_sz(&bytes),
            Property::Unavailable => {
                trace!("Skipping device {} without hardware identifiers", index);
                continue;
            },
            Property::End => break,
        };

        if ids.first() == Some(&key) {
            debug!("Found {} at index {}", key, index);
            return Ok(index);
        }
    }

    Err(LocateError::DeviceNotFound { key })
}

/// Resolve the path of the device at `index`.
pub fn device_path<D: DeviceSet>(devices: &D, index: usize) -> Result<CString, LocateError> {
    let interface = devices.interface(index).ok_or(LocateError::Interface)?;

    let details = match read_property(
        |buf| devices.interface_path(&interface, buf),
        |size| LocateError::AllocDetails { size },
    )? {
        Property::Value(details) => details,
        Property::Unavailable | Property::End => return Err(LocateError::Details),
    };

    copy_path(&details)
}

/// Copy the NUL terminated path out of an interface detail buffer.
fn copy_path(details: &[u8]) -> Result<CString, LocateError> {
    let len = match details.iter().position(|&byte| byte == 0) {
        Some(0) | None => return Err(LocateError::CopyPath),
        Some(len) => len,
    };

    let mut path = alloc(len + 1, |size| LocateError::AllocPath { size })?;
    path.extend_from_slice(&details[..len]);

    CString::new(path).map_err(|_| LocateError::CopyPath)
}

/// Outcome of a sized property read.
enum Property {
    Value(Vec<u8>),
    Unavailable,
    End,
}

/// Query a property's size, allocate and read it again once.
fn read_property<R, E>(mut read: R, alloc_error: E) -> Result<Property, LocateError>
where
    R: FnMut(&mut [u8]) -> Fetch,
    E: Fn(usize) -> LocateError,
{
    let required = match read(&mut [0; 0][..]) {
        Fetch::TooSmall(required) => required,
        Fetch::Done(_) => return Ok(Property::Value(Vec::new())),
        Fetch::Unavailable => return Ok(Property::Unavailable),
        Fetch::End => return Ok(Property::End),
    };

    let mut buf = alloc(required, alloc_error)?;
    buf.resize(required, 0);

    match read(&mut buf) {
        Fetch::Done(len) => {
            buf.truncate(len);
            Ok(Property::Value(buf))
        },
        Fetch::TooSmall(_) | Fetch::Unavailable => Ok(Property::Unavailable),
        Fetch::End => Ok(Property::End),
    }
}

/// Reserve an empty buffer with room for exactly `size` bytes.
fn alloc<E>(size: usize, alloc_error: E) -> Result<Vec<u8>, LocateError>
where
    E: Fn(usize) -> LocateError,
{
    let mut buf = Vec::new();
    buf.try_reserve_exact(size).map_err(|_| alloc_error(size))?;
    Ok(buf)
}
