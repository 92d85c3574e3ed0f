//! hidapi backed device access.
//!
//! hidapi only offers blocking writes, so every opened device gets an I/O worker thread which
//! owns the `HidDevice`. Submitting a report hands it to the worker and completing it waits for
//! the worker's reply.

use std::convert::TryFrom;
use std::ffi::CStr;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use bytes::Bytes;
use hidapi::{DeviceInfo, HidApi, HidResult};
use log::{debug, trace, warn};

use crate::backend::{DeviceSet, Fetch, HidBackend, PendingIo, ReportSink};
use crate::error::TransportError;
use crate::hardware_id::{encode_multi_sz, HardwareId};

/// Backend for the HID devices attached to this machine.
pub struct NativeBackend {
    api: HidApi,
}

impl NativeBackend {
    pub fn new() -> Result<Self, TransportError> {
        Ok(Self { api: HidApi::new()? })
    }
}

impl HidBackend for NativeBackend {
    type Devices = NativeDevices;
    type Device = NativeDevice;

    fn enumerate(&mut self) -> Result<NativeDevices, TransportError> {
        self.api.refresh_devices()?;

        let devices: Vec<_> = self.api.device_list().map(NativeEntry::new).collect();
        debug!("Enumerated {} HID devices", devices.len());

        Ok(NativeDevices { devices })
    }

    fn open(&mut self, path: &CStr) -> Result<NativeDevice, TransportError> {
        let device = self.api.open_path(path)?;
        NativeDevice::spawn(move |report| device.write(report), path)
    }
}

/// Properties of one enumerated device.
struct NativeEntry {
    hardware_ids: Vec<u8>,
    path: Vec<u8>,
}

impl NativeEntry {
    fn new(info: &DeviceInfo) -> Self {
        let id = hardware_id(
            info.vendor_id(),
            info.product_id(),
            info.release_number(),
            info.interface_number(),
        );

        Self {
            hardware_ids: encode_multi_sz(&[id.to_string()]),
            path: info.path().to_bytes_with_nul().to_vec(),
        }
    }
}

/// Rebuild the Windows hardware identifier from hidapi's device info fields.
fn hardware_id(vendor_id: u16, product_id: u16, release: u16, interface_number: i32) -> HardwareId {
    HardwareId {
        vendor_id,
        product_id,
        revision: release,
        // hidapi reports -1 when the interface is unknown.
        interface: u8::try_from(interface_number).ok(),
    }
}

/// Device list captured by [`NativeBackend::enumerate`].
pub struct NativeDevices {
    devices: Vec<NativeEntry>,
}

impl DeviceSet for NativeDevices {
    type Interface = usize;

    fn hardware_ids(&self, index: usize, buf: &mut [u8]) -> Fetch {
        match self.devices.get(index) {
            Some(entry) => Fetch::copy(&entry.hardware_ids, buf),
            None => Fetch::End,
        }
    }

    fn interface(&self, index: usize) -> Option<usize> {
        self.devices.get(index).map(|_| index)
    }

    fn interface_path(&self, interface: &usize, buf: &mut [u8]) -> Fetch {
        match self.devices.get(*interface) {
            Some(entry) => Fetch::copy(&entry.path, buf),
            None => Fetch::Unavailable,
        }
    }
}

/// Open device served by an I/O worker thread.
pub struct NativeDevice {
    requests: Option<Sender<Bytes>>,
    completions: Receiver<HidResult<usize>>,
    worker: Option<JoinHandle<()>>,
}

impl NativeDevice {
    /// Start the worker thread, which passes every submitted report to `write`.
    fn spawn<W>(mut write: W, path: &CStr) -> Result<Self, TransportError>
    where
        W: FnMut(&[u8]) -> HidResult<usize> + Send + 'static,
    {
        let (requests, inbox) = mpsc::channel::<Bytes>();
        let (outbox, completions) = mpsc::channel();

        let name = path.to_string_lossy().into_owned();
        let worker = thread::Builder::new()
            .name(String::from("inwin-rgb-io"))
            .spawn(move || {
                for report in inbox {
                    if outbox.send(write(&report)).is_err() {
                        break;
                    }
                }

                debug!("Closed {}", name);
            })
            .map_err(|err| TransportError::Io(err.to_string()))?;

        Ok(Self { requests: Some(requests), completions, worker: Some(worker) })
    }
}

impl ReportSink for NativeDevice {
    fn submit(&mut self, io: &mut PendingIo, report: Bytes) -> Result<(), TransportError> {
        let requests = self.requests.as_ref().ok_or(TransportError::Disconnected)?;

        io.begin()?;
        trace!("Submitting {:02x?} at offset {:#x}", &report[..], io.offset());

        if requests.send(report).is_err() {
            io.reset();
            return Err(TransportError::Disconnected);
        }

        Ok(())
    }

    fn complete(&mut self, io: &mut PendingIo) -> Result<usize, TransportError> {
        io.finish()?;

        match self.completions.recv() {
            Ok(Ok(written)) => Ok(written),
            Ok(Err(err)) => Err(TransportError::from(err)),
            Err(_) => Err(TransportError::Disconnected),
        }
    }
}

impl Drop for NativeDevice {
    fn drop(&mut self) {
        // Closing the request channel stops the worker.
        self.requests = None;

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("I/O worker panicked");
            }
        }
    }
}
