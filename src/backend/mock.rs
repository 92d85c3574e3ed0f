//! In-memory backend for exercising sessions without hardware.

use std::ffi::{CStr, CString};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;

use crate::backend::{DeviceSet, Fetch, HidBackend, PendingIo, ReportSink};
use crate::error::TransportError;
use crate::hardware_id::encode_multi_sz;

/// Simulated HID device.
#[derive(Debug, Clone)]
pub struct MockDevice {
    pub hardware_ids: Option<Vec<String>>,
    pub path: Option<Vec<u8>>,
    pub has_interface: bool,
}

impl MockDevice {
    pub fn new(hardware_id: &str, path: &str) -> Self {
        let mut path = path.as_bytes().to_vec();
        path.push(0);

        Self { hardware_ids: Some(vec![hardware_id.into()]), path: Some(path), has_interface: true }
    }
}

/// Observations shared between the backend, its devices and observers.
#[derive(Default, Debug)]
struct Ledger {
    enumerations: usize,
    opened: Vec<CString>,
    live: usize,
    writes: Vec<Bytes>,
    offsets: Vec<u64>,
}

/// Failure injection switches.
#[derive(Default, Debug, Copy, Clone)]
pub struct Faults {
    pub enumerate: bool,
    pub open: bool,
    pub submit: bool,
    pub complete: bool,
}

/// Backend serving a configurable list of devices.
#[derive(Default)]
pub struct MockBackend {
    pub devices: Vec<MockDevice>,
    pub faults: Faults,
    ledger: Arc<Mutex<Ledger>>,
}

impl MockBackend {
    pub fn new(devices: Vec<MockDevice>) -> Self {
        Self { devices, ..Default::default() }
    }

    /// Handle for inspecting the backend after it was moved into a session.
    pub fn observer(&self) -> MockObserver {
        MockObserver { ledger: self.ledger.clone() }
    }
}

impl HidBackend for MockBackend {
    type Devices = MockDevices;
    type Device = MockHandle;

    fn enumerate(&mut self) -> Result<MockDevices, TransportError> {
        if self.faults.enumerate {
            return Err(TransportError::Io("enumeration failed".into()));
        }

        lock(&self.ledger).enumerations += 1;
        Ok(MockDevices { devices: self.devices.clone() })
    }

    fn open(&mut self, path: &CStr) -> Result<MockHandle, TransportError> {
        if self.faults.open {
            return Err(TransportError::Io("access denied".into()));
        }

        let mut ledger = lock(&self.ledger);
        ledger.opened.push(path.to_owned());
        ledger.live += 1;

        Ok(MockHandle { ledger: self.ledger.clone(), faults: self.faults, submitted: None })
    }
}

/// Snapshot returned by [`MockBackend::enumerate`].
pub struct MockDevices {
    devices: Vec<MockDevice>,
}

impl DeviceSet for MockDevices {
    type Interface = usize;

    fn hardware_ids(&self, index: usize, buf: &mut [u8]) -> Fetch {
        match self.devices.get(index) {
            Some(MockDevice { hardware_ids: Some(ids), .. }) => {
                Fetch::copy(&encode_multi_sz(ids.as_slice()), buf)
            },
            Some(_) => Fetch::Unavailable,
            None => Fetch::End,
        }
    }

    fn interface(&self, index: usize) -> Option<usize> {
        self.devices.get(index).filter(|device| device.has_interface).map(|_| index)
    }

    fn interface_path(&self, interface: &usize, buf: &mut [u8]) -> Fetch {
        match self.devices.get(*interface).and_then(|device| device.path.as_ref()) {
            Some(path) => Fetch::copy(path, buf),
            None => Fetch::Unavailable,
        }
    }
}

/// Open mock device, counted until dropped.
pub struct MockHandle {
    ledger: Arc<Mutex<Ledger>>,
    faults: Faults,
    submitted: Option<usize>,
}

impl ReportSink for MockHandle {
    fn submit(&mut self, io: &mut PendingIo, report: Bytes) -> Result<(), TransportError> {
        if self.faults.submit {
            return Err(TransportError::Io("write rejected".into()));
        }

        io.begin()?;

        let mut ledger = lock(&self.ledger);
        ledger.offsets.push(io.offset());
        self.submitted = Some(report.len());
        ledger.writes.push(report);

        Ok(())
    }

    fn complete(&mut self, io: &mut PendingIo) -> Result<usize, TransportError> {
        io.finish()?;

        if self.faults.complete {
            return Err(TransportError::Disconnected);
        }

        self.submitted.take().ok_or(TransportError::Idle)
    }
}

impl Drop for MockHandle {
    fn drop(&mut self) {
        lock(&self.ledger).live -= 1;
    }
}

/// Read access to everything a [`MockBackend`] observed.
#[derive(Clone)]
pub struct MockObserver {
    ledger: Arc<Mutex<Ledger>>,
}

impl MockObserver {
    /// Number of currently open handles.
    pub fn live_handles(&self) -> usize {
        lock(&self.ledger).live
    }

    /// Paths of every open call, in order.
    pub fn opened(&self) -> Vec<CString> {
        lock(&self.ledger).opened.clone()
    }

    pub fn enumerations(&self) -> usize {
        lock(&self.ledger).enumerations
    }

    /// Reports submitted so far.
    pub fn writes(&self) -> Vec<Bytes> {
        lock(&self.ledger).writes.clone()
    }

    /// Descriptor offsets seen at submission.
    pub fn offsets(&self) -> Vec<u64> {
        lock(&self.ledger).offsets.clone()
    }
}

fn lock(ledger: &Mutex<Ledger>) -> MutexGuard<'_, Ledger> {
    ledger.lock().unwrap_or_else(PoisonError::into_inner)
}
