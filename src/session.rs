//! Device session lifecycle and report writes.

use std::convert::TryFrom;

use log::{trace, warn};

use crate::backend::{HidBackend, PendingIo, ReportSink};
use crate::color::{Brightness, LightState, Rgb};
use crate::controller::HidController;
use crate::error::UpdateError;
use crate::inwin_805::Inwin805;
use crate::locator;

/// Connection to one lighting controller.
///
/// Owns at most one open device handle and the light state written by [`Session::update`]. The
/// handle is closed before every reopen and when the session is dropped.
///
/// Writes are serialized through `&mut self`; share a session between threads with a `Mutex`.
pub struct Session<B: HidBackend> {
    backend: B,
    controller: Box<dyn HidController + Send>,
    device: Option<B::Device>,
    io: PendingIo,
    state: LightState,
}

impl<B: HidBackend> Session<B> {
    /// Create a closed session for the IN-WIN 805 controller.
    pub fn new(backend: B) -> Self {
        Self::with_controller(backend, Inwin805)
    }

    /// Create a closed session for a different controller.
    pub fn with_controller<C>(backend: B, controller: C) -> Self
    where
        C: HidController + Send + 'static,
    {
        Self {
            controller: Box::new(controller),
            io: PendingIo::new(),
            state: LightState::default(),
            device: None,
            backend,
        }
    }

    /// Create a session and try to open its device.
    pub fn open(backend: B) -> Self {
        let mut session = Self::new(backend);
        session.initialize();
        session
    }

    /// Close any open handle and look up the device again.
    ///
    /// A missing or broken device is logged and leaves the session closed.
    pub fn initialize(&mut self) {
        self.teardown();
        self.io.reset();

        let key = self.controller.hardware_id();
        match locator::locate(&mut self.backend, &key) {
            Ok(device) => self.device = Some(device),
            Err(err) => warn!("Unable to open {}: {} ({:#010x})", key, err, err.code()),
        }
    }

    /// Close the device handle, if one is open.
    pub fn teardown(&mut self) {
        if self.device.take().is_some() {
            trace!("Closed device handle");
        }
    }

    pub fn is_open(&self) -> bool {
        self.device.is_some()
    }

    pub fn state(&self) -> &LightState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut LightState {
        &mut self.state
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.state.color = color;
    }

    pub fn set_brightness(&mut self, brightness: Brightness) {
        self.state.brightness = brightness;
    }

    #[cfg(test)]
    pub(crate) fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Write the current light state to the device.
    ///
    /// Blocks until the transfer finishes and returns the number of bytes written. There is no
    /// timeout, a stalled device stalls the caller.
    pub fn update(&mut self) -> Result<usize, UpdateError> {
        let device = self.device.as_mut().ok_or(UpdateError::BadHandle)?;

        let report = self.controller.report_bytes(&self.state);
        device.submit(&mut self.io, report).map_err(UpdateError::WriteFailed)?;

        let written = device.complete(&mut self.io).map_err(UpdateError::OverlappedFailed)?;
        trace!("Wrote {} bytes for {}", written, self.state);

        Ok(written)
    }

    /// Write the current light state, folding the result into one integer.
    ///
    /// Positive values are the bytes written, negative values are [`UpdateError::code`]s.
    pub fn update_code(&mut self) -> i32 {
        match self.update() {
            Ok(written) => i32::try_from(written).unwrap_or(i32::max_value()),
            Err(err) => err.code(),
        }
    }
}

impl<B: HidBackend> Drop for Session<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}
