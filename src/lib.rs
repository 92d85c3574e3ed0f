//! IN-WIN 805 Infinity chassis RGB control.
//!
//! The chassis lighting controller is a USB HID device which takes a single 9 byte output
//! report: report ID `0`, the brightness scaled red, green and blue channels and five bytes of
//! padding.
//!
//! ```no_run
//! use inwin_rgb::{Brightness, NativeBackend, Rgb, Session};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::open(NativeBackend::new()?);
//! session.set_color(Rgb::new(0, 0, 0xff));
//! session.set_brightness(Brightness(128));
//! session.update()?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
mod color;
mod controller;
mod error;
mod hardware_id;
mod inwin_805;
pub mod locator;
mod session;

pub use crate::backend::{DeviceSet, Fetch, HidBackend, NativeBackend, PendingIo, ReportSink};
pub use crate::color::{Brightness, LightState, Rgb};
pub use crate::controller::HidController;
pub use crate::error::{LocateError, TransportError, UpdateError};
pub use crate::hardware_id::{decode_multi_sz, encode_multi_sz, HardwareId};
pub use crate::inwin_805::{Inwin805, REPORT_LEN};
pub use crate::locator::locate;
pub use crate::session::Session;
