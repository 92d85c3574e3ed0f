//! RGB controller abstraction.

use bytes::Bytes;

use crate::color::LightState;
use crate::hardware_id::HardwareId;

/// HID RGB controller.
pub trait HidController {
    /// Hardware identifier used to find the controller.
    fn hardware_id(&self) -> HardwareId;

    /// Convert light state to the controller's output report.
    fn report_bytes(&self, state: &LightState) -> Bytes;
}
