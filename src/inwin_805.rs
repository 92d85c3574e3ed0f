//! IN-WIN 805 Infinity chassis lighting control.

use bytes::{BufMut, Bytes, BytesMut};

use crate::color::LightState;
use crate::controller::HidController;
use crate::hardware_id::HardwareId;

/// Output report length including the report ID.
pub const REPORT_LEN: usize = 9;

pub struct Inwin805;

impl Inwin805 {
    /// Chassis LED controller, USB interface 1.
    pub const HARDWARE_ID: HardwareId =
        HardwareId { vendor_id: 0xff01, product_id: 0x0206, revision: 0x0101, interface: Some(1) };
}

impl HidController for Inwin805 {
    fn hardware_id(&self) -> HardwareId {
        Self::HARDWARE_ID
    }

    fn report_bytes(&self, state: &LightState) -> Bytes {
        let mut buf = BytesMut::with_capacity(REPORT_LEN);

        // Report ID.
        buf.put_u8(0);

        // Color data.
        let color = state.scaled();
        buf.put_u8(color.r);
        buf.put_u8(color.g);
        buf.put_u8(color.b);

        // Padding.
        buf.put_slice(&[0; 5]);

        buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Brightness, Rgb};

    fn report(r: u8, g: u8, b: u8, brightness: u8) -> Bytes {
        let state = LightState { color: Rgb::new(r, g, b), brightness: Brightness(brightness) };
        Inwin805.report_bytes(&state)
    }

    #[test]
    fn hardware_id() {
        assert_eq!(Inwin805.hardware_id().to_string(), "HID\\VID_FF01&PID_0206&REV_0101&MI_01");
    }

    #[test]
    fn half_brightness_red() {
        assert_eq!(&report(255, 0, 0, 128)[..], &[0, 128, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn full_brightness_is_unscaled() {
        assert_eq!(&report(1, 127, 255, 255)[..], &[0, 1, 127, 255, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn zero_brightness_is_dark() {
        for &(r, g, b) in &[(255, 255, 255), (1, 2, 3), (0, 200, 0)] {
            assert_eq!(&report(r, g, b, 0)[..], &[0; REPORT_LEN]);
        }
    }

    #[test]
    fn layout_holds_for_any_state() {
        for &brightness in &[0u8, 1, 64, 128, 254, 255] {
            for &(r, g, b) in &[(0u8, 0u8, 0u8), (255, 0, 17), (3, 254, 99), (255, 255, 255)] {
                let bytes = report(r, g, b, brightness);
                let scale = |channel: u8| (channel as u32 * brightness as u32 / 255) as u8;

                assert_eq!(bytes.len(), REPORT_LEN);
                assert_eq!(bytes[0], 0);
                assert_eq!(&bytes[1..4], &[scale(r), scale(g), scale(b)]);
                assert_eq!(&bytes[4..], &[0; 5]);
            }
        }
    }
}
