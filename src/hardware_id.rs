//! Hardware identifier keys used to match HID devices.

use std::fmt::{self, Display, Formatter};

/// Windows-style HID hardware identifier.
///
/// Renders as `HID\VID_XXXX&PID_XXXX&REV_XXXX&MI_XX`.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct HardwareId {
    pub vendor_id: u16,
    pub product_id: u16,
    pub revision: u16,
    pub interface: Option<u8>,
}

impl Display for HardwareId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HID\\VID_{:04X}&PID_{:04X}&REV_{:04X}",
            self.vendor_id, self.product_id, self.revision
        )?;

        if let Some(interface) = self.interface {
            write!(f, "&MI_{:02X}", interface)?;
        }

        Ok(())
    }
}

/// Encode a string list as NUL separated, double NUL terminated bytes.
pub fn encode_multi_sz<S: AsRef<str>>(strings: &[S]) -> Vec<u8> {
    let mut bytes = Vec::new();

    for string in strings {
        bytes.extend_from_slice(string.as_ref().as_bytes());
        bytes.push(0);
    }
    bytes.push(0);

    bytes
}

/// Decode a NUL separated string list.
///
/// Stops at the first empty entry, invalid UTF-8 is replaced.
pub fn decode_multi_sz(bytes: &[u8]) -> Vec<String> {
    bytes
        .split(|&byte| byte == 0)
        .take_while(|entry| !entry.is_empty())
        .map(|entry| String::from_utf8_lossy(entry).into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: HardwareId =
        HardwareId { vendor_id: 0xff01, product_id: 0x0206, revision: 0x0101, interface: Some(1) };

    #[test]
    fn renders_windows_key() {
        assert_eq!(KEY.to_string(), "HID\\VID_FF01&PID_0206&REV_0101&MI_01");

        let no_interface = HardwareId { interface: None, ..KEY };
        assert_eq!(no_interface.to_string(), "HID\\VID_FF01&PID_0206&REV_0101");
    }

    #[test]
    fn multi_sz() {
        let bytes = encode_multi_sz(&["ab", "c"]);
        assert_eq!(bytes, b"ab\0c\0\0");
        assert_eq!(decode_multi_sz(&bytes), vec![String::from("ab"), String::from("c")]);

        assert!(decode_multi_sz(&[]).is_empty());
        assert!(decode_multi_sz(&[0, 0]).is_empty());
        assert_eq!(decode_multi_sz(b"unterminated"), vec![String::from("unterminated")]);
    }
}
