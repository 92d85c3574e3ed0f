//! LED color state.

use std::fmt::{self, Display, Formatter};

/// RGB color.
#[derive(Default, PartialEq, Eq, Debug, Copy, Clone)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Display for Rgb {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// LED brightness.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct Brightness(pub u8);

impl Brightness {
    pub const fn max_value() -> Self {
        Self(u8::max_value())
    }

    /// Scale a color channel by this brightness.
    ///
    /// Truncates, so full brightness is the identity and zero brightness is always off.
    pub fn scale(self, channel: u8) -> u8 {
        (channel as u16 * self.0 as u16 / u8::max_value() as u16) as u8
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self::max_value()
    }
}

impl Display for Brightness {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Color and brightness applied on the next update.
#[derive(Default, PartialEq, Eq, Debug, Copy, Clone)]
pub struct LightState {
    pub color: Rgb,
    pub brightness: Brightness,
}

impl LightState {
    /// Color with the brightness applied to every channel.
    pub fn scaled(&self) -> Rgb {
        Rgb {
            r: self.brightness.scale(self.color.r),
            g: self.brightness.scale(self.color.g),
            b: self.brightness.scale(self.color.b),
        }
    }
}

impl Display for LightState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.color, self.brightness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_black_at_full_brightness() {
        let state = LightState::default();
        assert_eq!(state.color, Rgb::new(0, 0, 0));
        assert_eq!(state.brightness, Brightness(255));
    }

    #[test]
    fn scale_truncates() {
        assert_eq!(Brightness(128).scale(255), 128);
        assert_eq!(Brightness(128).scale(1), 0);
        assert_eq!(Brightness(200).scale(100), 78);
        assert_eq!(Brightness(255).scale(17), 17);
    }

    #[test]
    fn scale_matches_floor_everywhere() {
        for brightness in 0..=255u16 {
            for channel in (0..=255u16).step_by(5) {
                let expected = (channel * brightness / 255) as u8;
                assert_eq!(Brightness(brightness as u8).scale(channel as u8), expected);
            }
        }
    }

    #[test]
    fn zero_brightness_turns_everything_off() {
        let state = LightState { color: Rgb::new(255, 128, 7), brightness: Brightness(0) };
        assert_eq!(state.scaled(), Rgb::new(0, 0, 0));
    }

    #[test]
    fn display() {
        let state = LightState { color: Rgb::new(0, 0, 0xff), brightness: Brightness(12) };
        assert_eq!(state.to_string(), "0x0000ff @ 12");
    }
}
