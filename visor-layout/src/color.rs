//! 4-bit grayscale colors
//!
//! The panel has 16 gray levels. RGB inputs are reduced by luminance
//! (ITU-R BT.601 weights) and scaled onto 0-15. Out-of-range levels are
//! clamped rather than rejected.

/// Brightest gray level
pub const MAX_LEVEL: u8 = 15;

/// Errors parsing a color string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorError {
    /// Not of the form `#rrggbb` / `rrggbb`
    InvalidFormat,
}

/// A display gray level (0-15)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Color(u8);

impl Color {
    pub const BLACK: Color = Color(0);
    pub const WHITE: Color = Color(MAX_LEVEL);

    /// Create a color from a gray level, clamping to 0-15
    pub const fn new(level: u8) -> Self {
        if level > MAX_LEVEL {
            Color(MAX_LEVEL)
        } else {
            Color(level)
        }
    }

    /// Reduce an RGB triple to a gray level
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let luminance = (299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000;
        Color(((luminance * MAX_LEVEL as u32 + 127) / 255) as u8)
    }

    /// Parse `#rrggbb` (leading `#` optional)
    pub fn parse(hex: &str) -> Result<Self, ColorError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidFormat);
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| ColorError::InvalidFormat)
        };
        Ok(Self::from_rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Gray level as sent on the wire
    pub const fn level(self) -> u8 {
        self.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_extremes() {
        assert_eq!(Color::from_rgb(0, 0, 0), Color::BLACK);
        assert_eq!(Color::from_rgb(255, 255, 255), Color::WHITE);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Color::parse("#151413").unwrap().level(), 1);
        assert_eq!(Color::parse("ffffff").unwrap(), Color::WHITE);
        assert_eq!(Color::parse("#808080").unwrap().level(), 8);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(Color::parse("#fff"), Err(ColorError::InvalidFormat));
        assert_eq!(Color::parse("#12345g"), Err(ColorError::InvalidFormat));
        assert_eq!(Color::parse(""), Err(ColorError::InvalidFormat));
    }

    #[test]
    fn test_green_weighs_most() {
        let green = Color::from_rgb(0, 255, 0);
        let red = Color::from_rgb(255, 0, 0);
        let blue = Color::from_rgb(0, 0, 255);
        assert!(green > red);
        assert!(red > blue);
    }

    proptest! {
        #[test]
        fn prop_levels_in_range(level in any::<u8>(), r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            prop_assert!(Color::new(level).level() <= MAX_LEVEL);
            prop_assert!(Color::from_rgb(r, g, b).level() <= MAX_LEVEL);
        }
    }
}
