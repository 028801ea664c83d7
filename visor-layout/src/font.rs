//! Built-in device fonts

/// Fonts stored in the display firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Font {
    #[default]
    Small,
    Medium,
    Large,
}

impl Font {
    /// Font number used on the wire
    pub const fn code(self) -> u8 {
        match self {
            Font::Small => 1,
            Font::Medium => 2,
            Font::Large => 3,
        }
    }

    /// Parse a wire font number
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Font::Small),
            2 => Some(Font::Medium),
            3 => Some(Font::Large),
            _ => None,
        }
    }
}
