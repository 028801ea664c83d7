//! Bitmap/layout registration messages
//!
//! After storing a bitmap the display reports it on TxServer as
//! `#<id> <width> x <height>`, e.g. `#12 64 x 32`.

/// A bitmap known to exist on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayoutRegistration {
    pub id: u8,
    pub width: u16,
    pub height: u16,
}

impl LayoutRegistration {
    /// Parse a registration message, returning `None` if it does not match
    pub fn parse(text: &str) -> Option<Self> {
        let rest = text.trim().strip_prefix('#')?;
        let (id, dims) = rest.split_once(char::is_whitespace)?;
        let (width, height) = dims.split_once('x')?;

        Some(Self {
            id: id.parse().ok()?,
            width: width.trim().parse().ok()?,
            height: height.trim().parse().ok()?,
        })
    }
}
