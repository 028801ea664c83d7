//! Text commands understood by the display
//!
//! A [`Command`] is an immutable value; [`Command::render`] produces the
//! exact ASCII the device expects and [`Command::data`] the NUL-terminated
//! bytes that get fragmented onto the link.

use core::fmt::Write;

use heapless::String;

use crate::fragment::{self, CommandData};

/// Longest rendered command text (without the trailing NUL)
pub const MAX_COMMAND_LEN: usize = 300;

/// Longest free-text argument (text widgets, layout text)
pub const MAX_TEXT_LEN: usize = 64;

/// Longest hex payload carried by `savelayout`
pub const MAX_PAYLOAD_HEX_LEN: usize = 256;

/// Rendered command text
pub type CommandText = String<MAX_COMMAND_LEN>;

/// Free-text command argument
pub type TextArg = String<MAX_TEXT_LEN>;

/// Hex payload argument
pub type PayloadHex = String<MAX_PAYLOAD_HEX_LEN>;

/// Errors produced while building or rendering a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Rendered text does not fit the command buffer
    TooLong,
    /// Text argument contains a NUL, a line break or non-ASCII characters
    InvalidText,
    /// Payload is not an even-length hex string
    InvalidPayload,
}

impl core::fmt::Display for CommandError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::TooLong => write!(f, "command text too long"),
            Self::InvalidText => write!(f, "command text must be single-line ASCII"),
            Self::InvalidPayload => write!(f, "payload is not a hex byte string"),
        }
    }
}

/// Status LED modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedState {
    Off,
    On,
    Blink,
}

impl LedState {
    fn as_str(self) -> &'static str {
        match self {
            LedState::Off => "off",
            LedState::On => "on",
            LedState::Blink => "blink",
        }
    }
}

/// A single device command
///
/// Coordinates are device coordinates: callers mirror logical positions
/// before building drawing commands.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Wake the display
    PowerOn,
    /// Put the display to sleep
    PowerOff,
    /// Request a battery report
    Battery,
    /// Clear the visible screen
    Clear,
    /// Set the status LED
    Led(LedState),
    /// Set display luminosity (0-15)
    Luma(u8),
    /// Enable or disable ambient light auto-adjust
    Sensor(bool),
    /// Select the drawing color (0-15)
    Color(u8),
    /// Select the drawing font
    Font(u8),
    /// Draw a single pixel
    Point { x: u16, y: u16 },
    /// Draw a line
    Line { x0: u16, y0: u16, x1: u16, y1: u16 },
    /// Draw a rectangle, outlined or filled
    Rect {
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        filled: bool,
    },
    /// Draw a circle, outlined or filled
    Circle {
        x: u16,
        y: u16,
        radius: u16,
        filled: bool,
    },
    /// Draw text with the current color and font
    Text {
        x: u16,
        y: u16,
        rotation: u8,
        text: TextArg,
    },
    /// Draw a stored bitmap
    Bitmap { id: u8, x: u16, y: u16 },
    /// Store a layout on the device (hex payload without the `0x` prefix)
    SaveLayout(PayloadHex),
    /// Display a stored layout with the given text
    ShowLayout { id: u8, text: TextArg },
}

impl Command {
    /// Build a `savelayout` command from a hex payload
    pub fn save_layout(hex: &str) -> Result<Self, CommandError> {
        if hex.len() % 2 != 0 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CommandError::InvalidPayload);
        }
        let mut payload = PayloadHex::new();
        payload.push_str(hex).map_err(|_| CommandError::TooLong)?;
        Ok(Command::SaveLayout(payload))
    }

    /// Build a text argument, rejecting characters the device cannot frame
    pub fn text_arg(text: &str) -> Result<TextArg, CommandError> {
        if !is_wire_text(text) {
            return Err(CommandError::InvalidText);
        }
        let mut arg = TextArg::new();
        arg.push_str(text).map_err(|_| CommandError::TooLong)?;
        Ok(arg)
    }

    /// Render the command text
    pub fn render(&self) -> Result<CommandText, CommandError> {
        let mut out = CommandText::new();
        self.write_to(&mut out).map_err(|_| CommandError::TooLong)?;
        if !is_wire_text(&out) {
            return Err(CommandError::InvalidText);
        }
        Ok(out)
    }

    /// Render the command and append the NUL terminator
    pub fn data(&self) -> Result<CommandData, CommandError> {
        let text = self.render()?;
        fragment::command_data(&text)
    }

    fn write_to(&self, out: &mut CommandText) -> core::fmt::Result {
        match self {
            Command::PowerOn => out.write_str("power on"),
            Command::PowerOff => out.write_str("power off"),
            Command::Battery => out.write_str("battery"),
            Command::Clear => out.write_str("clear"),
            Command::Led(state) => write!(out, "led {}", state.as_str()),
            Command::Luma(level) => write!(out, "luma {}", level),
            Command::Sensor(enabled) => {
                write!(out, "sensor {}", if *enabled { "on" } else { "off" })
            }
            Command::Color(color) => write!(out, "color {}", color),
            Command::Font(font) => write!(out, "font {}", font),
            Command::Point { x, y } => write!(out, "point {} {}", x, y),
            Command::Line { x0, y0, x1, y1 } => write!(out, "line {} {} {} {}", x0, y0, x1, y1),
            Command::Rect {
                x0,
                y0,
                x1,
                y1,
                filled,
            } => {
                let verb = if *filled { "rectf" } else { "rect" };
                write!(out, "{} {} {} {} {}", verb, x0, y0, x1, y1)
            }
            Command::Circle {
                x,
                y,
                radius,
                filled,
            } => {
                let verb = if *filled { "circf" } else { "circ" };
                write!(out, "{} {} {} {}", verb, x, y, radius)
            }
            Command::Text {
                x,
                y,
                rotation,
                text,
            } => write!(out, "txt {} {} {} {}", x, y, rotation, text),
            Command::Bitmap { id, x, y } => write!(out, "bitmap {} {} {}", id, x, y),
            Command::SaveLayout(hex) => write!(out, "savelayout 0x{}", hex),
            Command::ShowLayout { id, text } => {
                if text.is_empty() {
                    write!(out, "layout {}", id)
                } else {
                    write!(out, "layout {} {}", id, text)
                }
            }
        }
    }
}

/// Single-line printable ASCII
fn is_wire_text(text: &str) -> bool {
    text.bytes().all(|b| (0x20..0x7F).contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(cmd: &Command) -> CommandText {
        cmd.render().unwrap()
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(text(&Command::PowerOn), "power on");
        assert_eq!(text(&Command::PowerOff), "power off");
        assert_eq!(text(&Command::Battery), "battery");
        assert_eq!(text(&Command::Clear), "clear");
        assert_eq!(text(&Command::Led(LedState::Blink)), "led blink");
        assert_eq!(text(&Command::Luma(12)), "luma 12");
        assert_eq!(text(&Command::Sensor(false)), "sensor off");
    }

    #[test]
    fn test_drawing_commands() {
        let rect = Command::Rect {
            x0: 10,
            y0: 10,
            x1: 50,
            y1: 50,
            filled: false,
        };
        assert_eq!(text(&rect), "rect 10 10 50 50");

        let circle = Command::Circle {
            x: 100,
            y: 80,
            radius: 12,
            filled: true,
        };
        assert_eq!(text(&circle), "circf 100 80 12");

        let txt = Command::Text {
            x: 288,
            y: 239,
            rotation: 4,
            text: Command::text_arg("Test").unwrap(),
        };
        assert_eq!(text(&txt), "txt 288 239 4 Test");
    }

    #[test]
    fn test_save_layout() {
        let cmd = Command::save_layout("0a00ff").unwrap();
        assert_eq!(text(&cmd), "savelayout 0x0a00ff");
    }

    #[test]
    fn test_save_layout_rejects_bad_payload() {
        assert_eq!(
            Command::save_layout("abc"),
            Err(CommandError::InvalidPayload)
        );
        assert_eq!(
            Command::save_layout("zz"),
            Err(CommandError::InvalidPayload)
        );
    }

    #[test]
    fn test_show_layout() {
        let cmd = Command::ShowLayout {
            id: 12,
            text: Command::text_arg("42 km/h").unwrap(),
        };
        assert_eq!(text(&cmd), "layout 12 42 km/h");

        let bare = Command::ShowLayout {
            id: 3,
            text: TextArg::new(),
        };
        assert_eq!(text(&bare), "layout 3");
    }

    #[test]
    fn test_text_arg_rejects_framing_characters() {
        assert_eq!(Command::text_arg("a\nb"), Err(CommandError::InvalidText));
        assert_eq!(Command::text_arg("a\0b"), Err(CommandError::InvalidText));
        assert_eq!(Command::text_arg("café"), Err(CommandError::InvalidText));
    }

    #[test]
    fn test_data_is_nul_terminated() {
        let data = Command::Battery.data().unwrap();
        assert_eq!(&data[..], b"battery\0");
    }
}
