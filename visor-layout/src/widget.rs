//! Drawable primitives
//!
//! A widget is encoded into a layout as a small record:
//! ```text
//! [0x03 color] [0x04 font] TYPE fields…
//! ```
//! The color record is present when the widget carries a color, the font
//! record only for text. Positions are relative to the owning screen's
//! padded origin and are mirrored when encoded.

use heapless::{String, Vec};
use visor_protocol::command::{Command, CommandError};

use crate::color::Color;
use crate::font::Font;
use crate::geometry::Point;
use crate::layout::DEFAULT_ROTATION;

// Record type tags
pub const TAG_BITMAP: u8 = 0;
pub const TAG_CIRCLE: u8 = 1;
pub const TAG_CIRCLE_FILLED: u8 = 2;
pub const TAG_COLOR: u8 = 3;
pub const TAG_FONT: u8 = 4;
pub const TAG_LINE: u8 = 5;
pub const TAG_POINT: u8 = 6;
pub const TAG_RECT: u8 = 7;
pub const TAG_RECT_FILLED: u8 = 8;
pub const TAG_TEXT: u8 = 9;

/// Longest text a text widget holds
pub const MAX_WIDGET_TEXT: usize = 48;

/// Longest encoded record (color + font + text header + text)
pub const MAX_RECORD_LEN: usize = 2 + 2 + 5 + MAX_WIDGET_TEXT;

/// Widget text
pub type WidgetText = String<MAX_WIDGET_TEXT>;

/// One encoded widget record
pub type WidgetRecord = Vec<u8, MAX_RECORD_LEN>;

/// Commands drawing a widget immediately (color, font, shape)
pub type DrawCommands = Vec<Command, 3>;

/// Variant-specific widget data
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WidgetKind {
    Text { text: WidgetText, font: Font },
    Circle { radius: u8, filled: bool },
    Rectangle { width: u16, height: u16, filled: bool },
    Line { to: Point },
    Point,
    Bitmap { id: u8 },
}

/// A drawable primitive owned by a screen
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Widget {
    pub position: Point,
    pub color: Option<Color>,
    pub kind: WidgetKind,
}

impl Widget {
    /// Text widget
    ///
    /// Characters the device cannot render are replaced by `?` and the text
    /// is cut to [`MAX_WIDGET_TEXT`].
    pub fn text(x: u16, y: u16, text: &str, font: Font, color: Color) -> Self {
        let mut sanitized = WidgetText::new();
        for c in text.chars() {
            let c = if c.is_ascii() && !c.is_ascii_control() { c } else { '?' };
            if sanitized.push(c).is_err() {
                break;
            }
        }
        Self {
            position: Point::new(x, y),
            color: Some(color),
            kind: WidgetKind::Text {
                text: sanitized,
                font,
            },
        }
    }

    pub fn circle(x: u16, y: u16, radius: u8, filled: bool) -> Self {
        Self::shape(x, y, WidgetKind::Circle { radius, filled })
    }

    pub fn rectangle(x: u16, y: u16, width: u16, height: u16, filled: bool) -> Self {
        Self::shape(
            x,
            y,
            WidgetKind::Rectangle {
                width,
                height,
                filled,
            },
        )
    }

    pub fn line(x0: u16, y0: u16, x1: u16, y1: u16) -> Self {
        Self::shape(
            x0,
            y0,
            WidgetKind::Line {
                to: Point::new(x1, y1),
            },
        )
    }

    pub fn point(x: u16, y: u16) -> Self {
        Self::shape(x, y, WidgetKind::Point)
    }

    /// Reference to a bitmap already stored on the device
    pub fn bitmap(x: u16, y: u16, id: u8) -> Self {
        Self::shape(x, y, WidgetKind::Bitmap { id })
    }

    fn shape(x: u16, y: u16, kind: WidgetKind) -> Self {
        Self {
            position: Point::new(x, y),
            color: None,
            kind,
        }
    }

    /// Set the widget color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Record type tag for this widget
    pub fn type_id(&self) -> u8 {
        match &self.kind {
            WidgetKind::Bitmap { .. } => TAG_BITMAP,
            WidgetKind::Circle { filled: false, .. } => TAG_CIRCLE,
            WidgetKind::Circle { filled: true, .. } => TAG_CIRCLE_FILLED,
            WidgetKind::Line { .. } => TAG_LINE,
            WidgetKind::Point => TAG_POINT,
            WidgetKind::Rectangle { filled: false, .. } => TAG_RECT,
            WidgetKind::Rectangle { filled: true, .. } => TAG_RECT_FILLED,
            WidgetKind::Text { .. } => TAG_TEXT,
        }
    }

    /// Device coordinates of the anchor and, for lines and rectangles, the
    /// far corner
    fn device_points(&self, origin: Point) -> (Point, Point) {
        let start = self.position.offset(origin);
        let end = match &self.kind {
            WidgetKind::Line { to } => to.offset(origin),
            WidgetKind::Rectangle { width, height, .. } => {
                Point::new(start.x.saturating_add(*width), start.y.saturating_add(*height))
            }
            _ => start,
        };
        (start.mirrored(), end.mirrored())
    }

    /// Encode the widget record relative to `origin`
    pub fn encode(&self, origin: Point) -> WidgetRecord {
        let mut record = RecordWriter::default();
        let (start, end) = self.device_points(origin);

        if let Some(color) = self.color {
            record.u8(TAG_COLOR);
            record.u8(color.level());
        }
        if let WidgetKind::Text { font, .. } = &self.kind {
            record.u8(TAG_FONT);
            record.u8(font.code());
        }

        record.u8(self.type_id());
        match &self.kind {
            WidgetKind::Bitmap { id } => {
                record.u8(*id);
                record.point(start);
            }
            WidgetKind::Circle { radius, .. } => {
                record.point(start);
                record.u8(*radius);
            }
            WidgetKind::Line { .. } | WidgetKind::Rectangle { .. } => {
                record.point(start);
                record.point(end);
            }
            WidgetKind::Point => record.point(start),
            WidgetKind::Text { text, .. } => {
                record.point(start);
                record.u8(text.len() as u8);
                record.bytes(text.as_bytes());
            }
        }
        record.finish()
    }

    /// Commands drawing this widget straight onto the screen
    pub fn draw_commands(&self, origin: Point) -> Result<DrawCommands, CommandError> {
        let mut commands = DrawCommands::new();
        let (start, end) = self.device_points(origin);

        if let Some(color) = self.color {
            push(&mut commands, Command::Color(color.level()))?;
        }

        let shape = match &self.kind {
            WidgetKind::Text { text, font } => {
                push(&mut commands, Command::Font(font.code()))?;
                Command::Text {
                    x: start.x,
                    y: start.y,
                    rotation: DEFAULT_ROTATION,
                    text: Command::text_arg(text)?,
                }
            }
            WidgetKind::Circle { radius, filled } => Command::Circle {
                x: start.x,
                y: start.y,
                radius: u16::from(*radius),
                filled: *filled,
            },
            WidgetKind::Rectangle { filled, .. } => Command::Rect {
                x0: start.x,
                y0: start.y,
                x1: end.x,
                y1: end.y,
                filled: *filled,
            },
            WidgetKind::Line { .. } => Command::Line {
                x0: start.x,
                y0: start.y,
                x1: end.x,
                y1: end.y,
            },
            WidgetKind::Point => Command::Point {
                x: start.x,
                y: start.y,
            },
            WidgetKind::Bitmap { id } => Command::Bitmap {
                id: *id,
                x: start.x,
                y: start.y,
            },
        };
        push(&mut commands, shape)?;
        Ok(commands)
    }
}

fn push(commands: &mut DrawCommands, command: Command) -> Result<(), CommandError> {
    commands.push(command).map_err(|_| CommandError::TooLong)
}

/// Big-endian record builder
///
/// Capacity is sized for the largest record, so writes cannot overflow.
#[derive(Default)]
struct RecordWriter {
    buf: WidgetRecord,
}

impl RecordWriter {
    fn u8(&mut self, value: u8) {
        let _ = self.buf.push(value);
    }

    fn bytes(&mut self, bytes: &[u8]) {
        let _ = self.buf.extend_from_slice(bytes);
    }

    /// x as 2 bytes, y as 1 byte
    fn point(&mut self, p: Point) {
        self.bytes(&p.x.to_be_bytes());
        self.u8(p.y as u8);
    }

    fn finish(self) -> WidgetRecord {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{MAX_HEIGHT, MAX_WIDTH};

    fn hex(bytes: &[u8]) -> std::string::String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    #[test]
    fn test_text_widget_golden() {
        let widget = Widget::text(15, 16, "Test", Font::Small, Color::parse("#151413").unwrap());
        let record = widget.encode(Point::origin());

        assert_eq!(hex(&record), "03010401090120ef0454657374");

        // Mirrored anchor sits right after the text tag
        let x = u16::from_be_bytes([record[5], record[6]]);
        assert_eq!(x, MAX_WIDTH - 15);
        assert_eq!(u16::from(record[7]), MAX_HEIGHT - 16);
    }

    #[test]
    fn test_shape_records() {
        assert_eq!(hex(&Widget::point(0, 0).encode(Point::origin())), "06012fff");
        assert_eq!(
            hex(&Widget::circle(3, 5, 9, true).encode(Point::origin())),
            "02012cfa09"
        );
        assert_eq!(
            hex(&Widget::bitmap(0, 0, 7).encode(Point::origin())),
            "0007012fff"
        );
    }

    #[test]
    fn test_rectangle_far_corner() {
        let rect = Widget::rectangle(10, 10, 40, 40, false).with_color(Color::new(15));
        let record = rect.encode(Point::origin());
        // color, tag, x0 y0, x1 y1
        assert_eq!(hex(&record), "030f070125f500fdcd");
    }

    #[test]
    fn test_origin_applies_before_mirror() {
        let widget = Widget::point(5, 5);
        let record = widget.encode(Point::new(10, 20));
        let x = u16::from_be_bytes([record[1], record[2]]);
        assert_eq!(x, MAX_WIDTH - 15);
        assert_eq!(u16::from(record[3]), MAX_HEIGHT - 25);
    }

    #[test]
    fn test_text_is_sanitized() {
        let widget = Widget::text(0, 0, "é\n1", Font::Large, Color::WHITE);
        match widget.kind {
            WidgetKind::Text { text, .. } => assert_eq!(text.as_str(), "??1"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_draw_commands() {
        let widget = Widget::text(15, 16, "Test", Font::Medium, Color::new(9));
        let commands = widget.draw_commands(Point::origin()).unwrap();
        let rendered: std::vec::Vec<_> = commands.iter().map(|c| c.render().unwrap()).collect();
        assert_eq!(rendered, ["color 9", "font 2", "txt 288 239 4 Test"]);

        let rect = Widget::rectangle(10, 10, 40, 40, true);
        let commands = rect.draw_commands(Point::origin()).unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].render().unwrap(), "rectf 293 245 253 205");
    }
}
