//! Device-resident layout records
//!
//! A layout is what the display stores under a numeric id: a bounding box,
//! colors, a font, an optional text slot and up to [`WIDGET_BUDGET`] bytes of
//! widget records. `layout <id> <text>` later shows it with the text slot
//! filled in.

use heapless::{String, Vec};
use visor_protocol::command::{Command, CommandError};

use crate::color::Color;
use crate::font::Font;
use crate::geometry::{Point, MAX_HEIGHT, MAX_WIDTH};
use crate::widget::Widget;

/// Fixed header size in bytes
pub const HEADER_LEN: usize = 17;

/// Bytes available for widget records after the header
pub const WIDGET_BUDGET: usize = 110;

/// Largest encoded layout
pub const MAX_LAYOUT_LEN: usize = HEADER_LEN + WIDGET_BUDGET;

/// Widgets a layout can hold before encoding
pub const MAX_WIDGETS: usize = 16;

/// Text rotation used when none is given
pub const DEFAULT_ROTATION: u8 = 4;

/// Largest text rotation code
pub const MAX_ROTATION: u8 = 8;

/// Encoded layout bytes
pub type LayoutBytes = Vec<u8, MAX_LAYOUT_LEN>;

/// Encoded layout as lowercase hex
pub type LayoutHex = String<{ MAX_LAYOUT_LEN * 2 }>;

/// Widget list of a layout
pub type Widgets = Vec<Widget, MAX_WIDGETS>;

/// Layout construction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayoutError {
    /// Widget list is at capacity
    TooManyWidgets,
}

impl core::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::TooManyWidgets => write!(f, "layout holds at most {} widgets", MAX_WIDGETS),
        }
    }
}

/// Where the layout's text slot is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextAnchor {
    /// Position relative to the layout's top-left corner
    pub position: Point,
    /// Rotation code (0-8)
    pub rotation: u8,
    /// Whether the text slot is drawn at all
    pub visible: bool,
}

impl TextAnchor {
    pub fn new(position: Point, rotation: u8, visible: bool) -> Self {
        Self {
            position,
            rotation: rotation.min(MAX_ROTATION),
            visible,
        }
    }
}

impl Default for TextAnchor {
    fn default() -> Self {
        Self {
            position: Point::origin(),
            rotation: DEFAULT_ROTATION,
            visible: true,
        }
    }
}

/// A layout as stored on the device
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Layout {
    pub id: u8,
    pub top_left: Point,
    pub bottom_right: Point,
    pub foreground: Color,
    pub background: Color,
    pub font: Font,
    pub text: TextAnchor,
    pub opaque: bool,
    pub widgets: Widgets,
}

impl Layout {
    pub fn builder(id: u8) -> LayoutBuilder {
        LayoutBuilder::new(id)
    }

    /// Append a widget
    pub fn push(&mut self, widget: Widget) -> Result<(), LayoutError> {
        self.widgets
            .push(widget)
            .map_err(|_| LayoutError::TooManyWidgets)
    }

    /// Encode the layout record
    ///
    /// Widgets are appended in order until the next one would exceed
    /// [`WIDGET_BUDGET`]; that widget and everything after it is left out.
    pub fn to_bytes(&self) -> LayoutBytes {
        let origin = self.top_left;
        let mut records: Vec<u8, WIDGET_BUDGET> = Vec::new();
        for widget in &self.widgets {
            if records.extend_from_slice(&widget.encode(origin)).is_err() {
                break;
            }
        }

        let (start, end) = (self.top_left.mirrored(), self.bottom_right.mirrored());
        let anchor = self.text.position.offset(origin).mirrored();

        let mut out = LayoutBytes::new();
        let header: [u8; HEADER_LEN] = [
            self.id,
            records.len() as u8,
            (start.x >> 8) as u8,
            start.x as u8,
            start.y as u8,
            (end.x >> 8) as u8,
            end.x as u8,
            end.y as u8,
            self.foreground.level(),
            self.background.level(),
            self.font.code(),
            u8::from(self.text.visible),
            (anchor.x >> 8) as u8,
            anchor.x as u8,
            anchor.y as u8,
            self.text.rotation,
            u8::from(self.opaque),
        ];
        // Both parts are sized to fit MAX_LAYOUT_LEN together
        let _ = out.extend_from_slice(&header);
        let _ = out.extend_from_slice(&records);
        out
    }

    /// Encode the layout record as lowercase hex
    pub fn to_hex(&self) -> LayoutHex {
        to_hex(&self.to_bytes())
    }

    /// `savelayout` command uploading this layout
    pub fn save_command(&self) -> Result<Command, CommandError> {
        Command::save_layout(&self.to_hex())
    }
}

/// Lowercase hex of `bytes`, cut at [`MAX_LAYOUT_LEN`] bytes
pub fn to_hex(bytes: &[u8]) -> LayoutHex {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    let mut out = LayoutHex::new();
    for &b in bytes.iter().take(MAX_LAYOUT_LEN) {
        let _ = out.push(DIGITS[usize::from(b >> 4)] as char);
        let _ = out.push(DIGITS[usize::from(b & 0x0f)] as char);
    }
    out
}

/// Builder for raw layouts
///
/// Unlike screens, layout ids are not clamped: ids below the screen range
/// address the device's system layouts.
#[derive(Debug, Clone)]
pub struct LayoutBuilder {
    layout: Layout,
}

impl LayoutBuilder {
    pub fn new(id: u8) -> Self {
        Self {
            layout: Layout {
                id,
                top_left: Point::origin(),
                bottom_right: Point::new(MAX_WIDTH, MAX_HEIGHT),
                foreground: Color::WHITE,
                background: Color::BLACK,
                font: Font::default(),
                text: TextAnchor::default(),
                opaque: true,
                widgets: Widgets::new(),
            },
        }
    }

    /// Bounding box corners in authoring coordinates
    pub fn bounds(mut self, top_left: Point, bottom_right: Point) -> Self {
        self.layout.top_left = Point::new(
            top_left.x.min(bottom_right.x),
            top_left.y.min(bottom_right.y),
        );
        self.layout.bottom_right = Point::new(
            top_left.x.max(bottom_right.x),
            top_left.y.max(bottom_right.y),
        );
        self
    }

    pub fn foreground(mut self, color: Color) -> Self {
        self.layout.foreground = color;
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.layout.background = color;
        self
    }

    pub fn font(mut self, font: Font) -> Self {
        self.layout.font = font;
        self
    }

    pub fn text(mut self, anchor: TextAnchor) -> Self {
        self.layout.text = anchor;
        self
    }

    pub fn opaque(mut self, opaque: bool) -> Self {
        self.layout.opaque = opaque;
        self
    }

    /// Append a widget; widgets past [`MAX_WIDGETS`] are dropped
    pub fn widget(mut self, widget: Widget) -> Self {
        let _ = self.layout.push(widget);
        self
    }

    pub fn build(self) -> Layout {
        self.layout
    }
}
