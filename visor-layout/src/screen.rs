//! User screens
//!
//! A screen is a layout in the user id range, described by padding rather
//! than absolute corners. The builder normalizes every field: ids are
//! clamped into [`SCREEN_ID_MIN`]..=[`SCREEN_ID_MAX`], colors onto the gray
//! scale, and widgets past the list capacity are ignored.

use crate::color::Color;
use crate::font::Font;
use crate::geometry::{Padding, Point};
use crate::layout::{Layout, LayoutHex, TextAnchor, Widgets};
use crate::widget::Widget;

/// Lowest id available to user screens
pub const SCREEN_ID_MIN: u8 = 10;

/// Highest id available to user screens
pub const SCREEN_ID_MAX: u8 = 59;

/// A user-defined screen
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Screen {
    id: u8,
    padding: Padding,
    foreground: Color,
    background: Color,
    font: Font,
    text: TextAnchor,
    opaque: bool,
    widgets: Widgets,
}

impl Screen {
    pub fn builder(id: u8) -> ScreenBuilder {
        ScreenBuilder::new(id)
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn foreground(&self) -> Color {
        self.foreground
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn font(&self) -> Font {
        self.font
    }

    pub fn text(&self) -> TextAnchor {
        self.text
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    /// The layout this screen is stored as
    pub fn to_layout(&self) -> Layout {
        let (top_left, bottom_right) = self.padding.bounds();
        Layout {
            id: self.id,
            top_left,
            bottom_right,
            foreground: self.foreground,
            background: self.background,
            font: self.font,
            text: self.text,
            opaque: self.opaque,
            widgets: self.widgets.clone(),
        }
    }

    /// Hex payload for `savelayout`
    pub fn to_hex(&self) -> LayoutHex {
        self.to_layout().to_hex()
    }
}

/// Clamping builder for [`Screen`]
#[derive(Debug, Clone)]
pub struct ScreenBuilder {
    screen: Screen,
}

impl ScreenBuilder {
    pub fn new(id: u8) -> Self {
        Self {
            screen: Screen {
                id: id.clamp(SCREEN_ID_MIN, SCREEN_ID_MAX),
                padding: Padding::default(),
                foreground: Color::WHITE,
                background: Color::BLACK,
                font: Font::default(),
                text: TextAnchor::default(),
                opaque: true,
                widgets: Widgets::new(),
            },
        }
    }

    pub fn padding(mut self, padding: Padding) -> Self {
        self.screen.padding = padding;
        self
    }

    /// Foreground gray level, clamped to 0-15
    pub fn foreground(mut self, level: u8) -> Self {
        self.screen.foreground = Color::new(level);
        self
    }

    /// Background gray level, clamped to 0-15
    pub fn background(mut self, level: u8) -> Self {
        self.screen.background = Color::new(level);
        self
    }

    pub fn font(mut self, font: Font) -> Self {
        self.screen.font = font;
        self
    }

    /// Text slot position (relative to the padded corner) and rotation
    pub fn text_position(mut self, x: u16, y: u16, rotation: u8) -> Self {
        let visible = self.screen.text.visible;
        self.screen.text = TextAnchor::new(Point::new(x, y), rotation, visible);
        self
    }

    pub fn text_visible(mut self, visible: bool) -> Self {
        self.screen.text.visible = visible;
        self
    }

    pub fn opaque(mut self, opaque: bool) -> Self {
        self.screen.opaque = opaque;
        self
    }

    pub fn widget(mut self, widget: Widget) -> Self {
        let _ = self.screen.widgets.push(widget);
        self
    }

    pub fn build(self) -> Screen {
        self.screen
    }
}
