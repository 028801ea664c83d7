//! Display content model and binary encoding for the Visor HUD
//!
//! This crate provides:
//! - `Color` and `Font`, the display's 4-bit grayscale and font table
//! - `Widget`, the drawable primitives (text, circle, rectangle, line,
//!   point, bitmap)
//! - `Screen`, a user screen built with a clamping builder
//! - `Layout`, the device-resident record a screen is stored as, and its
//!   packed hex encoding
//!
//! # Coordinates
//!
//! Authoring coordinates have their origin at the top-left corner as seen by
//! the wearer. The physical panel is mounted inverted, so every positional
//! field is mirrored (`MAX - value`) when it is encoded or drawn.
//!
//! # Layout record
//!
//! ```text
//! ┌────┬──────┬────┬────┬────┬────┬────┬────┬──────┬───────┬───────┬───────┬─────┬─────────┬─────────────┐
//! │ id │ size │ x0 │ y0 │ x1 │ y1 │ fg │ bg │ font │ textV │ textX │ textY │ rot │ opacity │ widgets…    │
//! │ 1B │ 1B   │ 2B │ 1B │ 2B │ 1B │ 1B │ 1B │ 1B   │ 1B    │ 2B    │ 1B    │ 1B  │ 1B      │ ≤ 110B      │
//! └────┴──────┴────┴────┴────┴────┴────┴────┴──────┴───────┴───────┴───────┴─────┴─────────┴─────────────┘
//! ```
//!
//! All multi-byte fields are big-endian; the record is sent as lowercase
//! hex inside a `savelayout` command.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod color;
pub mod font;
pub mod geometry;
pub mod layout;
pub mod screen;
pub mod widget;

// Re-export key types
pub use color::{Color, ColorError};
pub use font::Font;
pub use geometry::{Padding, Point, MAX_HEIGHT, MAX_WIDTH};
pub use layout::{
    Layout, LayoutBuilder, LayoutError, LayoutHex, TextAnchor, MAX_WIDGETS, WIDGET_BUDGET,
};
pub use screen::{Screen, ScreenBuilder, SCREEN_ID_MAX, SCREEN_ID_MIN};
pub use widget::{Widget, WidgetKind};
