//! Handset UI - widgets for a 240x320 portrait RGB565 display
//!
//! This module provides:
//! - Core traits for drawable, touchable and focusable elements
//! - The scrolling menu list (`MenuView`)
//! - The world map viewer (`GeoMap`) and position entry (`GeoPos`)
//! - Small building blocks (number fields, buttons, 1 bpp bitmaps)
//! - Colour palette, text styles and theme

pub mod components;
pub mod core;
pub mod styling;

/// Display width in pixels (portrait orientation)
pub const DISPLAY_WIDTH_PX: u16 = 240;

/// Display height in pixels (portrait orientation)
pub const DISPLAY_HEIGHT_PX: u16 = 320;

/// Height of one text row for the 8x13 font, including leading
pub const TEXT_ROW_HEIGHT_PX: u32 = 16;

/// Width of one character cell of the 8x13 font
pub const CHAR_WIDTH_PX: u32 = 8;

// Re-export commonly used items
pub use components::{
    Bitmap, Button, GeoMap, GeoMapError, GeoMapMode, GeoPos, GeoPosInput, MenuItem, MenuItemView,
    MenuView,
    NumberField, PanDelta, PositionChange, UpdateSource,
};
pub use self::core::{
    Action, Drawable, EncoderEvent, EventResult, Focusable, KeyEvent, Modal, ModalKind, PageId,
    TouchEvent, TouchPoint, Touchable,
};
pub use styling::{ColorPalette, Style, Theme};
