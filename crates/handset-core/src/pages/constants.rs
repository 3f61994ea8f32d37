//! Shared layout constants for pages
//!
//! All pages fill the 240x320 portrait display; these keep their common
//! elements the same size and position.

/// Page title bar height in pixels
pub const PAGE_HEADER_HEIGHT_PX: u32 = 32;

/// Standard button size in pixels
pub const BUTTON_WIDTH_PX: u32 = 72;
pub const BUTTON_HEIGHT_PX: u32 = 32;

/// Gap between the bottom button and the display edge
pub const BUTTON_MARGIN_PX: u32 = 4;

/// Height of the position entry above the map
pub const GEOPOS_HEIGHT_PX: u32 = 48;
