//! Color definitions and palette management
//!
//! All colours are RGB565, the native pixel format of the handset's LCD
//! and of the world map raster.
//!
//! To convert from 8-bit RGB: R>>3, G>>2, B>>3

use embedded_graphics::pixelcolor::Rgb565;

// ============================================================================
// Base Colors
// ============================================================================

/// Pure black
pub const BLACK: Rgb565 = Rgb565::new(0, 0, 0);

/// Pure white - maximum brightness in RGB565
pub const WHITE: Rgb565 = Rgb565::new(31, 63, 31);

/// Light gray - for secondary text
pub const LIGHT_GRAY: Rgb565 = Rgb565::new(21, 42, 21);

/// Medium gray - for disabled or tertiary text
pub const GRAY: Rgb565 = Rgb565::new(16, 32, 16);

/// Pure red - map overlays (crosshair, bearing arrow)
pub const RED: Rgb565 = Rgb565::new(31, 0, 0);

/// Muted blue used for focused buttons
pub const BLUE: Rgb565 = Rgb565::new(40 >> 3, 100 >> 2, 200 >> 3);

/// Warm orange for error dialog titles
pub const ORANGE: Rgb565 = Rgb565::new(230 >> 3, 140 >> 2, 40 >> 3);

// ============================================================================
// Color Palette
// ============================================================================

/// A cohesive color palette for consistent UI theming.
///
/// # Examples
///
/// ```ignore
/// let palette = ColorPalette::default();
/// let accent = palette.primary;
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorPalette {
    /// Accent color for focused interactive elements
    pub primary: Rgb565,

    /// Main background color
    pub background: Rgb565,

    /// Primary text color - high contrast
    pub foreground: Rgb565,

    /// Secondary text color - lower contrast for labels and units
    pub text_secondary: Rgb565,

    /// Error and alert color
    pub error: Rgb565,

    /// Border color for separators and outlines
    pub border: Rgb565,
}

impl Default for ColorPalette {
    /// Returns the default dark palette
    fn default() -> Self {
        Self::dark()
    }
}

impl ColorPalette {
    /// White on black, the handset's stock look.
    pub fn dark() -> Self {
        Self {
            primary: BLUE,
            background: BLACK,
            foreground: WHITE,
            text_secondary: LIGHT_GRAY,
            error: ORANGE,
            border: GRAY,
        }
    }
}
