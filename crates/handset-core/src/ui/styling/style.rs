//! Text style configuration for UI elements
//!
//! A `Style` is the trio every widget paints with: a monospace font and a
//! foreground/background colour pair. Highlighted elements are painted with
//! the inverted style.

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, MonoTextStyleBuilder, ascii::FONT_8X13};
use embedded_graphics::pixelcolor::Rgb565;

use super::colors::{BLACK, WHITE};

// ============================================================================
// Style
// ============================================================================

/// Visual style of a text-bearing element
///
/// # Examples
///
/// ```ignore
/// let style = Style::new().with_foreground(RED);
/// let selected = style.invert();
/// assert_eq!(selected.background, RED);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Style {
    /// Font used for all text of the element
    pub font: &'static MonoFont<'static>,

    /// Background fill color
    pub background: Rgb565,

    /// Foreground/text color
    pub foreground: Rgb565,
}

impl Default for Style {
    /// White 8x13 text on black
    fn default() -> Self {
        Self {
            font: &FONT_8X13,
            background: BLACK,
            foreground: WHITE,
        }
    }
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the background color
    pub fn with_background(mut self, color: Rgb565) -> Self {
        self.background = color;
        self
    }

    /// Sets the foreground (text) color
    pub fn with_foreground(mut self, color: Rgb565) -> Self {
        self.foreground = color;
        self
    }

    /// Sets the font
    pub fn with_font(mut self, font: &'static MonoFont<'static>) -> Self {
        self.font = font;
        self
    }

    /// Same font, foreground and background swapped.
    pub fn invert(&self) -> Self {
        Self {
            font: self.font,
            background: self.foreground,
            foreground: self.background,
        }
    }

    /// Height of one line of text in pixels
    pub fn line_height(&self) -> u32 {
        self.font.character_size.height
    }

    /// Converts this style to a `MonoTextStyle` that also paints the
    /// character cell background.
    pub fn text_style(&self) -> MonoTextStyle<'static, Rgb565> {
        MonoTextStyleBuilder::new()
            .font(self.font)
            .text_color(self.foreground)
            .background_color(self.background)
            .build()
    }
}
