//! Global theme management
//!
//! Combines the color palette with the text styles derived from it so that
//! every widget paints from the same source.

use super::colors::ColorPalette;
use super::style::Style;

// ============================================================================
// Theme
// ============================================================================

/// Global theme configuration
///
/// # Examples
///
/// ```ignore
/// let theme = Theme::default();
/// let label_color = theme.palette.text_secondary;
/// let highlighted = theme.text.invert();
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// The active color palette
    pub palette: ColorPalette,

    /// Style for regular text (menu rows, field values)
    pub text: Style,

    /// Style for labels and units
    pub label: Style,
}

impl Default for Theme {
    /// Returns the default theme (dark mode)
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Creates a dark theme
    pub fn dark() -> Self {
        Self::from_palette(ColorPalette::dark())
    }

    fn from_palette(palette: ColorPalette) -> Self {
        let text = Style::new()
            .with_foreground(palette.foreground)
            .with_background(palette.background);
        let label = text.with_foreground(palette.text_secondary);

        Self {
            palette,
            text,
            label,
        }
    }
}
