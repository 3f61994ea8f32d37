//! Styling system for UI elements
//!
//! - [`colors`] - RGB565 colour constants and the palette
//! - [`style`] - font plus foreground/background pairs, with inversion
//! - [`theme`] - palette and text styles bundled for the whole UI
//!
//! # Examples
//!
//! ```ignore
//! let theme = Theme::default();
//! let highlighted = theme.text.invert();
//! ```

pub mod colors;
pub mod style;
pub mod theme;

pub use colors::{BLACK, ColorPalette, GRAY, LIGHT_GRAY, RED, WHITE};
pub use style::Style;
pub use theme::Theme;
