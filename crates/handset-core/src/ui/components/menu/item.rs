//! Menu entries and their row views

use alloc::string::String;

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle, Triangle};
use embedded_graphics::text::{Baseline, Text};

use crate::ui::components::bitmap::Bitmap;
use crate::ui::core::Action;
use crate::ui::styling::{Style, WHITE};

/// Bitmap inset from the row's top-left corner
const BITMAP_INSET_PX: i32 = 4;

/// Text inset when the row has a bitmap
const TEXT_INSET_WITH_BITMAP_PX: i32 = 26;

/// Text inset when the row has no bitmap
const TEXT_INSET_PX: i32 = 8;

/// Width of the submenu chevron
const CHEVRON_WIDTH_PX: i32 = 5;

/// One entry of a [`MenuView`](super::MenuView).
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub text: String,
    pub color: Rgb565,
    pub bitmap: Option<&'static Bitmap>,
    /// Returned to the menu's owner when the item is selected
    pub action: Option<Action>,
    /// Draws a chevron to show the item opens another menu
    pub submenu: bool,
}

impl MenuItem {
    pub fn new(text: &str, action: Action) -> Self {
        Self {
            text: String::from(text),
            color: WHITE,
            bitmap: None,
            action: Some(action),
            submenu: false,
        }
    }

    pub fn with_color(mut self, color: Rgb565) -> Self {
        self.color = color;
        self
    }

    pub fn with_bitmap(mut self, bitmap: &'static Bitmap) -> Self {
        self.bitmap = Some(bitmap);
        self
    }

    pub fn with_submenu(mut self) -> Self {
        self.submenu = true;
        self
    }
}

/// A [`MenuItem`] together with its on-screen state.
#[derive(Debug, Clone)]
pub struct MenuItemView {
    item: MenuItem,
    bounds: Rectangle,
    highlighted: bool,
    hidden: bool,
    dirty: bool,
}

impl MenuItemView {
    pub fn new(item: MenuItem) -> Self {
        Self {
            item,
            bounds: Rectangle::zero(),
            highlighted: false,
            hidden: false,
            dirty: true,
        }
    }

    /// The item's action, as returned when it is selected
    pub fn select(&self) -> Option<Action> {
        self.item.action
    }

    pub fn highlight(&mut self) {
        self.highlighted = true;
        self.dirty = true;
    }

    pub fn unhighlight(&mut self) {
        self.highlighted = false;
        self.dirty = true;
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub(super) fn set_hidden(&mut self, hidden: bool) {
        if self.hidden != hidden {
            self.hidden = hidden;
            self.dirty = true;
        }
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    pub(super) fn set_bounds(&mut self, bounds: Rectangle) {
        if self.bounds != bounds {
            self.bounds = bounds;
            self.dirty = true;
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Foreground and background actually used for painting.
    ///
    /// `emphasized` is true when the row is highlighted and the menu either
    /// owns the focus or keeps its highlight while blurred.
    pub fn paint_colors(&self, style: &Style, emphasized: bool) -> (Rgb565, Rgb565) {
        let paint_style = if emphasized { style.invert() } else { *style };

        let (mut foreground, background) = if emphasized {
            (paint_style.foreground, self.item.color)
        } else {
            (self.item.color, paint_style.background)
        };

        // Keep the text legible when the item colour matches the fill
        if foreground == background {
            foreground = paint_style.foreground;
        }

        (foreground, background)
    }

    pub fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
        style: &Style,
        emphasized: bool,
    ) -> Result<(), D::Error> {
        let r = self.bounds;
        let (foreground, background) = self.paint_colors(style, emphasized);

        display.fill_solid(&r, background)?;

        let offset_x = match self.item.bitmap {
            Some(bitmap) => {
                bitmap.draw(
                    display,
                    r.top_left + Point::new(BITMAP_INSET_PX, BITMAP_INSET_PX),
                    foreground,
                    background,
                )?;
                TEXT_INSET_WITH_BITMAP_PX
            }
            None => TEXT_INSET_PX,
        };

        let text_style = style
            .with_foreground(foreground)
            .with_background(background);
        let text_y = (r.size.height.saturating_sub(text_style.line_height()) / 2) as i32;
        Text::with_baseline(
            &self.item.text,
            r.top_left + Point::new(offset_x, text_y),
            text_style.text_style(),
            Baseline::Top,
        )
        .draw(display)?;

        if self.item.submenu {
            let center_y = r.center().y;
            let tip_x = r.top_left.x + r.size.width as i32 - TEXT_INSET_PX;
            Triangle::new(
                Point::new(tip_x - CHEVRON_WIDTH_PX, center_y - CHEVRON_WIDTH_PX),
                Point::new(tip_x, center_y),
                Point::new(tip_x - CHEVRON_WIDTH_PX, center_y + CHEVRON_WIDTH_PX),
            )
            .into_styled(PrimitiveStyle::with_fill(foreground))
            .draw(display)?;
        }

        Ok(())
    }
}
