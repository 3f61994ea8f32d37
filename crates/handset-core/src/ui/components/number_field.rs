//! Fixed-width integer entry field

use core::fmt::Write;

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Baseline, Text};

use crate::ui::styling::Style;
use crate::ui::{CHAR_WIDTH_PX, TEXT_ROW_HEIGHT_PX};

/// Integer field rendered right-aligned in `length` character cells.
///
/// Values are clamped to `min..=max`; the step is applied per key press or
/// encoder detent. A focused field is drawn inverted.
#[derive(Debug, Clone)]
pub struct NumberField {
    position: Point,
    length: u32,
    min: i32,
    max: i32,
    step: i32,
    value: i32,
    /// Render a leading '-' when the value is zero (southern/western
    /// hemisphere fractions of a degree).
    negative_zero: bool,
    focused: bool,
    dirty: bool,
}

impl NumberField {
    pub fn new(position: Point, length: u32, range: (i32, i32), step: i32) -> Self {
        let (min, max) = range;
        Self {
            position,
            length,
            min,
            max,
            step,
            value: 0.clamp(min, max),
            negative_zero: false,
            focused: false,
            dirty: true,
        }
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    /// Clamp and store `value`. Returns `true` if the stored value changed.
    pub fn set_value(&mut self, value: i32) -> bool {
        let value = value.clamp(self.min, self.max);
        if value != self.value {
            self.value = value;
            self.dirty = true;
            true
        } else {
            false
        }
    }

    /// Move by `steps` increments. Returns `true` if the value changed.
    pub fn step_by(&mut self, steps: i32) -> bool {
        self.set_value(self.value.saturating_add(steps.saturating_mul(self.step)))
    }

    pub fn set_negative_zero(&mut self, negative_zero: bool) {
        if self.negative_zero != negative_zero {
            self.negative_zero = negative_zero;
            self.dirty = true;
        }
    }

    pub fn set_focused(&mut self, focused: bool) {
        if self.focused != focused {
            self.focused = focused;
            self.dirty = true;
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(
            self.position,
            Size::new(self.length * CHAR_WIDTH_PX, TEXT_ROW_HEIGHT_PX),
        )
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

    /// Text as drawn, right-aligned to the field width.
    pub fn text(&self) -> heapless::String<16> {
        let mut digits = heapless::String::<16>::new();
        if self.value == 0 && self.negative_zero {
            digits.push_str("-0").ok();
        } else {
            write!(&mut digits, "{}", self.value).ok();
        }

        let mut text = heapless::String::<16>::new();
        let width = self.length as usize;
        write!(&mut text, "{:>width$}", digits.as_str()).ok();
        text
    }

    pub fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
        style: &Style,
    ) -> Result<(), D::Error> {
        let style = if self.focused { style.invert() } else { *style };

        display.fill_solid(&self.bounds(), style.background)?;
        let y_offset = (TEXT_ROW_HEIGHT_PX.saturating_sub(style.line_height()) / 2) as i32;
        Text::with_baseline(
            &self.text(),
            self.position + Point::new(0, y_offset),
            style.text_style(),
            Baseline::Top,
        )
        .draw(display)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_value_clamps_to_range() {
        let mut field = NumberField::new(Point::zero(), 4, (-90, 90), 1);

        assert!(field.set_value(120));
        assert_eq!(field.value(), 90);
        assert!(field.set_value(-200));
        assert_eq!(field.value(), -90);
        assert!(!field.set_value(-91), "clamped value is unchanged");
    }

    #[test]
    fn test_step_by_uses_step_size() {
        let mut field = NumberField::new(Point::zero(), 5, (-1000, 50000), 250);

        assert!(field.step_by(2));
        assert_eq!(field.value(), 500);
        assert!(field.step_by(-10));
        assert_eq!(field.value(), -1000);
    }

    #[test]
    fn test_text_is_right_aligned() {
        let mut field = NumberField::new(Point::zero(), 4, (-180, 180), 1);
        field.set_value(-33);
        assert_eq!(field.text().as_str(), " -33");

        field.set_value(0);
        field.set_negative_zero(true);
        assert_eq!(field.text().as_str(), "  -0");
    }
}
