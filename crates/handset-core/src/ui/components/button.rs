//! Push button with keyboard focus and touch support

use crate::ui::core::{Action, Drawable, EventResult, KeyEvent, TouchEvent, TouchPoint, Touchable};
use crate::ui::styling::ColorPalette;
use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::mono_font::{MonoTextStyle, ascii::FONT_8X13};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyleBuilder, Rectangle, RoundedRectangle};
use embedded_graphics::text::{Alignment as TextAlignment, Baseline, Text, TextStyleBuilder};

/// Button state
#[derive(Debug, Clone, Copy, PartialEq)]
enum ButtonState {
    Normal,
    Pressed,
}

/// Button component with label and action
///
/// Responds to the Select key while focused and to touch presses inside its
/// bounds by returning its [`Action`]. A focused button is filled with the
/// palette's primary colour, an unfocused one is outlined.
///
/// # Examples
/// ```ignore
/// let ok = Button::new(
///     Rectangle::new(Point::new(84, 280), Size::new(72, 32)),
///     "OK",
///     Action::GoBack,
/// );
/// ```
pub struct Button {
    bounds: Rectangle,
    label: heapless::String<16>,
    action: Action,
    state: ButtonState,
    focused: bool,
    palette: ColorPalette,
    border_radius: u32,
    dirty: bool,
}

impl Button {
    /// Create a new button with the specified bounds, label, and action.
    ///
    /// Labels longer than 16 characters are truncated.
    pub fn new(bounds: Rectangle, label: &str, action: Action) -> Self {
        let mut label_string = heapless::String::new();
        for c in label.chars() {
            if label_string.push(c).is_err() {
                break;
            }
        }

        Self {
            bounds,
            label: label_string,
            action,
            state: ButtonState::Normal,
            focused: false,
            palette: ColorPalette::default(),
            border_radius: 4,
            dirty: true,
        }
    }

    /// Set the button's color palette.
    pub fn with_palette(mut self, palette: ColorPalette) -> Self {
        self.palette = palette;
        self.dirty = true;
        self
    }

    /// Set the border radius for rounded corners. Default is 4 pixels.
    pub fn with_border_radius(mut self, radius: u32) -> Self {
        self.border_radius = radius;
        self.dirty = true;
        self
    }

    /// Get the action that will be triggered when the button is pressed.
    pub fn action(&self) -> Action {
        self.action
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

    /// Handle a key while focused: Select triggers the action.
    pub fn on_key(&mut self, key: KeyEvent) -> EventResult {
        if self.focused && key == KeyEvent::Select {
            EventResult::Action(self.action)
        } else {
            EventResult::NotHandled
        }
    }

    fn colors(&self) -> (Rgb565, Rgb565) {
        match (self.focused, self.state) {
            (_, ButtonState::Pressed) => (self.palette.background, self.palette.foreground),
            (true, ButtonState::Normal) => (self.palette.primary, self.palette.foreground),
            (false, ButtonState::Normal) => (self.palette.background, self.palette.foreground),
        }
    }
}

impl Drawable for Button {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        let (fill, text_color) = self.colors();

        let corner_radius = Size::new(self.border_radius, self.border_radius);
        RoundedRectangle::with_equal_corners(self.bounds, corner_radius)
            .into_styled(
                PrimitiveStyleBuilder::new()
                    .fill_color(fill)
                    .stroke_color(self.palette.border)
                    .stroke_width(1)
                    .build(),
            )
            .draw(display)?;

        let text_style = TextStyleBuilder::new()
            .alignment(TextAlignment::Center)
            .baseline(Baseline::Middle)
            .build();
        Text::with_text_style(
            &self.label,
            self.bounds.center(),
            MonoTextStyle::new(&FONT_8X13, text_color),
            text_style,
        )
        .draw(display)?;

        Ok(())
    }

    fn bounds(&self) -> Rectangle {
        self.bounds
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

impl Touchable for Button {
    fn contains_point(&self, point: TouchPoint) -> bool {
        self.bounds.contains(point.to_point())
    }

    fn handle_touch(&mut self, event: TouchEvent) -> EventResult {
        match event {
            TouchEvent::Press(point) if self.contains_point(point) => {
                self.state = ButtonState::Pressed;
                self.dirty = true;

                // Trigger action immediately on press
                EventResult::Action(self.action)
            }
            TouchEvent::Release(_) if self.state == ButtonState::Pressed => {
                self.state = ButtonState::Normal;
                self.dirty = true;
                EventResult::Handled
            }
            _ => EventResult::NotHandled,
        }
    }
}
