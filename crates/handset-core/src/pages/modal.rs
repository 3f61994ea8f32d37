//! Modal dialog page
//!
//! Covers the screen with a title, a centred (possibly multi-line) message
//! and a single button. The button's action depends on the dialog kind:
//! an info dialog just closes itself, an abort dialog also closes the page
//! that raised it.

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::geometry::{Point, Size};
use embedded_graphics::mono_font::{MonoTextStyle, ascii::FONT_8X13};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Alignment, Text};

use crate::pages::Page;
use crate::pages::constants::{
    BUTTON_HEIGHT_PX, BUTTON_MARGIN_PX, BUTTON_WIDTH_PX, PAGE_HEADER_HEIGHT_PX,
};
use crate::ui::components::Button;
use crate::ui::core::{
    Action, Drawable, EncoderEvent, KeyEvent, Modal, ModalKind, PageId, TouchEvent, Touchable,
};
use crate::ui::styling::ColorPalette;
use crate::ui::TEXT_ROW_HEIGHT_PX;

/// Dialog page showing one [`Modal`]
pub struct ModalPage {
    bounds: Rectangle,
    modal: Modal,
    button: Button,
    palette: ColorPalette,
    dirty: bool,
}

impl ModalPage {
    pub fn new(bounds: Rectangle, modal: Modal) -> Self {
        let (label, action) = match modal.kind {
            ModalKind::Info => ("OK", Action::GoBack),
            ModalKind::Abort => ("Abort", Action::Abort),
        };

        let button_bounds = Rectangle::new(
            bounds.top_left
                + Point::new(
                    (bounds.size.width - BUTTON_WIDTH_PX) as i32 / 2,
                    (bounds.size.height - BUTTON_HEIGHT_PX - BUTTON_MARGIN_PX * 4) as i32,
                ),
            Size::new(BUTTON_WIDTH_PX, BUTTON_HEIGHT_PX),
        );
        let mut button = Button::new(button_bounds, label, action);
        button.set_focused(true);

        Self {
            bounds,
            modal,
            button,
            palette: ColorPalette::default(),
            dirty: true,
        }
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    /// The action taken when the dialog is dismissed
    pub fn dismiss_action(&self) -> Action {
        self.button.action()
    }
}

impl Page for ModalPage {
    fn id(&self) -> PageId {
        PageId::Modal
    }

    fn title(&self) -> &str {
        self.modal.title
    }

    fn handle_touch(&mut self, event: TouchEvent) -> Option<Action> {
        self.button.handle_touch(event).into_action()
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key {
            KeyEvent::Select => self.button.on_key(key).into_action(),
            KeyEvent::Left => Some(self.dismiss_action()),
            _ => None,
        }
    }

    fn handle_encoder(&mut self, _delta: EncoderEvent) -> Option<Action> {
        None
    }

    fn draw_page<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        Drawable::draw(self, display)
    }

    fn bounds(&self) -> Rectangle {
        Drawable::bounds(self)
    }

    fn is_dirty(&self) -> bool {
        Drawable::is_dirty(self)
    }

    fn mark_clean(&mut self) {
        Drawable::mark_clean(self)
    }

    fn mark_dirty(&mut self) {
        Drawable::mark_dirty(self)
    }
}

impl Drawable for ModalPage {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        if self.dirty {
            display.fill_solid(&self.bounds, self.palette.background)?;

            let header = Rectangle::new(
                self.bounds.top_left,
                Size::new(self.bounds.size.width, PAGE_HEADER_HEIGHT_PX),
            );
            display.fill_solid(&header, self.palette.error)?;
            Text::with_alignment(
                self.modal.title,
                Point::new(header.center().x, header.center().y + 4),
                MonoTextStyle::new(&FONT_8X13, self.palette.background),
                Alignment::Center,
            )
            .draw(display)?;

            // Message block centred vertically in the body
            let lines = self.modal.message.lines().count() as i32;
            let line_height = TEXT_ROW_HEIGHT_PX as i32;
            let center = self.bounds.center();
            let first_y = center.y - (lines - 1) * line_height / 2;
            for (i, line) in self.modal.message.lines().enumerate() {
                Text::with_alignment(
                    line,
                    Point::new(center.x, first_y + i as i32 * line_height),
                    MonoTextStyle::new(&FONT_8X13, self.palette.foreground),
                    Alignment::Center,
                )
                .draw(display)?;
            }
        }

        if self.dirty || self.button.is_dirty() {
            self.button.draw(display)?;
        }

        Ok(())
    }

    fn bounds(&self) -> Rectangle {
        self.bounds
    }

    fn is_dirty(&self) -> bool {
        self.dirty || self.button.is_dirty()
    }

    fn mark_clean(&mut self) {
        self.dirty = false;
        self.button.mark_clean();
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
