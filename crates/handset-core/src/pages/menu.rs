//! Titled page hosting a [`MenuView`]

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use crate::config::MenuConfig;
use crate::pages::Page;
use crate::pages::constants::PAGE_HEADER_HEIGHT_PX;
use crate::tick::TickSignal;
use crate::ui::components::{ICON_CROSSHAIR, ICON_GLOBE, MenuItem, MenuView};
use crate::ui::core::{
    Action, Drawable, EncoderEvent, Focusable, KeyEvent, PageId, TouchEvent, Touchable,
};
use crate::ui::styling::Theme;

pub struct MenuPage {
    bounds: Rectangle,
    id: PageId,
    title: &'static str,
    menu: MenuView,
    theme: Theme,
    dirty: bool,
}

impl MenuPage {
    /// Empty menu below a title bar.
    pub fn new(
        bounds: Rectangle,
        id: PageId,
        title: &'static str,
        config: &MenuConfig,
        ticks: &'static TickSignal,
    ) -> Self {
        let menu_bounds = Rectangle::new(
            bounds.top_left + Point::new(0, PAGE_HEADER_HEIGHT_PX as i32),
            Size::new(
                bounds.size.width,
                bounds.size.height.saturating_sub(PAGE_HEADER_HEIGHT_PX),
            ),
        );
        let menu = MenuView::new(menu_bounds, config.keep_highlight, ticks)
            .with_row_height(config.row_height_px);

        Self {
            bounds,
            id,
            title,
            menu,
            theme: Theme::default(),
            dirty: true,
        }
    }

    /// The root menu: view the map or pick a position on it.
    pub fn main_menu(bounds: Rectangle, config: &MenuConfig, ticks: &'static TickSignal) -> Self {
        let mut page = Self::new(bounds, PageId::MainMenu, "Handset", config, ticks);
        page.menu.add_items([
            MenuItem::new("World map", Action::NavigateToPage(PageId::GeoMapDisplay))
                .with_bitmap(&ICON_GLOBE)
                .with_submenu(),
            MenuItem::new("Pick position", Action::NavigateToPage(PageId::GeoMapPrompt))
                .with_bitmap(&ICON_CROSSHAIR)
                .with_submenu(),
        ]);
        page
    }

    pub fn menu(&self) -> &MenuView {
        &self.menu
    }

    pub fn menu_mut(&mut self) -> &mut MenuView {
        &mut self.menu
    }

    fn draw_header<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        let header = Rectangle::new(
            self.bounds.top_left,
            Size::new(self.bounds.size.width, PAGE_HEADER_HEIGHT_PX),
        );
        display.fill_solid(&header, self.theme.palette.primary)?;

        let text_style = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build();
        Text::with_text_style(
            self.title,
            header.center(),
            self.theme
                .text
                .with_background(self.theme.palette.primary)
                .text_style(),
            text_style,
        )
        .draw(display)?;

        Ok(())
    }
}

impl Page for MenuPage {
    fn id(&self) -> PageId {
        self.id
    }

    fn title(&self) -> &str {
        self.title
    }

    fn on_activate(&mut self) -> Option<Action> {
        self.menu.on_focus();
        self.dirty = true;
        None
    }

    fn on_deactivate(&mut self) {
        self.menu.on_blur();
    }

    fn handle_touch(&mut self, event: TouchEvent) -> Option<Action> {
        self.menu.handle_touch(event).into_action()
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        self.menu.on_key(key).into_action()
    }

    fn handle_encoder(&mut self, delta: EncoderEvent) -> Option<Action> {
        self.menu.on_encoder(delta).into_action()
    }

    fn update(&mut self) {
        self.menu.update();
    }

    fn draw_page<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        if self.dirty {
            self.draw_header(display)?;
        }
        if self.dirty || self.menu.is_dirty() {
            self.menu.draw(display)?;
        }
        Ok(())
    }

    fn bounds(&self) -> Rectangle {
        self.bounds
    }

    fn is_dirty(&self) -> bool {
        self.dirty || self.menu.is_dirty()
    }

    fn mark_clean(&mut self) {
        self.dirty = false;
        self.menu.mark_clean();
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
        self.menu.mark_dirty();
    }
}
