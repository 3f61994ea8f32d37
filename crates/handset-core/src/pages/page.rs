//! Core page abstraction and type-erased wrapper for the UI page system.
//!
//! This module defines the [`Page`] trait that all UI pages must implement,
//! along with [`PageWrapper`], an enum-based wrapper that lets the
//! [`PageManager`](super::page_manager::PageManager) keep a stack of
//! different page types without `dyn`.

use alloc::boxed::Box;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::pages::geomap::GeoMapView;
use crate::pages::menu::MenuPage;
use crate::pages::modal::ModalPage;
use crate::storage::MapStorage;
use crate::ui::core::{Action, EncoderEvent, KeyEvent, PageId, TouchEvent};

// ---------------------------------------------------------------------------
// Page trait
// ---------------------------------------------------------------------------

/// Trait that all navigable UI pages must implement.
///
/// The [`PageManager`](super::page_manager::PageManager) calls these methods
/// in a well-defined order:
///
/// 1. **`on_activate`** - whenever the page becomes the top of the stack,
///    including when the page above it is popped.
/// 2. **`handle_key` / `handle_encoder` / `handle_touch`** - for input.
/// 3. **`update`** - once per frame to advance internal state.
/// 4. **`draw_page`** - when `is_dirty()` is true.
/// 5. **`on_deactivate`** - when another page is pushed on top or this
///    page is popped.
///
/// Every method that can trigger navigation returns an [`Action`] for the
/// manager instead of reaching into it.
pub trait Page {
    /// Unique identifier used for navigation and logging.
    fn id(&self) -> PageId;

    fn title(&self) -> &str;

    /// Called when this page becomes the active page.
    fn on_activate(&mut self) -> Option<Action> {
        self.mark_dirty();
        None
    }

    fn on_deactivate(&mut self) {}

    fn handle_touch(&mut self, event: TouchEvent) -> Option<Action>;

    fn handle_key(&mut self, key: KeyEvent) -> Option<Action>;

    fn handle_encoder(&mut self, delta: EncoderEvent) -> Option<Action>;

    /// Advance per-frame state (blinking, timers).
    fn update(&mut self) {}

    /// Render the page. Pages only repaint what changed since the last call.
    fn draw_page<D: DrawTarget<Color = Rgb565>>(&mut self, display: &mut D) -> Result<(), D::Error>;

    fn bounds(&self) -> Rectangle;

    fn is_dirty(&self) -> bool;

    fn mark_clean(&mut self);

    /// Force a full redraw on the next frame.
    fn mark_dirty(&mut self);
}

// ---------------------------------------------------------------------------
// Blanket impl: Box<T> where T: Page
// ---------------------------------------------------------------------------

impl<T: Page> Page for Box<T> {
    fn id(&self) -> PageId {
        (**self).id()
    }

    fn title(&self) -> &str {
        (**self).title()
    }

    fn on_activate(&mut self) -> Option<Action> {
        (**self).on_activate()
    }

    fn on_deactivate(&mut self) {
        (**self).on_deactivate()
    }

    fn handle_touch(&mut self, event: TouchEvent) -> Option<Action> {
        (**self).handle_touch(event)
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        (**self).handle_key(key)
    }

    fn handle_encoder(&mut self, delta: EncoderEvent) -> Option<Action> {
        (**self).handle_encoder(delta)
    }

    fn update(&mut self) {
        (**self).update()
    }

    fn draw_page<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        (**self).draw_page(display)
    }

    fn bounds(&self) -> Rectangle {
        (**self).bounds()
    }

    fn is_dirty(&self) -> bool {
        (**self).is_dirty()
    }

    fn mark_clean(&mut self) {
        (**self).mark_clean()
    }

    fn mark_dirty(&mut self) {
        (**self).mark_dirty()
    }
}

// ---------------------------------------------------------------------------
// PageWrapper
// ---------------------------------------------------------------------------

/// Enum-based wrapper that stores one of the concrete page types.
///
/// Each variant boxes its page so the enum stays small regardless of the
/// page's footprint. The map page is generic over the storage the map is
/// read from, so the wrapper is too.
pub enum PageWrapper<S: MapStorage> {
    Menu(Box<MenuPage>),
    GeoMap(Box<GeoMapView<S>>),
    Modal(Box<ModalPage>),
}

impl<S: MapStorage> Page for PageWrapper<S> {
    fn id(&self) -> PageId {
        match self {
            PageWrapper::Menu(page) => page.id(),
            PageWrapper::GeoMap(page) => page.id(),
            PageWrapper::Modal(page) => page.id(),
        }
    }

    fn title(&self) -> &str {
        match self {
            PageWrapper::Menu(page) => page.title(),
            PageWrapper::GeoMap(page) => page.title(),
            PageWrapper::Modal(page) => page.title(),
        }
    }

    fn on_activate(&mut self) -> Option<Action> {
        match self {
            PageWrapper::Menu(page) => page.on_activate(),
            PageWrapper::GeoMap(page) => page.on_activate(),
            PageWrapper::Modal(page) => page.on_activate(),
        }
    }

    fn on_deactivate(&mut self) {
        match self {
            PageWrapper::Menu(page) => page.on_deactivate(),
            PageWrapper::GeoMap(page) => page.on_deactivate(),
            PageWrapper::Modal(page) => page.on_deactivate(),
        }
    }

    fn handle_touch(&mut self, event: TouchEvent) -> Option<Action> {
        match self {
            PageWrapper::Menu(page) => page.handle_touch(event),
            PageWrapper::GeoMap(page) => page.handle_touch(event),
            PageWrapper::Modal(page) => page.handle_touch(event),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        match self {
            PageWrapper::Menu(page) => page.handle_key(key),
            PageWrapper::GeoMap(page) => page.handle_key(key),
            PageWrapper::Modal(page) => page.handle_key(key),
        }
    }

    fn handle_encoder(&mut self, delta: EncoderEvent) -> Option<Action> {
        match self {
            PageWrapper::Menu(page) => page.handle_encoder(delta),
            PageWrapper::GeoMap(page) => page.handle_encoder(delta),
            PageWrapper::Modal(page) => page.handle_encoder(delta),
        }
    }

    fn update(&mut self) {
        match self {
            PageWrapper::Menu(page) => page.update(),
            PageWrapper::GeoMap(page) => page.update(),
            PageWrapper::Modal(page) => page.update(),
        }
    }

    fn draw_page<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        match self {
            PageWrapper::Menu(page) => page.draw_page(display),
            PageWrapper::GeoMap(page) => page.draw_page(display),
            PageWrapper::Modal(page) => page.draw_page(display),
        }
    }

    fn bounds(&self) -> Rectangle {
        match self {
            PageWrapper::Menu(page) => Page::bounds(page),
            PageWrapper::GeoMap(page) => Page::bounds(page),
            PageWrapper::Modal(page) => Page::bounds(page),
        }
    }

    fn is_dirty(&self) -> bool {
        match self {
            PageWrapper::Menu(page) => Page::is_dirty(page),
            PageWrapper::GeoMap(page) => Page::is_dirty(page),
            PageWrapper::Modal(page) => Page::is_dirty(page),
        }
    }

    fn mark_clean(&mut self) {
        match self {
            PageWrapper::Menu(page) => Page::mark_clean(page),
            PageWrapper::GeoMap(page) => Page::mark_clean(page),
            PageWrapper::Modal(page) => Page::mark_clean(page),
        }
    }

    fn mark_dirty(&mut self) {
        match self {
            PageWrapper::Menu(page) => Page::mark_dirty(page),
            PageWrapper::GeoMap(page) => Page::mark_dirty(page),
            PageWrapper::Modal(page) => Page::mark_dirty(page),
        }
    }
}

impl<S: MapStorage> From<MenuPage> for PageWrapper<S> {
    fn from(page: MenuPage) -> Self {
        PageWrapper::Menu(Box::new(page))
    }
}

impl<S: MapStorage> From<GeoMapView<S>> for PageWrapper<S> {
    fn from(page: GeoMapView<S>) -> Self {
        PageWrapper::GeoMap(Box::new(page))
    }
}

impl<S: MapStorage> From<ModalPage> for PageWrapper<S> {
    fn from(page: ModalPage) -> Self {
        PageWrapper::Modal(Box::new(page))
    }
}
