//! Page stack with navigation and event dispatching.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use heapless::Vec;
use log::{debug, warn};

use crate::pages::modal::ModalPage;
use crate::pages::page::{Page, PageWrapper};
use crate::storage::MapStorage;
use crate::ui::core::{Action, EncoderEvent, KeyEvent, Modal, PageId, TouchEvent};

/// Deepest page stack supported
pub const MAX_PAGE_DEPTH: usize = 8;

/// Stack of pages; only the top one receives input and is drawn.
///
/// Pages request navigation by returning [`Action`]s. The manager handles
/// the stack operations itself ([`Action::GoBack`], [`Action::Abort`],
/// [`Action::ShowModal`]) and hands everything else back to the caller,
/// which knows how to build the page behind a [`PageId`].
pub struct PageManager<S: MapStorage> {
    stack: Vec<PageWrapper<S>, MAX_PAGE_DEPTH>,
    display_bounds: Rectangle,
}

impl<S: MapStorage> PageManager<S> {
    pub fn new(display_bounds: Rectangle) -> Self {
        Self {
            stack: Vec::new(),
            display_bounds,
        }
    }

    /// Push `page` on top and activate it.
    ///
    /// Returns an action the caller has to handle, if activation raised one.
    pub fn push(&mut self, page: PageWrapper<S>) -> Option<Action> {
        if self.stack.is_full() {
            warn!("Page stack full, dropping {:?}", page.id());
            return None;
        }

        if let Some(current) = self.stack.last_mut() {
            current.on_deactivate();
        }

        debug!("Push page {:?} ({})", page.id(), page.title());
        self.stack.push(page).ok();
        self.activate_top()
    }

    /// Pop the top page and reactivate the one below. The root page is
    /// never popped.
    ///
    /// Returns an action the caller has to handle, if reactivation raised one.
    pub fn pop(&mut self) -> Option<Action> {
        self.pop_pages(1)
    }

    fn pop_pages(&mut self, count: usize) -> Option<Action> {
        let mut popped = false;
        for _ in 0..count {
            if self.stack.len() <= 1 {
                debug!("Refusing to pop the root page");
                break;
            }
            if let Some(mut page) = self.stack.pop() {
                page.on_deactivate();
                debug!("Pop page {:?}", page.id());
                popped = true;
            }
        }

        if popped { self.activate_top() } else { None }
    }

    fn activate_top(&mut self) -> Option<Action> {
        let action = self.stack.last_mut().and_then(|page| {
            page.mark_dirty();
            page.on_activate()
        });
        self.dispatch(action)
    }

    /// Show a blocking dialog on top of the current page.
    pub fn display_modal(&mut self, modal: Modal) -> Option<Action> {
        self.push(ModalPage::new(self.display_bounds, modal).into())
    }

    /// Apply stack actions; return the rest to the caller.
    pub fn dispatch(&mut self, action: Option<Action>) -> Option<Action> {
        let action = action?;
        debug!("Dispatching {:?}", action);

        match action {
            Action::GoBack => self.pop_pages(1),
            Action::Abort => self.pop_pages(2),
            Action::ShowModal(modal) => self.display_modal(modal),
            Action::NavigateToPage(_) | Action::Custom(_) => Some(action),
        }
    }

    pub fn handle_touch(&mut self, event: TouchEvent) -> Option<Action> {
        let action = self.stack.last_mut()?.handle_touch(event);
        self.dispatch(action)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        let action = self.stack.last_mut()?.handle_key(key);
        self.dispatch(action)
    }

    pub fn handle_encoder(&mut self, delta: EncoderEvent) -> Option<Action> {
        let action = self.stack.last_mut()?.handle_encoder(delta);
        self.dispatch(action)
    }

    /// Update the top page's state
    pub fn update(&mut self) {
        if let Some(page) = self.stack.last_mut() {
            page.update();
        }
    }

    /// Draw the top page if anything on it changed.
    ///
    /// Returns whether anything was drawn.
    pub fn draw<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        display: &mut D,
    ) -> Result<bool, D::Error> {
        match self.stack.last_mut() {
            Some(page) if page.is_dirty() => {
                page.draw_page(display)?;
                page.mark_clean();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.stack.last().is_some_and(|page| page.is_dirty())
    }

    pub fn current_page_id(&self) -> Option<PageId> {
        self.stack.last().map(|page| page.id())
    }

    pub fn current_page_mut(&mut self) -> Option<&mut PageWrapper<S>> {
        self.stack.last_mut()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MenuConfig;
    use crate::pages::{GeoMapView, MenuPage};
    use crate::storage::WORLD_MAP_PATH;
    use crate::test_utils::{MemoryMapStorage, TestDisplay, world_map_bytes};
    use crate::tick::TickSignal;
    use crate::ui::core::ModalKind;
    use alloc::boxed::Box;

    fn screen() -> Rectangle {
        Rectangle::new(Point::zero(), Size::new(240, 320))
    }

    fn manager_with_menu(ticks: &'static TickSignal) -> PageManager<MemoryMapStorage> {
        let mut manager = PageManager::new(screen());
        assert_eq!(
            manager.push(MenuPage::main_menu(screen(), &MenuConfig::default(), ticks).into()),
            None
        );
        manager
    }

    fn map_storage() -> MemoryMapStorage {
        MemoryMapStorage::new().with_file(WORLD_MAP_PATH, world_map_bytes(1000, 500, |_, _| 0))
    }

    #[test]
    fn test_navigate_and_go_back() {
        static TICKS: TickSignal = TickSignal::new();
        let mut manager = manager_with_menu(&TICKS);
        assert_eq!(manager.current_page_id(), Some(PageId::MainMenu));

        // Navigation requests are left to the app
        assert_eq!(
            manager.handle_key(KeyEvent::Select),
            Some(Action::NavigateToPage(PageId::GeoMapDisplay))
        );
        assert_eq!(manager.depth(), 1);

        let view = GeoMapView::display(
            screen(),
            map_storage(),
            WORLD_MAP_PATH,
            None,
            0,
            0.0,
            0.0,
            0.0,
        );
        assert_eq!(manager.push(view.into()), None);
        assert_eq!(manager.depth(), 2);
        assert_eq!(manager.current_page_id(), Some(PageId::GeoMapDisplay));

        assert_eq!(manager.handle_key(KeyEvent::Left), None);
        assert_eq!(manager.depth(), 1);
        assert_eq!(manager.current_page_id(), Some(PageId::MainMenu));
        assert!(manager.is_dirty(), "uncovered page must repaint");
    }

    #[test]
    fn test_root_page_is_never_popped() {
        static TICKS: TickSignal = TickSignal::new();
        let mut manager = manager_with_menu(&TICKS);

        assert_eq!(manager.pop(), None);
        assert_eq!(manager.dispatch(Some(Action::Abort)), None);
        assert_eq!(manager.depth(), 1);
        assert_eq!(manager.current_page_id(), Some(PageId::MainMenu));
    }

    #[test]
    fn test_missing_map_modal_aborts_back_to_menu() {
        static TICKS: TickSignal = TickSignal::new();
        let mut manager = manager_with_menu(&TICKS);

        let view = GeoMapView::display(
            screen(),
            MemoryMapStorage::new(),
            WORLD_MAP_PATH,
            None,
            0,
            0.0,
            0.0,
            0.0,
        );
        assert_eq!(manager.push(view.into()), None);
        assert_eq!(manager.depth(), 3);
        assert_eq!(manager.current_page_id(), Some(PageId::Modal));

        assert_eq!(manager.handle_key(KeyEvent::Select), None);
        assert_eq!(manager.depth(), 1);
        assert_eq!(manager.current_page_id(), Some(PageId::MainMenu));
    }

    #[test]
    fn test_info_modal_closes_itself_only() {
        static TICKS: TickSignal = TickSignal::new();
        let mut manager = manager_with_menu(&TICKS);

        manager.display_modal(Modal {
            title: "Saved",
            message: "Position stored",
            kind: ModalKind::Info,
        });
        assert_eq!(manager.depth(), 2);

        assert_eq!(manager.handle_key(KeyEvent::Select), None);
        assert_eq!(manager.depth(), 1);
    }

    #[test]
    fn test_prompt_confirm_pops_page() {
        static TICKS: TickSignal = TickSignal::new();
        let mut manager = manager_with_menu(&TICKS);

        let view = GeoMapView::prompt(
            screen(),
            map_storage(),
            WORLD_MAP_PATH,
            0,
            0.0,
            0.0,
            Box::new(|_, _, _| {}),
        );
        manager.push(view.into());
        assert_eq!(manager.current_page_id(), Some(PageId::GeoMapPrompt));

        // OK button
        let press = TouchEvent::Press(crate::ui::core::TouchPoint::new(120, 300));
        assert_eq!(manager.handle_touch(press), None);
        assert_eq!(manager.current_page_id(), Some(PageId::MainMenu));
    }

    #[test]
    fn test_draw_only_when_dirty() {
        static TICKS: TickSignal = TickSignal::new();
        let mut manager = manager_with_menu(&TICKS);
        let mut display = TestDisplay::new();

        assert_eq!(manager.draw(&mut display), Ok(true));
        assert_eq!(manager.draw(&mut display), Ok(false));

        manager.handle_key(KeyEvent::Down);
        assert_eq!(manager.draw(&mut display), Ok(true));
    }

    #[test]
    fn test_full_stack_drops_push() {
        static TICKS: TickSignal = TickSignal::new();
        let mut manager = manager_with_menu(&TICKS);
        let info = Modal {
            title: "Info",
            message: "",
            kind: ModalKind::Info,
        };

        for _ in 0..MAX_PAGE_DEPTH + 2 {
            manager.display_modal(info);
        }
        assert_eq!(manager.depth(), MAX_PAGE_DEPTH);
    }
}
