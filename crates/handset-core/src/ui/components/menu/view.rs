//! Scrolling menu list

use alloc::vec::Vec;

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle, Triangle};
use log::debug;

use super::item::{MenuItem, MenuItemView};
use crate::tick::{TickSignal, TickSubscription};
use crate::ui::core::{
    Action, Drawable, EncoderEvent, EventResult, Focusable, KeyEvent, TouchEvent, TouchPoint,
    Touchable,
};
use crate::ui::styling::{BLACK, Theme, WHITE};

/// Default height of one menu row
pub const MENU_ITEM_HEIGHT_PX: u32 = 24;

/// Side of the square "more items" arrow
const MORE_ARROW_SIZE_PX: u32 = 8;

/// Distance of the arrow from the right edge
const MORE_ARROW_MARGIN_PX: i32 = 12;

/// Vertical list of [`MenuItemView`]s showing at most `displayed_max` rows.
///
/// The view keeps one highlighted row and a scroll `offset` (index of the
/// first visible row) such that the highlighted row is always visible:
/// `offset <= highlighted < offset + displayed_max`. Rows outside the window
/// stay in the list but are hidden, which excludes them from painting and
/// hit-testing.
///
/// When rows exist below the window a small arrow blinks in the bottom right
/// corner, driven by a 1 Hz [`TickSignal`] subscription that lives exactly as
/// long as the view.
///
/// # Examples
/// ```ignore
/// let mut menu = MenuView::new(bounds, false, &TICK_SECOND);
/// menu.add_items([
///     MenuItem::new("Map", Action::NavigateToPage(PageId::GeoMapDisplay)),
///     MenuItem::new("Pick position", Action::NavigateToPage(PageId::GeoMapPrompt)),
/// ]);
/// menu.on_focus();
/// ```
pub struct MenuView {
    bounds: Rectangle,
    items: Vec<MenuItemView>,
    highlighted: usize,
    offset: usize,
    row_height: u32,
    displayed_max: usize,
    keep_highlight: bool,
    focused: bool,
    /// Rows exist below the visible window
    more: bool,
    blink: bool,
    arrow_lit: bool,
    on_left: Option<Action>,
    theme: Theme,
    tick: TickSubscription,
    dirty: bool,
}

impl MenuView {
    /// Create an empty menu filling `bounds`.
    ///
    /// With `keep_highlight` the highlighted row stays emphasised while the
    /// menu does not own the focus.
    pub fn new(bounds: Rectangle, keep_highlight: bool, ticks: &'static TickSignal) -> Self {
        let mut menu = Self {
            bounds,
            items: Vec::new(),
            highlighted: 0,
            offset: 0,
            row_height: MENU_ITEM_HEIGHT_PX,
            displayed_max: 1,
            keep_highlight,
            focused: false,
            more: false,
            blink: false,
            arrow_lit: false,
            on_left: None,
            theme: Theme::default(),
            tick: ticks.subscribe(),
            dirty: true,
        };
        menu.displayed_max = menu.compute_displayed_max();
        menu
    }

    /// Use a different row height. Rows are re-laid out.
    pub fn with_row_height(mut self, row_height: u32) -> Self {
        self.row_height = row_height.max(1);
        self.displayed_max = self.compute_displayed_max();
        self.update_items();
        self
    }

    /// Action returned when the Left key is pressed.
    pub fn with_on_left(mut self, action: Action) -> Self {
        self.on_left = Some(action);
        self
    }

    fn compute_displayed_max(&self) -> usize {
        ((self.bounds.size.height / self.row_height) as usize).max(1)
    }

    /// Append one item. The highlight only moves if the menu was empty.
    pub fn add_item(&mut self, item: MenuItem) {
        let was_empty = self.items.is_empty();
        let mut view = MenuItemView::new(item);

        if was_empty {
            self.highlighted = 0;
            if self.focused || self.keep_highlight {
                view.highlight();
            }
        }

        self.items.push(view);
        self.update_items();
    }

    pub fn add_items<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = MenuItem>,
    {
        for item in items {
            self.add_item(item);
        }
    }

    /// Remove every item and scroll back to the top.
    pub fn clear(&mut self) {
        self.items.clear();
        self.offset = 0;
        self.highlighted = 0;
        self.update_items();
    }

    /// Recompute the more indicator and every row's position and visibility.
    fn update_items(&mut self) {
        if self.items.len() > self.displayed_max + self.offset {
            self.more = true;
            self.blink = true;
        } else {
            self.more = false;
        }

        let height = self.row_height as i32;
        let last_row_y = self.bounds.size.height as i32 - height;
        let origin = self.bounds.top_left;
        let width = self.bounds.size.width;

        for (i, item) in self.items.iter_mut().enumerate() {
            let y_pos = (i as i32 - self.offset as i32) * height;
            item.set_bounds(Rectangle::new(
                origin + Point::new(0, y_pos),
                Size::new(width, self.row_height),
            ));
            item.set_hidden(y_pos < 0 || y_pos > last_row_y);
        }

        self.dirty = true;
    }

    pub fn item_view(&self, index: usize) -> Option<&MenuItemView> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[MenuItemView] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn displayed_max(&self) -> usize {
        self.displayed_max
    }

    /// Rows exist below the visible window
    pub fn has_more(&self) -> bool {
        self.more
    }

    /// Whether the more arrow is currently drawn lit
    pub fn is_more_arrow_lit(&self) -> bool {
        self.arrow_lit
    }

    /// Move the highlight, scrolling the window to keep it visible.
    ///
    /// Negative indices are rejected (returns `false`, nothing changes);
    /// indices past the end select the last item.
    pub fn set_highlighted(&mut self, new_value: i32) -> bool {
        if new_value < 0 || self.items.is_empty() {
            return false;
        }

        let new_value = (new_value as usize).min(self.items.len() - 1);

        if new_value < self.offset {
            // Shift window down so the new row is the first visible one
            self.offset = new_value;
            self.update_items();
        } else if new_value - self.offset >= self.displayed_max {
            // Shift window up so the new row is the last visible one
            self.offset = new_value + 1 - self.displayed_max;
            self.update_items();
        }

        debug!(
            "Menu highlight {} -> {} (offset {})",
            self.highlighted, new_value, self.offset
        );

        if let Some(previous) = self.items.get_mut(self.highlighted) {
            previous.unhighlight();
        }
        self.highlighted = new_value;
        self.items[new_value].highlight();
        self.dirty = true;

        true
    }

    /// Advance the blink state by one tick.
    pub fn on_tick_second(&mut self) {
        let lit = self.more && self.blink;
        if lit != self.arrow_lit {
            self.arrow_lit = lit;
            self.dirty = true;
        }
        self.blink = !self.blink;
    }

    /// Drain pending ticks; call once per UI frame.
    pub fn update(&mut self) {
        for _ in 0..self.tick.take_pending() {
            self.on_tick_second();
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> EventResult {
        let handled = |ok: bool| {
            if ok {
                EventResult::Handled
            } else {
                EventResult::NotHandled
            }
        };

        match key {
            KeyEvent::Up => handled(self.set_highlighted(self.highlighted as i32 - 1)),
            KeyEvent::Down => handled(self.set_highlighted(self.highlighted as i32 + 1)),
            KeyEvent::Select | KeyEvent::Right => {
                match self.items.get(self.highlighted).and_then(MenuItemView::select) {
                    Some(action) => EventResult::Action(action),
                    None => EventResult::Handled,
                }
            }
            KeyEvent::Left => match self.on_left {
                Some(action) => EventResult::Action(action),
                None => EventResult::Handled,
            },
        }
    }

    pub fn on_encoder(&mut self, delta: EncoderEvent) -> EventResult {
        self.set_highlighted((self.highlighted as i32).saturating_add(delta));
        EventResult::Handled
    }

    fn emphasized(&self, item: &MenuItemView) -> bool {
        item.is_highlighted() && (self.focused || self.keep_highlight)
    }

    fn more_arrow_bounds(&self) -> Rectangle {
        let rows_height = self.displayed_max as u32 * self.row_height;
        let y = rows_height.min(self.bounds.size.height.saturating_sub(MORE_ARROW_SIZE_PX));
        Rectangle::new(
            self.bounds.top_left
                + Point::new(
                    self.bounds.size.width as i32 - MORE_ARROW_MARGIN_PX,
                    y as i32,
                ),
            Size::new(MORE_ARROW_SIZE_PX, MORE_ARROW_SIZE_PX),
        )
    }

    fn draw_more_arrow<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        let r = self.more_arrow_bounds();
        let color = if self.arrow_lit { WHITE } else { BLACK };
        let size = MORE_ARROW_SIZE_PX as i32 - 1;

        Triangle::new(
            r.top_left,
            r.top_left + Point::new(size, 0),
            r.top_left + Point::new(size / 2, size),
        )
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(display)?;

        Ok(())
    }
}

impl Drawable for MenuView {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        for item in self.items.iter().filter(|item| !item.is_hidden()) {
            item.draw(display, &self.theme.text, self.emphasized(item))?;
        }

        // Clear the area below the last row (shorter lists, after clear())
        let visible = self.items.len().saturating_sub(self.offset).min(self.displayed_max);
        let used = visible as u32 * self.row_height;
        if used < self.bounds.size.height {
            let rest = Rectangle::new(
                self.bounds.top_left + Point::new(0, used as i32),
                Size::new(self.bounds.size.width, self.bounds.size.height - used),
            );
            display.fill_solid(&rest, self.theme.palette.background)?;
        }

        self.draw_more_arrow(display)
    }

    fn bounds(&self) -> Rectangle {
        self.bounds
    }

    fn is_dirty(&self) -> bool {
        self.dirty || self.items.iter().any(MenuItemView::is_dirty)
    }

    fn mark_clean(&mut self) {
        self.dirty = false;
        for item in self.items.iter_mut() {
            item.mark_clean();
        }
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

impl Focusable for MenuView {
    fn on_focus(&mut self) {
        self.focused = true;
        if let Some(item) = self.items.get_mut(self.highlighted) {
            item.highlight();
        }
        self.dirty = true;
    }

    fn on_blur(&mut self) {
        self.focused = false;
        if !self.keep_highlight
            && let Some(item) = self.items.get_mut(self.highlighted)
        {
            item.unhighlight();
        }
        self.dirty = true;
    }

    fn has_focus(&self) -> bool {
        self.focused
    }
}

impl Touchable for MenuView {
    fn contains_point(&self, point: TouchPoint) -> bool {
        self.bounds.contains(point.to_point())
    }

    fn handle_touch(&mut self, event: TouchEvent) -> EventResult {
        let TouchEvent::Press(point) = event else {
            return EventResult::NotHandled;
        };

        let p = point.to_point();
        let hit = self
            .items
            .iter()
            .position(|item| !item.is_hidden() && item.bounds().contains(p));

        match hit {
            // A press on the highlighted row selects it
            Some(index) if index == self.highlighted && self.items[index].is_highlighted() => {
                match self.items[index].select() {
                    Some(action) => EventResult::Action(action),
                    None => EventResult::Handled,
                }
            }
            Some(index) if self.set_highlighted(index as i32) => EventResult::Handled,
            _ => EventResult::NotHandled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestDisplay;
    use alloc::format;

    /// Menu with room for exactly five 24 px rows
    fn menu_with_items(ticks: &'static TickSignal, count: usize) -> MenuView {
        let bounds = Rectangle::new(Point::new(0, 32), Size::new(240, 5 * MENU_ITEM_HEIGHT_PX));
        let mut menu = MenuView::new(bounds, false, ticks);
        for i in 0..count {
            menu.add_item(MenuItem::new(&format!("Item {i}"), Action::Custom(i as u16)));
        }
        menu
    }

    fn highlighted_count(menu: &MenuView) -> usize {
        menu.items().iter().filter(|i| i.is_highlighted()).count()
    }

    fn assert_window_invariant(menu: &MenuView) {
        let count = menu.len();
        let max_offset = count.saturating_sub(menu.displayed_max());
        assert!(menu.offset() <= max_offset, "offset {} > {}", menu.offset(), max_offset);
        assert!(menu.offset() <= menu.highlighted());
        assert!(menu.highlighted() < menu.offset() + menu.displayed_max());
    }

    #[test]
    fn test_displayed_max_from_viewport_height() {
        static TICKS: TickSignal = TickSignal::new();
        let menu = menu_with_items(&TICKS, 0);
        assert_eq!(menu.displayed_max(), 5);
    }

    #[test]
    fn test_scroll_down_makes_target_last_visible_row() {
        static TICKS: TickSignal = TickSignal::new();
        let mut menu = menu_with_items(&TICKS, 10);

        assert!(menu.set_highlighted(7));

        assert_eq!(menu.offset(), 3);
        assert_eq!(menu.highlighted(), 7);
        assert!(!menu.item_view(7).is_some_and(MenuItemView::is_hidden));
        assert!(menu.item_view(8).is_some_and(MenuItemView::is_hidden));
        assert!(menu.item_view(2).is_some_and(MenuItemView::is_hidden));
        // Row 7 sits at the bottom of the window
        assert_eq!(
            menu.item_view(7).map(|i| i.bounds().top_left.y),
            Some(32 + 4 * MENU_ITEM_HEIGHT_PX as i32)
        );
    }

    #[test]
    fn test_scroll_up_makes_target_first_visible_row() {
        static TICKS: TickSignal = TickSignal::new();
        let mut menu = menu_with_items(&TICKS, 10);

        menu.set_highlighted(9);
        assert_eq!(menu.offset(), 5);

        menu.set_highlighted(2);
        assert_eq!(menu.offset(), 2);
        assert_eq!(menu.item_view(2).map(|i| i.bounds().top_left.y), Some(32));
    }

    #[test]
    fn test_every_valid_index_keeps_invariants() {
        static TICKS: TickSignal = TickSignal::new();
        let mut menu = menu_with_items(&TICKS, 12);

        for target in [0, 11, 3, 4, 5, 10, 1, 6, 6, 0, 7] {
            assert!(menu.set_highlighted(target));
            assert_eq!(menu.highlighted(), target as usize);
            assert_eq!(highlighted_count(&menu), 1);
            assert_window_invariant(&menu);
        }
    }

    #[test]
    fn test_negative_index_is_rejected_without_side_effects() {
        static TICKS: TickSignal = TickSignal::new();
        let mut menu = menu_with_items(&TICKS, 10);
        menu.set_highlighted(6);

        assert!(!menu.set_highlighted(-1));
        assert!(!menu.set_highlighted(i32::MIN));

        assert_eq!(menu.highlighted(), 6);
        assert_eq!(menu.offset(), 2);
        assert_eq!(highlighted_count(&menu), 1);
    }

    #[test]
    fn test_index_past_end_clamps_to_last() {
        static TICKS: TickSignal = TickSignal::new();
        let mut menu = menu_with_items(&TICKS, 10);

        assert!(menu.set_highlighted(10));
        assert_eq!(menu.highlighted(), 9);
        assert!(menu.set_highlighted(1000));
        assert_eq!(menu.highlighted(), 9);
        assert_window_invariant(&menu);
    }

    #[test]
    fn test_empty_menu_rejects_highlight() {
        static TICKS: TickSignal = TickSignal::new();
        let mut menu = menu_with_items(&TICKS, 0);
        assert!(!menu.set_highlighted(0));
    }

    #[test]
    fn test_first_add_sets_highlight_and_more_flag() {
        static TICKS: TickSignal = TickSignal::new();
        let mut menu = menu_with_items(&TICKS, 0);

        menu.add_item(MenuItem::new("Only", Action::Custom(0)));
        assert_eq!(menu.highlighted(), 0);
        assert!(!menu.has_more());

        for i in 1..6 {
            menu.add_item(MenuItem::new(&format!("Item {i}"), Action::Custom(i)));
            assert_eq!(menu.highlighted(), 0, "appending keeps the highlight");
            assert_eq!(menu.has_more(), menu.len() > menu.displayed_max());
        }
        assert!(menu.has_more());
        assert!(menu.item_view(5).is_some_and(MenuItemView::is_hidden));
    }

    #[test]
    fn test_clear_resets_window() {
        static TICKS: TickSignal = TickSignal::new();
        let mut menu = menu_with_items(&TICKS, 10);
        menu.set_highlighted(8);

        menu.clear();
        assert!(menu.is_empty());
        assert_eq!(menu.offset(), 0);
        assert_eq!(menu.highlighted(), 0);
        assert!(!menu.has_more());

        menu.add_item(MenuItem::new("Again", Action::Custom(0)));
        assert!(menu.set_highlighted(0));
    }

    #[test]
    fn test_keys_move_and_select() {
        static TICKS: TickSignal = TickSignal::new();
        let mut menu = menu_with_items(&TICKS, 3).with_on_left(Action::GoBack);
        menu.on_focus();

        assert_eq!(menu.on_key(KeyEvent::Up), EventResult::NotHandled);
        assert_eq!(menu.on_key(KeyEvent::Down), EventResult::Handled);
        assert_eq!(menu.highlighted(), 1);
        assert_eq!(
            menu.on_key(KeyEvent::Select),
            EventResult::Action(Action::Custom(1))
        );
        assert_eq!(
            menu.on_key(KeyEvent::Right),
            EventResult::Action(Action::Custom(1))
        );
        assert_eq!(menu.on_key(KeyEvent::Left), EventResult::Action(Action::GoBack));
    }

    #[test]
    fn test_encoder_moves_by_delta() {
        static TICKS: TickSignal = TickSignal::new();
        let mut menu = menu_with_items(&TICKS, 10);

        menu.on_encoder(4);
        assert_eq!(menu.highlighted(), 4);
        menu.on_encoder(20);
        assert_eq!(menu.highlighted(), 9);
        menu.on_encoder(-3);
        assert_eq!(menu.highlighted(), 6);
        assert_window_invariant(&menu);
    }

    #[test]
    fn test_focus_and_blur() {
        static TICKS: TickSignal = TickSignal::new();
        let mut menu = menu_with_items(&TICKS, 3);
        assert_eq!(highlighted_count(&menu), 0);

        menu.on_focus();
        assert!(menu.item_view(0).is_some_and(MenuItemView::is_highlighted));

        menu.on_blur();
        assert_eq!(highlighted_count(&menu), 0);
    }

    #[test]
    fn test_keep_highlight_survives_blur() {
        static TICKS: TickSignal = TickSignal::new();
        let bounds = Rectangle::new(Point::zero(), Size::new(240, 120));
        let mut menu = MenuView::new(bounds, true, &TICKS);
        menu.add_item(MenuItem::new("A", Action::Custom(0)));
        assert!(menu.item_view(0).is_some_and(MenuItemView::is_highlighted));

        menu.on_focus();
        menu.on_blur();
        assert!(menu.item_view(0).is_some_and(MenuItemView::is_highlighted));
    }

    #[test]
    fn test_more_arrow_blinks_on_ticks() {
        static TICKS: TickSignal = TickSignal::new();
        let mut menu = menu_with_items(&TICKS, 8);
        assert!(menu.has_more());

        TICKS.tick();
        menu.update();
        assert!(menu.is_more_arrow_lit());

        TICKS.tick();
        menu.update();
        assert!(!menu.is_more_arrow_lit());

        // Scrolled to the bottom: nothing more to show, arrow stays dark
        menu.set_highlighted(7);
        assert!(!menu.has_more());
        TICKS.tick();
        TICKS.tick();
        menu.update();
        assert!(!menu.is_more_arrow_lit());
    }

    #[test]
    fn test_drop_releases_tick_subscription() {
        static TICKS: TickSignal = TickSignal::new();
        let menu = menu_with_items(&TICKS, 1);
        assert_eq!(TICKS.subscriber_count(), 1);

        drop(menu);
        assert_eq!(TICKS.subscriber_count(), 0);
    }

    #[test]
    fn test_touch_highlights_visible_rows_only() {
        static TICKS: TickSignal = TickSignal::new();
        let mut menu = menu_with_items(&TICKS, 10);

        // Third visible row
        let press = TouchEvent::Press(TouchPoint::new(50, 32 + 2 * 24 + 5));
        assert_eq!(menu.handle_touch(press), EventResult::Handled);
        assert_eq!(menu.highlighted(), 2);
        assert_eq!(menu.handle_touch(press), EventResult::Action(Action::Custom(2)));

        // Below the window where hidden rows 5.. would be
        let press = TouchEvent::Press(TouchPoint::new(50, 32 + 6 * 24));
        assert_eq!(menu.handle_touch(press), EventResult::NotHandled);
        assert_eq!(menu.highlighted(), 2);
    }

    #[test]
    fn test_draw_paints_only_visible_rows() {
        static TICKS: TickSignal = TickSignal::new();
        let mut menu = menu_with_items(&TICKS, 10);
        menu.on_focus();
        menu.set_highlighted(1);

        let mut display = TestDisplay::new();
        menu.draw(&mut display).ok();

        // Highlighted row is filled with the item colour (white)
        assert_eq!(display.pixel(2, 32 + 24 + 1), Some(WHITE));
        // Non highlighted row keeps the black background
        assert_eq!(display.pixel(2, 32 + 1), Some(BLACK));
        // Nothing painted below the menu bounds
        assert_eq!(display.pixel(2, 32 + 5 * 24 + 2), None);

        menu.mark_clean();
        assert!(!menu.is_dirty());
    }
}
