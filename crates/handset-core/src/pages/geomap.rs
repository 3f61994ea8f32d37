//! Map page: position readout above a live world map
//!
//! Two flavours share the layout:
//!
//! - **display**: read-only position of a tracked object with a bearing
//!   arrow on the map and an optional tag (callsign) overlay.
//! - **prompt**: editable position with a crosshair on the map and an OK
//!   button. Confirming hands the chosen position to a callback.
//!
//! Edits in the position fields move the map; presses on the map pan it and
//! push the new position back into the fields.

use alloc::boxed::Box;

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Baseline, Text};
use log::{debug, warn};

use crate::pages::Page;
use crate::pages::constants::{
    BUTTON_HEIGHT_PX, BUTTON_MARGIN_PX, BUTTON_WIDTH_PX, GEOPOS_HEIGHT_PX,
};
use crate::storage::MapStorage;
use crate::ui::components::{
    Button, GeoMap, GeoMapMode, GeoPos, GeoPosInput, PanDelta, PositionChange, UpdateSource,
};
use crate::ui::core::{
    Action, Drawable, EncoderEvent, EventResult, KeyEvent, Modal, ModalKind, PageId, TouchEvent,
    Touchable,
};
use crate::ui::styling::Theme;

/// Dialog raised when the map file cannot be used
pub const NO_MAP_MODAL: Modal = Modal {
    title: "No map",
    message: "No world_map.bin file in\n/ADSB/ directory",
    kind: ModalKind::Abort,
};

/// Called with altitude (feet), latitude and longitude when a prompt is confirmed
pub type PositionCallback = Box<dyn FnMut(i32, f64, f64)>;

pub struct GeoMapView<S: MapStorage> {
    bounds: Rectangle,
    mode: GeoMapMode,
    geopos: GeoPos,
    map: GeoMap<S>,
    ok: Option<Button>,
    altitude: i32,
    lat: f64,
    lon: f64,
    tag: Option<heapless::String<16>>,
    file_error: bool,
    on_done: Option<PositionCallback>,
    theme: Theme,
    dirty: bool,
}

impl<S: MapStorage> GeoMapView<S> {
    /// Read-only view of a tracked object heading `angle` degrees from north.
    #[allow(clippy::too_many_arguments)]
    pub fn display(
        bounds: Rectangle,
        storage: S,
        map_path: &str,
        tag: Option<&str>,
        altitude: i32,
        lat: f64,
        lon: f64,
        angle: f32,
    ) -> Self {
        let mut view = Self::build(
            bounds,
            storage,
            map_path,
            GeoMapMode::Display,
            altitude,
            lat,
            lon,
        );
        view.geopos.set_read_only(true);
        view.map.set_angle(angle);
        view.tag = tag.map(|tag| {
            let mut text = heapless::String::new();
            for c in tag.chars() {
                if text.push(c).is_err() {
                    break;
                }
            }
            text
        });
        view
    }

    /// Editable position starting at the given one. `on_done` runs when OK
    /// is pressed.
    pub fn prompt(
        bounds: Rectangle,
        storage: S,
        map_path: &str,
        altitude: i32,
        lat: f64,
        lon: f64,
        on_done: PositionCallback,
    ) -> Self {
        let mut view = Self::build(
            bounds,
            storage,
            map_path,
            GeoMapMode::Prompt,
            altitude,
            lat,
            lon,
        );

        let map_bottom = view.map.bounds().bottom_right().map_or(0, |p| p.y + 1);
        let ok_bounds = Rectangle::new(
            Point::new(
                bounds.top_left.x + (bounds.size.width - BUTTON_WIDTH_PX) as i32 / 2,
                map_bottom + BUTTON_MARGIN_PX as i32,
            ),
            Size::new(BUTTON_WIDTH_PX, BUTTON_HEIGHT_PX),
        );
        view.ok = Some(Button::new(ok_bounds, "OK", Action::GoBack));
        view.on_done = Some(on_done);
        view
    }

    fn build(
        bounds: Rectangle,
        storage: S,
        map_path: &str,
        mode: GeoMapMode,
        altitude: i32,
        lat: f64,
        lon: f64,
    ) -> Self {
        let below_map = match mode {
            GeoMapMode::Display => 0,
            GeoMapMode::Prompt => BUTTON_HEIGHT_PX + 2 * BUTTON_MARGIN_PX,
        };
        let map_bounds = Rectangle::new(
            bounds.top_left + Point::new(0, GEOPOS_HEIGHT_PX as i32),
            Size::new(
                bounds.size.width,
                bounds
                    .size
                    .height
                    .saturating_sub(GEOPOS_HEIGHT_PX + below_map),
            ),
        );

        let mut map = GeoMap::new(map_bounds, storage);
        map.set_mode(mode);
        let file_error = match map.init(map_path) {
            Ok(()) => false,
            Err(e) => {
                warn!("Map page without map: {}", e);
                true
            }
        };
        map.move_to(lon, lat);

        let mut geopos = GeoPos::new(bounds.top_left);
        let synced = geopos.sync_from(altitude, lat, lon);

        Self {
            bounds,
            mode,
            geopos,
            map,
            ok: None,
            altitude: synced.altitude,
            lat,
            lon,
            tag: None,
            file_error,
            on_done: None,
            theme: Theme::default(),
            dirty: true,
        }
    }

    /// Altitude in feet, latitude and longitude in degrees
    pub fn position(&self) -> (i32, f64, f64) {
        (self.altitude, self.lat, self.lon)
    }

    pub fn mode(&self) -> GeoMapMode {
        self.mode
    }

    pub fn has_file_error(&self) -> bool {
        self.file_error
    }

    pub fn map(&self) -> &GeoMap<S> {
        &self.map
    }

    pub fn geopos(&self) -> &GeoPos {
        &self.geopos
    }

    pub fn is_ok_focused(&self) -> bool {
        self.ok.as_ref().is_some_and(|ok| ok.is_focused())
    }

    fn set_ok_focused(&mut self, focused: bool) {
        if let Some(ok) = self.ok.as_mut() {
            ok.set_focused(focused);
        }
    }

    /// React to edits made in the position fields. Syncs pushed in by the
    /// page itself are ignored.
    fn apply_position_change(&mut self, change: PositionChange) -> bool {
        if change.source != UpdateSource::UserEdited {
            return false;
        }
        self.altitude = change.altitude;
        self.lat = change.lat;
        self.lon = change.lon;
        self.map.move_to(self.lon, self.lat);
        true
    }

    fn pan(&mut self, delta: PanDelta) {
        self.lat = (self.lat + delta.lat).clamp(-90.0, 90.0);
        self.lon = (self.lon + delta.lon).clamp(-180.0, 180.0);
        debug!("Pan map to {:.4} {:.4}", self.lat, self.lon);

        self.geopos.sync_from(self.altitude, self.lat, self.lon);
        self.map.move_to(self.lon, self.lat);
    }

    fn confirm(&mut self) -> Option<Action> {
        debug!(
            "Position confirmed: {} ft {:.5} {:.5}",
            self.altitude, self.lat, self.lon
        );
        if let Some(on_done) = self.on_done.as_mut() {
            on_done(self.altitude, self.lat, self.lon);
        }
        Some(Action::GoBack)
    }

    fn handle_geopos_input(&mut self, input: GeoPosInput) -> bool {
        match input {
            GeoPosInput::Changed(change) => {
                self.apply_position_change(change);
                true
            }
            GeoPosInput::Handled => true,
            GeoPosInput::NotHandled => false,
        }
    }

    fn draw_tag<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        if let Some(tag) = &self.tag {
            Text::with_baseline(
                tag,
                self.map.bounds().top_left + Point::new(4, 4),
                self.theme.text.text_style(),
                Baseline::Top,
            )
            .draw(display)?;
        }
        Ok(())
    }
}

impl<S: MapStorage> Page for GeoMapView<S> {
    fn id(&self) -> PageId {
        match self.mode {
            GeoMapMode::Display => PageId::GeoMapDisplay,
            GeoMapMode::Prompt => PageId::GeoMapPrompt,
        }
    }

    fn title(&self) -> &str {
        match self.mode {
            GeoMapMode::Display => "Map",
            GeoMapMode::Prompt => "Pick position",
        }
    }

    fn on_activate(&mut self) -> Option<Action> {
        if self.file_error {
            return Some(Action::ShowModal(NO_MAP_MODAL));
        }

        self.dirty = true;
        self.map.invalidate();
        if self.mode == GeoMapMode::Prompt && !self.geopos.has_focus() && !self.is_ok_focused() {
            self.geopos.focus();
        }
        None
    }

    fn handle_touch(&mut self, event: TouchEvent) -> Option<Action> {
        if let Some(ok) = self.ok.as_mut() {
            match ok.handle_touch(event) {
                EventResult::Action(_) => return self.confirm(),
                EventResult::Handled => return None,
                EventResult::NotHandled => {}
            }
        }

        if let Some(delta) = self.map.on_touch(event) {
            self.pan(delta);
        }
        None
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if self.is_ok_focused() {
            return match key {
                KeyEvent::Select => self.confirm(),
                KeyEvent::Left => {
                    self.set_ok_focused(false);
                    self.geopos.focus_last();
                    None
                }
                _ => None,
            };
        }

        let input = self.geopos.on_key(key);
        if self.handle_geopos_input(input) {
            return None;
        }

        match key {
            KeyEvent::Right if self.ok.is_some() && self.geopos.has_focus() => {
                self.geopos.blur();
                self.set_ok_focused(true);
                None
            }
            KeyEvent::Left => Some(Action::GoBack),
            _ => None,
        }
    }

    fn handle_encoder(&mut self, delta: EncoderEvent) -> Option<Action> {
        let input = self.geopos.on_encoder(delta);
        self.handle_geopos_input(input);
        None
    }

    fn draw_page<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        if self.dirty {
            self.geopos.mark_dirty();
            self.map.invalidate();
            if let Some(ok) = self.ok.as_mut() {
                ok.mark_dirty();
            }

            // Strip between the map and the bottom edge
            let map_bottom = self.map.bounds().bottom_right().map_or(0, |p| p.y + 1);
            let page_bottom = self.bounds.top_left.y + self.bounds.size.height as i32;
            if page_bottom > map_bottom {
                let strip = Rectangle::new(
                    Point::new(self.bounds.top_left.x, map_bottom),
                    Size::new(self.bounds.size.width, (page_bottom - map_bottom) as u32),
                );
                display.fill_solid(&strip, self.theme.palette.background)?;
            }
        }

        if self.geopos.is_dirty() {
            self.geopos.draw(display)?;
        }

        let repaint_map = self.map.is_dirty();
        self.map.draw(display)?;
        if repaint_map && self.mode == GeoMapMode::Display {
            self.draw_tag(display)?;
        }

        if let Some(ok) = &self.ok {
            if ok.is_dirty() {
                ok.draw(display)?;
            }
        }

        Ok(())
    }

    fn bounds(&self) -> Rectangle {
        self.bounds
    }

    fn is_dirty(&self) -> bool {
        self.dirty
            || self.geopos.is_dirty()
            || self.map.is_dirty()
            || self.ok.as_ref().is_some_and(|ok| ok.is_dirty())
    }

    fn mark_clean(&mut self) {
        self.dirty = false;
        self.geopos.mark_clean();
        if let Some(ok) = self.ok.as_mut() {
            ok.mark_clean();
        }
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::WORLD_MAP_PATH;
    use crate::test_utils::{MemoryMapStorage, TestDisplay, world_map_bytes};
    use crate::ui::core::TouchPoint;
    use alloc::rc::Rc;
    use core::cell::Cell;

    fn screen() -> Rectangle {
        Rectangle::new(Point::zero(), Size::new(240, 320))
    }

    /// 1000x500 map: 0.36 degrees per pixel both ways
    fn storage() -> MemoryMapStorage {
        MemoryMapStorage::new().with_file(
            WORLD_MAP_PATH,
            world_map_bytes(1000, 500, |x, y| x ^ y),
        )
    }

    fn prompt_view(result: Rc<Cell<Option<(i32, f64, f64)>>>) -> GeoMapView<MemoryMapStorage> {
        GeoMapView::prompt(
            screen(),
            storage(),
            WORLD_MAP_PATH,
            0,
            0.0,
            0.0,
            Box::new(move |alt, lat, lon| result.set(Some((alt, lat, lon)))),
        )
    }

    #[test]
    fn test_missing_map_raises_abort_modal() {
        let mut view = GeoMapView::display(
            screen(),
            MemoryMapStorage::new(),
            WORLD_MAP_PATH,
            None,
            1000,
            10.0,
            20.0,
            0.0,
        );
        assert!(view.has_file_error());

        match view.on_activate() {
            Some(Action::ShowModal(modal)) => {
                assert_eq!(modal.title, "No map");
                assert_eq!(modal.message, "No world_map.bin file in\n/ADSB/ directory");
                assert_eq!(modal.kind, ModalKind::Abort);
            }
            other => panic!("expected the missing map modal, got {:?}", other),
        }
    }

    #[test]
    fn test_layout() {
        let view = prompt_view(Rc::new(Cell::new(None)));
        assert_eq!(
            view.map().bounds(),
            Rectangle::new(Point::new(0, 48), Size::new(240, 232))
        );
        assert_eq!(
            view.ok.as_ref().map(|ok| ok.bounds()),
            Some(Rectangle::new(Point::new(84, 284), Size::new(72, 32)))
        );

        let display = GeoMapView::display(
            screen(),
            storage(),
            WORLD_MAP_PATH,
            Some("AAL123"),
            0,
            0.0,
            0.0,
            90.0,
        );
        assert_eq!(
            display.map().bounds(),
            Rectangle::new(Point::new(0, 48), Size::new(240, 272))
        );
        assert!(display.ok.is_none());
    }

    #[test]
    fn test_prompt_confirm_reports_position() {
        let result = Rc::new(Cell::new(None));
        let mut view = prompt_view(result.clone());
        assert_eq!(view.on_activate(), None);
        assert_eq!(view.geopos().focused_field(), Some(0));

        // Altitude up one step
        assert_eq!(view.handle_key(KeyEvent::Up), None);
        assert_eq!(view.position().0, 250);

        for _ in 0..6 {
            assert_eq!(view.handle_key(KeyEvent::Right), None);
        }
        assert_eq!(view.geopos().focused_field(), Some(6));

        // Past the last field onto OK
        assert_eq!(view.handle_key(KeyEvent::Right), None);
        assert!(view.is_ok_focused());
        assert!(!view.geopos().has_focus());

        assert_eq!(view.handle_key(KeyEvent::Select), Some(Action::GoBack));
        assert_eq!(result.get(), Some((250, 0.0, 0.0)));
    }

    #[test]
    fn test_left_on_ok_returns_to_last_field() {
        let mut view = prompt_view(Rc::new(Cell::new(None)));
        view.on_activate();
        for _ in 0..7 {
            view.handle_key(KeyEvent::Right);
        }
        assert!(view.is_ok_focused());

        assert_eq!(view.handle_key(KeyEvent::Left), None);
        assert!(!view.is_ok_focused());
        assert_eq!(view.geopos().focused_field(), Some(6));

        // Reactivation keeps the field focus
        view.on_activate();
        assert_eq!(view.geopos().focused_field(), Some(6));
    }

    #[test]
    fn test_left_past_first_field_goes_back() {
        let result = Rc::new(Cell::new(None));
        let mut view = prompt_view(result.clone());
        view.on_activate();

        assert_eq!(view.handle_key(KeyEvent::Left), Some(Action::GoBack));
        assert_eq!(result.get(), None);
    }

    #[test]
    fn test_user_edit_moves_map() {
        let mut view = prompt_view(Rc::new(Cell::new(None)));
        view.on_activate();
        // 500 - 120
        assert_eq!(view.map().position().0, 380);

        // Longitude degrees
        for _ in 0..4 {
            view.handle_key(KeyEvent::Right);
        }
        assert_eq!(view.geopos().focused_field(), Some(4));
        view.handle_encoder(1);

        assert_eq!(view.position().2, 1.0);
        // 380 + 1 / 0.36
        assert_eq!(view.map().position().0, 382);
    }

    #[test]
    fn test_pan_syncs_fields_and_clamps_latitude() {
        let mut view = GeoMapView::prompt(
            screen(),
            storage(),
            WORLD_MAP_PATH,
            500,
            89.0,
            10.0,
            Box::new(|_, _, _| {}),
        );
        view.on_activate();

        // Viewport centre is (120, 164); 20 px right is +3.6 degrees
        assert_eq!(
            view.handle_touch(TouchEvent::Press(TouchPoint::new(140, 164))),
            None
        );
        let (altitude, lat, lon) = view.position();
        assert_eq!(altitude, 500);
        assert_eq!(lat, 89.0);
        assert!(libm::fabs(lon - 13.6) < 1e-9);
        assert_eq!(view.geopos().lon_fields().degrees(), 13);
        assert_eq!(view.geopos().lon_fields().minutes(), 36);

        // 114 px up asks for +20.52 degrees
        view.handle_touch(TouchEvent::Press(TouchPoint::new(120, 50)));
        assert_eq!(view.position().1, 90.0);
        assert_eq!(view.geopos().lat(), 90.0);
        assert_eq!(view.map().position().1, 0);

        // Field focus is untouched by pans
        assert_eq!(view.geopos().focused_field(), Some(0));
    }

    #[test]
    fn test_touch_on_ok_confirms() {
        let result = Rc::new(Cell::new(None));
        let mut view = prompt_view(result.clone());
        view.on_activate();

        let press = TouchEvent::Press(TouchPoint::new(120, 300));
        assert_eq!(view.handle_touch(press), Some(Action::GoBack));
        assert_eq!(result.get(), Some((0, 0.0, 0.0)));
        assert_eq!(
            view.handle_touch(TouchEvent::Release(TouchPoint::new(120, 300))),
            None
        );
    }

    #[test]
    fn test_display_is_read_only() {
        let mut view = GeoMapView::display(
            screen(),
            storage(),
            WORLD_MAP_PATH,
            Some("N12345"),
            12500,
            -33.865,
            151.209,
            45.0,
        );
        assert_eq!(view.id(), PageId::GeoMapDisplay);
        assert_eq!(view.on_activate(), None);
        assert!(view.geopos().is_read_only());
        assert!(!view.geopos().has_focus());

        assert_eq!(view.handle_key(KeyEvent::Up), None);
        assert_eq!(view.handle_encoder(3), None);
        assert_eq!(view.position(), (12500, -33.865, 151.209));
        assert_eq!(view.handle_key(KeyEvent::Left), Some(Action::GoBack));
    }

    #[test]
    fn test_draw_streams_map_once() {
        let mut view = prompt_view(Rc::new(Cell::new(None)));
        view.on_activate();
        let mut display = TestDisplay::new();

        assert!(view.is_dirty());
        view.draw_page(&mut display).ok();
        view.mark_clean();
        assert_eq!(display.map_rows(240), 232);
        assert!(display.pixel(120, 300).is_some());
        assert!(display.pixel(0, 0).is_some());
        assert!(!view.is_dirty());

        // A pan repaints the map only
        view.handle_touch(TouchEvent::Press(TouchPoint::new(140, 164)));
        assert!(view.is_dirty());
        view.draw_page(&mut display).ok();
        view.mark_clean();
        assert_eq!(display.map_rows(240), 2 * 232);
    }
}
