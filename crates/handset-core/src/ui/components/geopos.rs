//! Altitude and latitude/longitude entry in degrees, minutes and seconds

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::mono_font::iso_8859_1::FONT_8X13;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Baseline, Text};
use log::debug;

use super::number_field::NumberField;
use crate::ui::core::{Drawable, EncoderEvent, KeyEvent};
use crate::ui::styling::Theme;
use crate::ui::{CHAR_WIDTH_PX, TEXT_ROW_HEIGHT_PX};

/// Altitude range in feet
pub const ALTITUDE_RANGE_FT: (i32, i32) = (-1000, 50000);

/// Altitude change per step in feet
pub const ALTITUDE_STEP_FT: i32 = 250;

/// Width of the widget in character cells
const WIDTH_CHARS: u32 = 30;

/// Number of editable fields: altitude plus d/m/s for lat and lon
const FIELD_COUNT: usize = 7;

/// Where a [`PositionChange`] originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateSource {
    /// The user stepped one of the fields
    UserEdited,
    /// The owner pushed a new value with [`GeoPos::sync_from`]
    ProgrammaticSync,
}

/// The position held by a [`GeoPos`] after a change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionChange {
    pub altitude: i32,
    pub lat: f64,
    pub lon: f64,
    pub source: UpdateSource,
}

/// Outcome of feeding an input event to a [`GeoPos`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeoPosInput {
    /// Not consumed; includes moving focus past the first or last field
    NotHandled,
    /// Consumed without changing the position (focus moved)
    Handled,
    /// A field changed
    Changed(PositionChange),
}

/// One angle split into degrees, minutes and seconds fields.
///
/// The hemisphere is kept as a separate flag because the degrees field alone
/// cannot carry the sign of values between -1 and 0.
#[derive(Debug, Clone)]
pub struct CoordinateFields {
    degrees: NumberField,
    minutes: NumberField,
    seconds: NumberField,
    negative: bool,
}

impl CoordinateFields {
    /// Fields for an angle limited to `±max_degrees`, laid out on one text
    /// row starting at `origin`.
    pub fn new(origin: Point, max_degrees: i32) -> Self {
        let col = |c: i32| origin + Point::new(c * CHAR_WIDTH_PX as i32, 0);
        Self {
            degrees: NumberField::new(col(5), 4, (-max_degrees, max_degrees), 1),
            minutes: NumberField::new(col(10), 2, (0, 59), 1),
            seconds: NumberField::new(col(13), 2, (0, 59), 1),
            negative: false,
        }
    }

    /// Split `value` into its parts. Minutes and seconds are truncated.
    pub fn set(&mut self, value: f64) {
        let magnitude = libm::fabs(value);
        let degrees = libm::trunc(magnitude) as i32;
        let minutes = (libm::floor(magnitude * 60.0) as i64 % 60) as i32;
        let seconds = (libm::floor(magnitude * 3600.0) as i64 % 60) as i32;

        self.negative = value < 0.0;
        self.degrees
            .set_value(if self.negative { -degrees } else { degrees });
        self.minutes.set_value(minutes);
        self.seconds.set_value(seconds);
        self.degrees.set_negative_zero(self.negative);
    }

    /// Recomposed value, `sign * (|deg| + min/60 + sec/3600)`
    pub fn value(&self) -> f64 {
        let magnitude = self.degrees.value().unsigned_abs() as f64
            + self.minutes.value() as f64 / 60.0
            + self.seconds.value() as f64 / 3600.0;
        if self.negative { -magnitude } else { magnitude }
    }

    pub fn degrees(&self) -> i32 {
        self.degrees.value()
    }

    pub fn minutes(&self) -> i32 {
        self.minutes.value()
    }

    pub fn seconds(&self) -> i32 {
        self.seconds.value()
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    fn fields(&self) -> [&NumberField; 3] {
        [&self.degrees, &self.minutes, &self.seconds]
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut NumberField> {
        match index {
            0 => Some(&mut self.degrees),
            1 => Some(&mut self.minutes),
            2 => Some(&mut self.seconds),
            _ => None,
        }
    }

    /// Step one part; the hemisphere follows the sign of the degrees.
    fn step(&mut self, index: usize, steps: i32) -> bool {
        let changed = self
            .field_mut(index)
            .is_some_and(|field| field.step_by(steps));

        if changed && index == 0 {
            match self.degrees.value() {
                d if d < 0 => self.negative = true,
                d if d > 0 => self.negative = false,
                _ => {}
            }
            self.degrees.set_negative_zero(self.negative);
        }
        changed
    }
}

/// Altitude plus latitude and longitude entry, three text rows high.
///
/// ```text
///  Alt:   12500 feet
///  Lat:   -33°51'54"  S
///  Lon:   151°12'31"  E
/// ```
///
/// Left/Right walk through the seven fields and Up/Down (or the encoder)
/// step the focused one. Edits are returned to the caller as
/// [`PositionChange`]s tagged [`UpdateSource::UserEdited`]; values pushed in
/// by the owner through [`GeoPos::sync_from`] come back tagged
/// [`UpdateSource::ProgrammaticSync`] so the owner can tell them apart.
pub struct GeoPos {
    position: Point,
    altitude: NumberField,
    lat: CoordinateFields,
    lon: CoordinateFields,
    focused: Option<usize>,
    read_only: bool,
    theme: Theme,
    dirty: bool,
}

impl GeoPos {
    pub fn new(position: Point) -> Self {
        let row = |r: i32| position + Point::new(0, r * TEXT_ROW_HEIGHT_PX as i32);
        let mut geopos = Self {
            position,
            altitude: NumberField::new(
                row(0) + Point::new(5 * CHAR_WIDTH_PX as i32, 0),
                7,
                ALTITUDE_RANGE_FT,
                ALTITUDE_STEP_FT,
            ),
            lat: CoordinateFields::new(row(1), 90),
            lon: CoordinateFields::new(row(2), 180),
            focused: None,
            read_only: false,
            theme: Theme::default(),
            dirty: true,
        };

        geopos.set_altitude(0);
        geopos.set_lat(0.0);
        geopos.set_lon(0.0);
        geopos
    }

    pub fn altitude(&self) -> i32 {
        self.altitude.value()
    }

    /// Set the altitude in feet, clamped to [`ALTITUDE_RANGE_FT`].
    pub fn set_altitude(&mut self, altitude: i32) {
        self.altitude.set_value(altitude);
    }

    pub fn lat(&self) -> f64 {
        self.lat.value()
    }

    pub fn set_lat(&mut self, lat: f64) {
        self.lat.set(lat);
    }

    pub fn lon(&self) -> f64 {
        self.lon.value()
    }

    pub fn set_lon(&mut self, lon: f64) {
        self.lon.set(lon);
    }

    pub fn lat_fields(&self) -> &CoordinateFields {
        &self.lat
    }

    pub fn lon_fields(&self) -> &CoordinateFields {
        &self.lon
    }

    /// Push a position computed elsewhere (map pans) into the fields.
    pub fn sync_from(&mut self, altitude: i32, lat: f64, lon: f64) -> PositionChange {
        self.set_altitude(altitude);
        self.set_lat(lat);
        self.set_lon(lon);
        self.change(UpdateSource::ProgrammaticSync)
    }

    fn change(&self, source: UpdateSource) -> PositionChange {
        PositionChange {
            altitude: self.altitude(),
            lat: self.lat(),
            lon: self.lon(),
            source,
        }
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
        if read_only {
            self.blur();
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Focus the altitude field. Returns `false` when read-only.
    pub fn focus(&mut self) -> bool {
        self.focus_field(0)
    }

    /// Focus the last field (seconds of longitude).
    pub fn focus_last(&mut self) -> bool {
        self.focus_field(FIELD_COUNT - 1)
    }

    fn focus_field(&mut self, index: usize) -> bool {
        if self.read_only || index >= FIELD_COUNT {
            return false;
        }
        if let Some(previous) = self.focused.and_then(|i| self.field_mut(i)) {
            previous.set_focused(false);
        }
        if let Some(field) = self.field_mut(index) {
            field.set_focused(true);
        }
        self.focused = Some(index);
        true
    }

    pub fn blur(&mut self) {
        if let Some(field) = self.focused.take().and_then(|i| self.field_mut(i)) {
            field.set_focused(false);
        }
    }

    /// Index of the focused field: 0 altitude, 1..=3 lat d/m/s, 4..=6 lon d/m/s
    pub fn focused_field(&self) -> Option<usize> {
        self.focused
    }

    pub fn has_focus(&self) -> bool {
        self.focused.is_some()
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut NumberField> {
        match index {
            0 => Some(&mut self.altitude),
            1..=3 => self.lat.field_mut(index - 1),
            4..=6 => self.lon.field_mut(index - 4),
            _ => None,
        }
    }

    fn step_focused(&mut self, steps: i32) -> GeoPosInput {
        let Some(index) = self.focused else {
            return GeoPosInput::NotHandled;
        };

        let changed = match index {
            0 => self.altitude.step_by(steps),
            1..=3 => self.lat.step(index - 1, steps),
            _ => self.lon.step(index - 4, steps),
        };

        if changed {
            let change = self.change(UpdateSource::UserEdited);
            debug!(
                "Position edited: {} ft {:.5} {:.5}",
                change.altitude, change.lat, change.lon
            );
            GeoPosInput::Changed(change)
        } else {
            GeoPosInput::Handled
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> GeoPosInput {
        let Some(index) = self.focused else {
            return GeoPosInput::NotHandled;
        };

        match key {
            KeyEvent::Up => self.step_focused(1),
            KeyEvent::Down => self.step_focused(-1),
            KeyEvent::Right if index + 1 < FIELD_COUNT => {
                self.focus_field(index + 1);
                GeoPosInput::Handled
            }
            KeyEvent::Left if index > 0 => {
                self.focus_field(index - 1);
                GeoPosInput::Handled
            }
            KeyEvent::Left | KeyEvent::Right | KeyEvent::Select => GeoPosInput::NotHandled,
        }
    }

    pub fn on_encoder(&mut self, delta: EncoderEvent) -> GeoPosInput {
        self.step_focused(delta)
    }

    fn all_fields(&self) -> [&NumberField; FIELD_COUNT] {
        let [lat_d, lat_m, lat_s] = self.lat.fields();
        let [lon_d, lon_m, lon_s] = self.lon.fields();
        [&self.altitude, lat_d, lat_m, lat_s, lon_d, lon_m, lon_s]
    }

    fn draw_label<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
        row: i32,
        col: i32,
        text: &str,
    ) -> Result<(), D::Error> {
        let style = self.theme.label.with_font(&FONT_8X13);
        Text::with_baseline(
            text,
            self.position
                + Point::new(
                    col * CHAR_WIDTH_PX as i32,
                    row * TEXT_ROW_HEIGHT_PX as i32 + 1,
                ),
            style.text_style(),
            Baseline::Top,
        )
        .draw(display)?;
        Ok(())
    }
}

impl Drawable for GeoPos {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        display.fill_solid(&self.bounds(), self.theme.palette.background)?;

        self.draw_label(display, 0, 0, "Alt:")?;
        self.draw_label(display, 0, 13, "feet")?;

        for (row, name, coordinate, hemispheres) in [
            (1, "Lat:", &self.lat, ("N", "S")),
            (2, "Lon:", &self.lon, ("E", "W")),
        ] {
            self.draw_label(display, row, 0, name)?;
            self.draw_label(display, row, 9, "\u{b0}")?;
            self.draw_label(display, row, 12, "'")?;
            self.draw_label(display, row, 15, "\"")?;
            let hemisphere = if coordinate.is_negative() {
                hemispheres.1
            } else {
                hemispheres.0
            };
            self.draw_label(display, row, 18, hemisphere)?;
        }

        for field in self.all_fields() {
            field.draw(display, &self.theme.text)?;
        }

        Ok(())
    }

    fn bounds(&self) -> Rectangle {
        Rectangle::new(
            self.position,
            Size::new(WIDTH_CHARS * CHAR_WIDTH_PX, 3 * TEXT_ROW_HEIGHT_PX),
        )
    }

    fn is_dirty(&self) -> bool {
        self.dirty || self.all_fields().iter().any(|field| field.is_dirty())
    }

    fn mark_clean(&mut self) {
        self.dirty = false;
        for index in 0..FIELD_COUNT {
            if let Some(field) = self.field_mut(index) {
                field.mark_clean();
            }
        }
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
