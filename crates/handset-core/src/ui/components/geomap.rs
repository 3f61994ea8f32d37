//! World map viewport streamed row by row from a raster file
//!
//! The map file is a plain equirectangular ("Plate Carrée") raster:
//!
//! | Offset | Size          | Content                      |
//! |--------|---------------|------------------------------|
//! | 0      | 2             | width in pixels, u16 LE      |
//! | 2      | 2             | height in pixels, u16 LE     |
//! | 4      | 2·width·height| RGB565 LE pixels, row major  |
//!
//! Longitude -180..180 spans the width and latitude 90..-90 spans the height
//! (north up), so one pixel covers `180 / (width / 2)` degrees of longitude
//! and `90 / (height / 2)` degrees of latitude.
//!
//! The full raster never fits in RAM; every repaint seeks to each visible
//! row and pushes it straight to the display. Repaints are skipped while the
//! scroll position is unchanged.

use alloc::vec;
use alloc::vec::Vec;

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use log::{info, warn};
use thiserror_no_std::Error;

use crate::storage::{MAP_HEADER_SIZE, MapStorage, StorageError};
use crate::ui::core::{TouchEvent, TouchPoint};
use crate::ui::styling::{BLACK, RED};

/// Half the length of the prompt crosshair bars
const CROSSHAIR_HALF_PX: i32 = 16;

/// Size of the outermost bearing arrow outline
const BEARING_SIZE_PX: i32 = 16;

/// Outlines drawn for the bearing arrow, each one pixel smaller
const BEARING_PASSES: i32 = 3;

/// Half the opening angle of the bearing arrow's tail
const BEARING_TAIL_DEG: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeoMapError {
    /// The map file could not be opened
    #[error("Map unavailable: {0}")]
    MapUnavailable(StorageError),

    /// Header dimensions are zero, smaller than the viewport or too large
    /// to address
    #[error("Invalid map header")]
    InvalidHeader,

    /// The file ends before the 4-byte header
    #[error("Map header truncated")]
    ShortHeader,
}

/// What the map overlays on top of the raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoMapMode {
    /// Bearing arrow at the centre, showing a tracked object's heading
    Display,
    /// Red crosshair at the centre, for picking a position
    Prompt,
}

/// Geographic offset requested by a touch on the map, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanDelta {
    pub lon: f64,
    pub lat: f64,
}

/// Map viewport over a raster file read through `S`.
pub struct GeoMap<S: MapStorage> {
    bounds: Rectangle,
    storage: S,
    mode: GeoMapMode,
    /// Bearing in degrees, clockwise from north
    angle: f32,
    lon: f64,
    lat: f64,
    map_width: u32,
    map_height: u32,
    map_center: Point,
    lon_ratio: f64,
    lat_ratio: f64,
    x_pos: i32,
    y_pos: i32,
    /// Scroll position of the last complete paint
    painted: Option<(i32, i32)>,
    row_buffer: Vec<u8>,
    ready: bool,
}

impl<S: MapStorage> GeoMap<S> {
    pub fn new(bounds: Rectangle, storage: S) -> Self {
        Self {
            bounds,
            storage,
            mode: GeoMapMode::Display,
            angle: 0.0,
            lon: 0.0,
            lat: 0.0,
            map_width: 0,
            map_height: 0,
            map_center: Point::zero(),
            lon_ratio: 0.0,
            lat_ratio: 0.0,
            x_pos: 0,
            y_pos: 0,
            painted: None,
            row_buffer: Vec::new(),
            ready: false,
        }
    }

    /// Open the map at `path` and read its header.
    pub fn init(&mut self, path: &str) -> Result<(), GeoMapError> {
        self.ready = false;
        self.painted = None;

        self.storage.open(path).map_err(|e| {
            warn!("Map {} unavailable: {}", path, e);
            GeoMapError::MapUnavailable(e)
        })?;

        let mut header = [0u8; MAP_HEADER_SIZE as usize];
        let n = self
            .storage
            .read_full(&mut header)
            .map_err(GeoMapError::MapUnavailable)?;
        if n < header.len() {
            return Err(GeoMapError::ShortHeader);
        }

        let width = u16::from_le_bytes([header[0], header[1]]) as u32;
        let height = u16::from_le_bytes([header[2], header[3]]) as u32;
        let view = self.bounds.size;
        if width < 2 || height < 2 || width < view.width || height < view.height {
            warn!("Map {} has unusable size {}x{}", path, width, height);
            return Err(GeoMapError::InvalidHeader);
        }
        // Row offsets are seeked as u32
        let file_len = MAP_HEADER_SIZE as u64 + 2 * width as u64 * height as u64;
        if file_len > u32::MAX as u64 {
            warn!("Map {} at {}x{} is too large to address", path, width, height);
            return Err(GeoMapError::InvalidHeader);
        }

        self.map_width = width;
        self.map_height = height;
        self.map_center = Point::new((width / 2) as i32, (height / 2) as i32);
        self.lon_ratio = 180.0 / self.map_center.x as f64;
        self.lat_ratio = 90.0 / self.map_center.y as f64;
        self.row_buffer = vec![0; 2 * view.width as usize];
        self.ready = true;

        info!("Loaded {}x{} world map from {}", width, height, path);
        self.move_to(self.lon, self.lat);
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Centre the viewport on `lon`, `lat` (degrees), as far as the raster
    /// edges allow.
    pub fn move_to(&mut self, lon: f64, lat: f64) {
        self.lon = lon;
        self.lat = lat;
        if !self.ready {
            return;
        }

        let view = self.bounds.size;
        let x = self.map_center.x as f64 - (view.width / 2) as f64 + lon / self.lon_ratio;
        let y = self.map_center.y as f64 - (view.height / 2) as f64 - lat / self.lat_ratio;

        let max_x = (self.map_width - view.width) as i32;
        let max_y = (self.map_height - view.height) as i32;
        self.x_pos = (x as i32).clamp(0, max_x);
        self.y_pos = (y as i32).clamp(0, max_y);
    }

    /// Top-left raster pixel shown in the viewport
    pub fn position(&self) -> (i32, i32) {
        (self.x_pos, self.y_pos)
    }

    pub fn lon_ratio(&self) -> f64 {
        self.lon_ratio
    }

    pub fn lat_ratio(&self) -> f64 {
        self.lat_ratio
    }

    pub fn map_size(&self) -> Size {
        Size::new(self.map_width, self.map_height)
    }

    pub fn mode(&self) -> GeoMapMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: GeoMapMode) {
        if self.mode != mode {
            self.mode = mode;
            self.invalidate();
        }
    }

    pub fn set_angle(&mut self, angle: f32) {
        if self.angle != angle {
            self.angle = angle;
            // The old arrow is only erased by repainting the raster under it
            self.invalidate();
        }
    }

    /// Force a full repaint on the next [`draw`](Self::draw).
    pub fn invalidate(&mut self) {
        self.painted = None;
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    pub fn is_dirty(&self) -> bool {
        self.painted != Some((self.x_pos, self.y_pos))
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    fn viewport_center(&self) -> Point {
        let size = self.bounds.size;
        self.bounds.top_left + Point::new((size.width / 2) as i32, (size.height / 2) as i32)
    }

    /// Translate a press on the map into the geographic offset it asks for.
    ///
    /// The map does not move by itself; the owner applies the delta and
    /// calls [`move_to`](Self::move_to).
    pub fn on_touch(&mut self, event: TouchEvent) -> Option<PanDelta> {
        let TouchEvent::Press(point) = event else {
            return None;
        };
        if !self.ready || !self.contains_point(point) {
            return None;
        }

        let p = point.to_point() - self.viewport_center();
        Some(PanDelta {
            lon: p.x as f64 / 2.0 * self.lon_ratio,
            lat: -(p.y as f64) / 2.0 * self.lat_ratio,
        })
    }

    pub fn contains_point(&self, point: TouchPoint) -> bool {
        self.bounds.contains(point.to_point())
    }

    /// Repaint the raster if the scroll position moved, then the overlay.
    ///
    /// A storage error aborts the raster stream and leaves the map unpainted
    /// so the next call tries again.
    pub fn draw<D: DrawTarget<Color = Rgb565>>(&mut self, display: &mut D) -> Result<(), D::Error> {
        if !self.ready {
            if self.is_dirty() {
                display.fill_solid(&self.bounds, BLACK)?;
                self.painted = Some((self.x_pos, self.y_pos));
            }
            return Ok(());
        }

        if self.is_dirty() {
            self.painted = None;
            if self.stream_rows(display)? {
                self.painted = Some((self.x_pos, self.y_pos));
            }
        }

        match self.mode {
            GeoMapMode::Prompt => self.draw_crosshair(display),
            GeoMapMode::Display => self.draw_bearing(display, self.viewport_center(), self.angle),
        }
    }

    /// Returns `Ok(false)` when the storage failed mid-stream.
    fn stream_rows<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        display: &mut D,
    ) -> Result<bool, D::Error> {
        let view = self.bounds.size;
        let row_len = self.row_buffer.len();

        for row in 0..view.height {
            let pixel_index =
                self.x_pos as u64 + self.map_width as u64 * (self.y_pos as u64 + row as u64);
            let Ok(offset) = u32::try_from(MAP_HEADER_SIZE as u64 + 2 * pixel_index) else {
                warn!("Map row {} lies beyond the addressable file", self.y_pos as u32 + row);
                return Ok(false);
            };

            let read = self
                .storage
                .seek(offset)
                .and_then(|()| self.storage.read_full(&mut self.row_buffer));

            match read {
                Ok(n) if n < row_len => {
                    warn!("Map truncated at row {}", self.y_pos as u32 + row);
                    self.row_buffer[n..].fill(0);
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("Map read failed at row {}: {}", self.y_pos as u32 + row, e);
                    return Ok(false);
                }
            }

            let area = Rectangle::new(
                self.bounds.top_left + Point::new(0, row as i32),
                Size::new(view.width, 1),
            );
            let colors = self
                .row_buffer
                .chunks_exact(2)
                .map(|px| Rgb565::from(RawU16::new(u16::from_le_bytes([px[0], px[1]]))));
            display.fill_contiguous(&area, colors)?;
        }

        Ok(true)
    }

    fn draw_crosshair<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        let center = self.viewport_center();
        let long = (2 * CROSSHAIR_HALF_PX) as u32;

        display.fill_solid(
            &Rectangle::new(center - Point::new(CROSSHAIR_HALF_PX, 1), Size::new(long, 2)),
            RED,
        )?;
        display.fill_solid(
            &Rectangle::new(center - Point::new(1, CROSSHAIR_HALF_PX), Size::new(2, long)),
            RED,
        )
    }

    /// Triangular arrow pointing along `angle`, outlined three times with
    /// shrinking size for a thicker stroke.
    fn draw_bearing<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
        origin: Point,
        angle: f32,
    ) -> Result<(), D::Error> {
        let style = PrimitiveStyle::with_stroke(RED, 1);

        for pass in 0..BEARING_PASSES {
            let size = (BEARING_SIZE_PX - pass) as f32;
            let tip = origin + polar_to_point(angle, size);
            let left = origin + polar_to_point(angle + 180.0 - BEARING_TAIL_DEG, size);
            let right = origin + polar_to_point(angle + 180.0 + BEARING_TAIL_DEG, size);

            Line::new(tip, left).into_styled(style).draw(display)?;
            Line::new(left, right).into_styled(style).draw(display)?;
            Line::new(right, tip).into_styled(style).draw(display)?;
        }

        Ok(())
    }
}

/// Screen offset `distance` pixels away along `angle` degrees, where 0° points
/// up and angles grow clockwise.
fn polar_to_point(angle: f32, distance: f32) -> Point {
    let radians = angle.to_radians();
    Point::new(
        libm::roundf(libm::sinf(radians) * distance) as i32,
        libm::roundf(-libm::cosf(radians) * distance) as i32,
    )
}
