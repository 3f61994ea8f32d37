//! Test doubles for the display and the map storage

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::storage::{MapStorage, StorageError};
use crate::ui::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};

/// In-memory 240x320 frame buffer. Unpainted pixels read as `None`.
pub struct TestDisplay {
    pixels: Vec<Option<Rgb565>>,
    /// Calls to `fill_contiguous`, including glyphs drawn with a background
    pub contiguous_fills: usize,
    /// Widths of the single-pixel-high `fill_contiguous` calls
    row_fills: Vec<u32>,
}

impl TestDisplay {
    pub fn new() -> Self {
        Self {
            pixels: vec![None; DISPLAY_WIDTH_PX as usize * DISPLAY_HEIGHT_PX as usize],
            contiguous_fills: 0,
            row_fills: Vec::new(),
        }
    }

    /// Streamed map rows of `width` pixels drawn so far
    pub fn map_rows(&self, width: u32) -> usize {
        self.row_fills.iter().filter(|&&w| w == width).count()
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb565> {
        self.index(Point::new(x, y))
            .and_then(|index| self.pixels[index])
    }

    fn index(&self, point: Point) -> Option<usize> {
        let (w, h) = (DISPLAY_WIDTH_PX as i32, DISPLAY_HEIGHT_PX as i32);
        if point.x < 0 || point.y < 0 || point.x >= w || point.y >= h {
            return None;
        }
        Some((point.y * w + point.x) as usize)
    }
}

impl OriginDimensions for TestDisplay {
    fn size(&self) -> Size {
        Size::new(DISPLAY_WIDTH_PX as u32, DISPLAY_HEIGHT_PX as u32)
    }
}

impl DrawTarget for TestDisplay {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(index) = self.index(point) {
                self.pixels[index] = Some(color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.draw_iter(area.points().map(|point| Pixel(point, color)))
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        self.contiguous_fills += 1;
        if area.size.height == 1 {
            self.row_fills.push(area.size.width);
        }
        self.draw_iter(
            area.points()
                .zip(colors)
                .map(|(point, color)| Pixel(point, color)),
        )
    }
}

/// Files held in memory, with an optional failure injected on reads.
pub struct MemoryMapStorage {
    files: Vec<(String, Vec<u8>)>,
    open: Option<usize>,
    cursor: usize,
    /// Fail every read once this many reads have succeeded
    pub fail_after_reads: Option<usize>,
    pub reads: usize,
}

impl MemoryMapStorage {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            open: None,
            cursor: 0,
            fail_after_reads: None,
            reads: 0,
        }
    }

    pub fn with_file(mut self, path: &str, data: Vec<u8>) -> Self {
        self.files.push((String::from(path), data));
        self
    }
}

impl MapStorage for MemoryMapStorage {
    fn open(&mut self, path: &str) -> Result<(), StorageError> {
        self.open = None;
        let index = self
            .files
            .iter()
            .position(|(name, _)| name == path)
            .ok_or(StorageError::NotFound)?;
        self.open = Some(index);
        self.cursor = 0;
        Ok(())
    }

    fn seek(&mut self, offset: u32) -> Result<(), StorageError> {
        self.open.ok_or(StorageError::NotOpen)?;
        self.cursor = offset as usize;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, StorageError> {
        let index = self.open.ok_or(StorageError::NotOpen)?;
        if self.fail_after_reads.is_some_and(|limit| self.reads >= limit) {
            return Err(StorageError::Io);
        }
        self.reads += 1;

        let data = &self.files[index].1;
        let start = self.cursor.min(data.len());
        let n = buf.len().min(data.len() - start);
        buf[..n].copy_from_slice(&data[start..start + n]);
        self.cursor = start + n;
        Ok(n)
    }
}

/// Encode a map file: LE header followed by `pixel(x, y)` for every pixel.
pub fn world_map_bytes(width: u16, height: u16, pixel: impl Fn(u16, u16) -> u16) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(4 + 2 * width as usize * height as usize);
    bytes.extend_from_slice(&width.to_le_bytes());
    bytes.extend_from_slice(&height.to_le_bytes());
    for y in 0..height {
        for x in 0..width {
            bytes.extend_from_slice(&pixel(x, y).to_le_bytes());
        }
    }
    bytes
}
