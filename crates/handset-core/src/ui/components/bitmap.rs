//! 1 bpp bitmaps (menu icons)

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

/// Monochrome bitmap, rows packed MSB first and padded to whole bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bitmap {
    pub size: Size,
    pub data: &'static [u8],
}

impl Bitmap {
    pub const fn new(size: Size, data: &'static [u8]) -> Self {
        Self { size, data }
    }

    fn stride(&self) -> usize {
        (self.size.width as usize).div_ceil(8)
    }

    /// Whether the pixel at (x, y) is set. Out of range pixels read as unset.
    pub fn is_set(&self, x: u32, y: u32) -> bool {
        if x >= self.size.width || y >= self.size.height {
            return false;
        }
        let index = y as usize * self.stride() + (x as usize / 8);
        self.data
            .get(index)
            .is_some_and(|byte| byte & (0x80 >> (x % 8)) != 0)
    }

    /// Draw with `foreground` for set bits and `background` for clear bits.
    pub fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
        origin: Point,
        foreground: Rgb565,
        background: Rgb565,
    ) -> Result<(), D::Error> {
        let width = self.size.width;
        let pixels = (0..self.size.height).flat_map(move |y| {
            (0..width).map(move |x| {
                let color = if self.is_set(x, y) {
                    foreground
                } else {
                    background
                };
                Pixel(origin + Point::new(x as i32, y as i32), color)
            })
        });
        display.draw_iter(pixels)
    }
}

/// 16x16 globe, used for the map entries of the main menu.
pub const ICON_GLOBE: Bitmap = Bitmap::new(
    Size::new(16, 16),
    &[
        0x07, 0xE0, 0x19, 0x98, 0x21, 0x84, 0x43, 0xC2, 0x42, 0x42, 0xFF, 0xFF, 0x84, 0x21,
        0x84, 0x21, 0x84, 0x21, 0x84, 0x21, 0xFF, 0xFF, 0x42, 0x42, 0x43, 0xC2, 0x21, 0x84,
        0x19, 0x98, 0x07, 0xE0,
    ],
);

/// 16x16 crosshair, used for position-picking entries.
pub const ICON_CROSSHAIR: Bitmap = Bitmap::new(
    Size::new(16, 16),
    &[
        0x01, 0x80, 0x01, 0x80, 0x07, 0xE0, 0x09, 0x90, 0x11, 0x88, 0x21, 0x84, 0x20, 0x04,
        0xFC, 0x3F, 0xFC, 0x3F, 0x20, 0x04, 0x21, 0x84, 0x11, 0x88, 0x09, 0x90, 0x07, 0xE0,
        0x01, 0x80, 0x01, 0x80,
    ],
);
