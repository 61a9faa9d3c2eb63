//! One monochrome layer of the frame
//!
//! A set bit means ink: black in the black plane, red in the red plane.
//! Rows are packed MSB first, `width.div_ceil(8)` bytes per row.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plane {
    width: u32,
    height: u32,
    bytes_per_row: u32,
    bits: Vec<u8>,
}

impl Plane {
    /// Blank plane, no pixel inked
    pub fn new(width: u32, height: u32) -> Self {
        let bytes_per_row = width.div_ceil(8);
        Self {
            width,
            height,
            bytes_per_row,
            bits: vec![0; (bytes_per_row * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        let (x, y) = (x as u32, y as u32);
        let byte_index = (y * self.bytes_per_row + x / 8) as usize;
        let bit_index = 7 - (x % 8) as u8;
        Some((byte_index, bit_index))
    }

    /// Whether the pixel is inked, `false` outside the plane
    pub fn get(&self, x: i32, y: i32) -> bool {
        self.locate(x, y)
            .map(|(byte, bit)| self.bits[byte] & (1 << bit) != 0)
            .unwrap_or(false)
    }

    /// Ink or clear one pixel; coordinates outside the plane are dropped
    pub fn set(&mut self, x: i32, y: i32, value: bool) {
        if let Some((byte, bit)) = self.locate(x, y) {
            if value {
                self.bits[byte] |= 1 << bit;
            } else {
                self.bits[byte] &= !(1 << bit);
            }
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    pub fn inked_count(&self) -> usize {
        self.bits.iter().map(|byte| byte.count_ones() as usize).sum()
    }
}

impl OriginDimensions for Plane {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Plane {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set(point.x, point.y, color.is_on());
        }
        Ok(())
    }
}
