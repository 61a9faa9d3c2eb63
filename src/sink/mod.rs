//! Display sinks
//!
//! A sink knows the size of the panel, draws primitives into [`Plane`]s and
//! pushes a finished pair of planes out. [`epd::EpdSink`] drives the Waveshare
//! HAT, [`memory::MemorySink`] keeps frames in memory and can save them as PNG.
//!
//! Coordinates handed to a sink are in the rotated frame, so `width()` and
//! `height()` already account for [`Rotation`].

use core::str::FromStr;

use anyhow::Result;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, StrokeAlignment,
};
use embedded_graphics::text::{Baseline, Text, TextStyleBuilder};

use crate::render::font::Font;
use crate::render::plane::Plane;

pub mod epd;
pub mod memory;
pub mod pins;

/// Orientation of the frame relative to the panel's native portrait layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    Rotate0,
    Rotate90,
    Rotate180,
    /// Landscape with the HAT's USB side up on a Pi Zero
    #[default]
    Rotate270,
}

impl Rotation {
    /// Whether width and height trade places
    pub fn is_landscape(self) -> bool {
        matches!(self, Rotation::Rotate90 | Rotation::Rotate270)
    }

    /// Frame size for a panel of `width` x `height` native pixels
    pub fn frame_size(self, width: u32, height: u32) -> Size {
        if self.is_landscape() {
            Size::new(height, width)
        } else {
            Size::new(width, height)
        }
    }
}

impl FromStr for Rotation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(Rotation::Rotate0),
            "90" => Ok(Rotation::Rotate90),
            "180" => Ok(Rotation::Rotate180),
            "270" => Ok(Rotation::Rotate270),
            other => Err(format!("unsupported rotation {other}, use 0, 90, 180 or 270")),
        }
    }
}

fn colour(value: bool) -> BinaryColor {
    if value {
        BinaryColor::On
    } else {
        BinaryColor::Off
    }
}

/// Everything the compositor needs from a display
pub trait DisplaySink {
    /// Bring the panel up; drawing may start afterwards
    fn init(&mut self) -> Result<()>;

    fn set_rotation(&mut self, rotation: Rotation);

    /// Frame width after rotation
    fn width(&self) -> u32;

    /// Frame height after rotation
    fn height(&self) -> u32;

    /// Push both planes to the panel and refresh it
    fn display_frame(&mut self, black: &Plane, red: &Plane) -> Result<()>;

    fn set_pixel(&self, plane: &mut Plane, x: i32, y: i32, value: bool) {
        plane.set(x, y, value);
    }

    /// One line of text with its top left corner at `(x, y)`
    fn draw_string_at(&self, plane: &mut Plane, x: i32, y: i32, text: &str, font: &Font, value: bool) {
        let style = MonoTextStyle::new(font.mono(), colour(value));
        let text_style = TextStyleBuilder::new().baseline(Baseline::Top).build();
        let _ = Text::with_text_style(text, Point::new(x, y), style, text_style).draw(plane);
    }

    /// One pixel wide outline through both corners
    fn draw_rectangle(&self, plane: &mut Plane, x0: i32, y0: i32, x1: i32, y1: i32, value: bool) {
        let style = PrimitiveStyleBuilder::new()
            .stroke_color(colour(value))
            .stroke_width(1)
            .stroke_alignment(StrokeAlignment::Inside)
            .build();
        let _ = Rectangle::with_corners(Point::new(x0, y0), Point::new(x1, y1))
            .into_styled(style)
            .draw(plane);
    }

    fn draw_filled_rectangle(&self, plane: &mut Plane, x0: i32, y0: i32, x1: i32, y1: i32, value: bool) {
        let _ = Rectangle::with_corners(Point::new(x0, y0), Point::new(x1, y1))
            .into_styled(PrimitiveStyle::with_fill(colour(value)))
            .draw(plane);
    }
}
