//! Frame composition
//!
//! A [`RenderContext`] owns the black and red planes for one render pass and
//! borrows the sink for its drawing primitives. Everything is drawn in the
//! rotated frame; the sink takes care of the panel's native orientation.

pub mod color;
pub mod font;
pub mod layout;
pub mod plane;

use anyhow::Result;
use embedded_graphics::prelude::Point;
use image::RgbaImage;

use self::color::{classify_rgba, PixelClass};
use self::font::{Font, FontSet};
use self::layout::{Cell, DAY_NAMES, TODAY_HEADING};
use self::plane::Plane;
use crate::schedule::WeekSchedule;
use crate::sink::DisplaySink;

pub struct RenderContext<'a, S: DisplaySink> {
    sink: &'a mut S,
    black: Plane,
    red: Plane,
}

impl<'a, S: DisplaySink> RenderContext<'a, S> {
    /// Blank planes sized to the sink's current frame
    pub fn new(sink: &'a mut S) -> Self {
        let (width, height) = (sink.width(), sink.height());
        Self {
            sink,
            black: Plane::new(width, height),
            red: Plane::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.black.width()
    }

    pub fn height(&self) -> u32 {
        self.black.height()
    }

    pub fn black(&self) -> &Plane {
        &self.black
    }

    pub fn red(&self) -> &Plane {
        &self.red
    }

    /// Copy an image pixel for pixel onto the planes
    ///
    /// No scaling: the image is expected to match the frame, anything outside
    /// it is dropped.
    pub fn draw_image(&mut self, image: &RgbaImage) {
        if image.width() != self.width() || image.height() != self.height() {
            log::warn!(
                "Image is {}x{}, frame is {}x{}; drawing unscaled",
                image.width(),
                image.height(),
                self.width(),
                self.height()
            );
        }

        for (x, y, pixel) in image.enumerate_pixels() {
            let (x, y) = (x as i32, y as i32);
            match classify_rgba(pixel) {
                PixelClass::Background => self.sink.set_pixel(&mut self.black, x, y, false),
                PixelClass::Highlight => self.sink.set_pixel(&mut self.red, x, y, true),
                PixelClass::Foreground => self.sink.set_pixel(&mut self.black, x, y, true),
            }
        }
    }

    /// Single line in black, no wrapping
    pub fn draw_title(&mut self, text: &str, font: &Font, position: Point) {
        self.sink
            .draw_string_at(&mut self.black, position.x, position.y, text, font, true);
    }

    /// Blank the cell on both planes, then outline it in black
    pub fn draw_cell(&mut self, cell: Cell) {
        let Cell { x0, y0, x1, y1 } = cell;
        self.sink
            .draw_filled_rectangle(&mut self.red, x0, y0, x1, y1, false);
        self.sink
            .draw_filled_rectangle(&mut self.black, x0, y0, x1, y1, false);
        self.sink
            .draw_rectangle(&mut self.black, x0, y0, x1, y1, true);
    }

    /// One word per line, starting one line below `origin`
    ///
    /// There is no height limit; long labels run past the bottom of the cell.
    /// Returns the anchor of every line drawn.
    pub fn draw_wrapped_label(&mut self, origin: Point, text: &str, font: &Font) -> Vec<Point> {
        let mut y = origin.y + font.text_size(text).height as i32;
        let mut lines = Vec::new();

        for word in text.split_whitespace() {
            self.sink
                .draw_string_at(&mut self.black, origin.x, y, word, font, true);
            lines.push(Point::new(origin.x, y));
            y += font.text_size(word).height as i32;
        }

        lines
    }

    /// Narrow cells for every working day but today
    pub fn draw_week(&mut self, week: &WeekSchedule, today_index: u32, fonts: &FontSet) {
        let cells = layout::week_cells(self.width(), self.height(), today_index);
        for (index, cell) in cells {
            self.draw_cell(cell);
            let origin = cell.text_origin();
            self.draw_title(DAY_NAMES[index], &fonts.day_heading, origin);
            match week.label(index) {
                Some(label) => {
                    self.draw_wrapped_label(origin, label, &fonts.week_body);
                }
                None => log::debug!("No record for {}, leaving the cell empty", DAY_NAMES[index]),
            }
        }
    }

    /// Wide cell for today; returns the cell and where each label line went
    pub fn draw_today(&mut self, label: &str, today_index: u32, fonts: &FontSet) -> (Cell, Vec<Point>) {
        let cell = layout::today_cell(self.width(), self.height(), today_index);
        self.draw_cell(cell);
        self.draw_title(TODAY_HEADING, &fonts.today_heading, cell.text_origin());
        let origin = Point::new(cell.x0 + layout::TEXT_PADDING, cell.y1);
        let lines = self.draw_wrapped_label(origin, label, &fonts.today_body);
        (cell, lines)
    }

    /// Hand both planes to the sink
    pub fn flush(self) -> Result<()> {
        log::debug!(
            "Flushing frame, {} black and {} red pixels",
            self.black.inked_count(),
            self.red.inked_count()
        );
        self.sink.display_frame(&self.black, &self.red)
    }
}
