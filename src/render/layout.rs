//! Where the weekday cells go
//!
//! Cells hang from the bottom edge of the display. Each working day gets a
//! narrow column; today's column is widened to take every pixel the other
//! four leave over.

use embedded_graphics::prelude::Point;

/// Width of a weekday column
pub const CELL_WIDTH: i32 = 36;
/// Height of today's cell
pub const TODAY_CELL_HEIGHT: i32 = 65;
/// Height of the other days' cells
pub const WEEK_CELL_HEIGHT: i32 = 42;
/// Gap between a cell edge and its text
pub const TEXT_PADDING: i32 = 2;
/// Monday to Friday
pub const WORKING_DAYS: usize = 5;
/// Anchor of the headline
pub const TITLE_POSITION: Point = Point::new(8, 14);

pub const DAY_NAMES: [&str; WORKING_DAYS] = ["Mon", "Tues", "Wed", "Thur", "Fri"];
pub const TODAY_HEADING: &str = "Today";

/// Rectangle given by two corners, both inclusive
///
/// `(x0, y0)` is the bottom left corner, `(x1, y1)` the top right one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Cell {
    /// Where text inside the cell starts
    pub fn text_origin(&self) -> Point {
        Point::new(self.x0 + TEXT_PADDING, self.y1 + TEXT_PADDING)
    }
}

/// Cells for every working day except `today_index`, left to right
///
/// The column after today starts where today's wide cell ends. A weekend
/// `today_index` skips nothing.
pub fn week_cells(display_width: u32, display_height: u32, today_index: u32) -> Vec<(usize, Cell)> {
    let y0 = display_height as i32;
    let y1 = y0 - WEEK_CELL_HEIGHT;
    let mut x0 = 0;
    let mut x1 = x0 + CELL_WIDTH;
    let mut cells = Vec::with_capacity(WORKING_DAYS);

    for index in 0..WORKING_DAYS {
        if index as u32 == today_index {
            x1 += display_width as i32 - WORKING_DAYS as i32 * CELL_WIDTH;
        } else {
            cells.push((index, Cell { x0, y0, x1, y1 }));
        }
        x0 = x1;
        x1 += CELL_WIDTH;
    }

    cells
}

/// Today's wide cell
pub fn today_cell(display_width: u32, display_height: u32, today_index: u32) -> Cell {
    let x0 = today_index as i32 * CELL_WIDTH;
    let y0 = display_height as i32;
    Cell {
        x0,
        y0,
        x1: x0 + (display_width as i32 - (WORKING_DAYS as i32 - 1) * CELL_WIDTH),
        y1: y0 - TODAY_CELL_HEIGHT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn today_absorbs_spare_width() {
        let today = today_cell(250, 122, 2);
        assert_eq!((today.x0, today.x1), (72, 178));
        assert_eq!((today.y0, today.y1), (122, 57));
    }

    #[test]
    fn cell_after_today_starts_at_its_right_edge() {
        let cells = week_cells(250, 122, 2);
        let spans: Vec<_> = cells.iter().map(|(i, c)| (*i, c.x0, c.x1)).collect();
        assert_eq!(spans, [(0, 0, 36), (1, 36, 72), (3, 178, 214), (4, 214, 250)]);
        assert!(cells.iter().all(|(_, c)| c.y0 - c.y1 == WEEK_CELL_HEIGHT));
    }

    #[test]
    fn columns_tile_the_panel_width() {
        for today in 0..WORKING_DAYS as u32 {
            let today_span = today_cell(212, 104, today);
            let cells = week_cells(212, 104, today);
            assert_eq!(cells.len(), WORKING_DAYS - 1);
            let right = cells
                .iter()
                .map(|(_, c)| c.x1)
                .chain(core::iter::once(today_span.x1))
                .max()
                .unwrap();
            assert_eq!(right, 212);
        }
    }

    #[test]
    fn weekend_draws_all_five_narrow_cells() {
        let cells = week_cells(212, 104, 5);
        assert_eq!(cells.len(), WORKING_DAYS);
        assert_eq!(cells[4].1.x1, 180);
    }

    #[test]
    fn text_starts_inside_padding() {
        let cell = Cell { x0: 36, y0: 104, x1: 72, y1: 62 };
        assert_eq!(cell.text_origin(), Point::new(38, 64));
    }
}
