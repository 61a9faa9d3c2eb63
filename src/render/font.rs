//! Fonts and their metrics
//!
//! The panel was laid out with proportional fonts at fixed point sizes. The
//! built-in `embedded-graphics` mono fonts closest to each size stand in for
//! them; the point size is kept for logging.

use embedded_graphics::geometry::Size;
use embedded_graphics::mono_font::ascii::{
    FONT_10X20, FONT_5X8, FONT_6X10, FONT_6X13, FONT_7X13_BOLD, FONT_9X15,
};
use embedded_graphics::mono_font::MonoFont;

#[derive(Clone, Copy)]
pub struct Font {
    mono: &'static MonoFont<'static>,
    points: u8,
}

impl Font {
    pub const fn new(mono: &'static MonoFont<'static>, points: u8) -> Self {
        Self { mono, points }
    }

    pub fn mono(&self) -> &'static MonoFont<'static> {
        self.mono
    }

    pub fn line_height(&self) -> u32 {
        self.mono.character_size.height
    }

    /// Rendered size of a single line of `text`
    pub fn text_size(&self, text: &str) -> Size {
        let chars = text.chars().count() as u32;
        let advance = self.mono.character_size.width + self.mono.character_spacing;
        let width = (chars * advance).saturating_sub(self.mono.character_spacing);
        Size::new(width, self.line_height())
    }
}

impl core::fmt::Debug for Font {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let size = self.mono.character_size;
        write!(f, "Font({}pt as {}x{})", self.points, size.width, size.height)
    }
}

/// Every font the panel uses
#[derive(Debug, Clone, Copy)]
pub struct FontSet {
    /// Headline across the top, 18pt
    pub title: Font,
    /// Status mode caption, 13pt
    pub caption: Font,
    /// "Today" heading, 15pt bold
    pub today_heading: Font,
    /// Today's location, 16pt
    pub today_body: Font,
    /// Weekday names, 10pt bold
    pub day_heading: Font,
    /// Other days' locations, 9pt
    pub week_body: Font,
}

impl Default for FontSet {
    fn default() -> Self {
        Self {
            title: Font::new(&FONT_10X20, 18),
            caption: Font::new(&FONT_6X13, 13),
            today_heading: Font::new(&FONT_7X13_BOLD, 15),
            today_body: Font::new(&FONT_9X15, 16),
            day_heading: Font::new(&FONT_6X10, 10),
            week_body: Font::new(&FONT_5X8, 9),
        }
    }
}
