//! Classification of ID card pixels onto the two display planes

use image::Rgba;

/// Lower bound of every channel for a pixel to count as paper
const WHITE_THRESHOLD: u8 = 200;

/// Which plane a source pixel ends up in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelClass {
    /// Near white, cleared in the black plane
    Background,
    /// Saturated red, set in the red plane
    Highlight,
    /// Everything else, set in the black plane
    Foreground,
}

/// Sort a pixel into one of the three classes
///
/// The checks run in this order and the thresholds are exact. A pale pink
/// with every channel at 200 or above is paper. Highlight needs red at
/// exactly 255 with green and blue below 200, so a pink with only one of
/// green or blue at 200 or above lands in [`PixelClass::Foreground`].
pub fn classify(r: u8, g: u8, b: u8) -> PixelClass {
    if r >= WHITE_THRESHOLD && g >= WHITE_THRESHOLD && b >= WHITE_THRESHOLD {
        PixelClass::Background
    } else if r == u8::MAX && g < WHITE_THRESHOLD && b < WHITE_THRESHOLD {
        PixelClass::Highlight
    } else {
        PixelClass::Foreground
    }
}

/// Alpha is ignored
pub fn classify_rgba(pixel: &Rgba<u8>) -> PixelClass {
    let [r, g, b, _] = pixel.0;
    classify(r, g, b)
}
