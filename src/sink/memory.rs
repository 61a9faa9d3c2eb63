//! Sink that keeps frames in memory
//!
//! Used for `--preview` and by the tests. The last flushed pair of planes is
//! kept and can be exported as an RGB image.

use std::path::Path;

use anyhow::{bail, Context, Result};
use epd_waveshare::epd2in13bc::{HEIGHT, WIDTH};
use image::{Rgb, RgbImage};

use super::{DisplaySink, Rotation};
use crate::render::plane::Plane;

const PAPER: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([0, 0, 0]);
const RED_INK: Rgb<u8> = Rgb([255, 0, 0]);

#[derive(Debug, Default)]
pub struct MemorySink {
    width: u32,
    height: u32,
    rotation: Rotation,
    initialized: bool,
    frames: usize,
    last: Option<(Plane, Plane)>,
}

impl MemorySink {
    /// Square-on sink of `width` x `height` pixels
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rotation: Rotation::Rotate0,
            ..Default::default()
        }
    }

    /// Same geometry as the 2.13" HAT, landscape
    pub fn for_panel() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            rotation: Rotation::default(),
            ..Default::default()
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// How many times `display_frame` ran
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Black and red plane of the last frame
    pub fn last_frame(&self) -> Option<(&Plane, &Plane)> {
        self.last.as_ref().map(|(black, red)| (black, red))
    }

    /// Last frame as the panel would show it, red over black over white
    pub fn to_image(&self) -> Option<RgbImage> {
        let (black, red) = self.last_frame()?;
        Some(RgbImage::from_fn(black.width(), black.height(), |x, y| {
            let (x, y) = (x as i32, y as i32);
            if red.get(x, y) {
                RED_INK
            } else if black.get(x, y) {
                INK
            } else {
                PAPER
            }
        }))
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        let Some(image) = self.to_image() else {
            bail!("Nothing has been displayed yet");
        };
        image
            .save(path)
            .with_context(|| format!("Writing preview to {}", path.display()))?;
        log::info!("Preview saved to {}", path.display());
        Ok(())
    }
}

impl DisplaySink for MemorySink {
    fn init(&mut self) -> Result<()> {
        self.initialized = true;
        Ok(())
    }

    fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    fn width(&self) -> u32 {
        self.rotation.frame_size(self.width, self.height).width
    }

    fn height(&self) -> u32 {
        self.rotation.frame_size(self.width, self.height).height
    }

    fn display_frame(&mut self, black: &Plane, red: &Plane) -> Result<()> {
        if black.width() != self.width() || black.height() != self.height() {
            bail!(
                "Frame is {}x{}, display is {}x{}",
                black.width(),
                black.height(),
                self.width(),
                self.height()
            );
        }
        self.frames += 1;
        self.last = Some((black.clone(), red.clone()));
        Ok(())
    }
}
