//! Sink driving the Waveshare 2.13" (B/C) three-colour panel
//!
//! Panel commands come from the `epd-waveshare` crate. The two planes are
//! copied into its tri-colour buffer, which applies the rotation, then both
//! halves are sent and the panel is refreshed and put to sleep.
//!
//! ## Red over black
//!
//! The panel gives the chromatic layer precedence, so a pixel inked in both
//! planes shows red. The copy does the same.

use anyhow::{anyhow, Context, Result};
use embedded_graphics::prelude::*;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;
use epd_waveshare::{
    color::TriColor,
    epd2in13bc::{Display2in13bc, Epd2in13bc, HEIGHT, WIDTH},
    graphics::DisplayRotation,
    prelude::*,
};

use super::{DisplaySink, Rotation};
use crate::render::plane::Plane;

impl From<Rotation> for DisplayRotation {
    fn from(rotation: Rotation) -> Self {
        match rotation {
            Rotation::Rotate0 => DisplayRotation::Rotate0,
            Rotation::Rotate90 => DisplayRotation::Rotate90,
            Rotation::Rotate180 => DisplayRotation::Rotate180,
            Rotation::Rotate270 => DisplayRotation::Rotate270,
        }
    }
}

fn hardware<E: core::fmt::Debug>(what: &'static str) -> impl FnOnce(E) -> anyhow::Error {
    move |e| anyhow!("{}: {:?}", what, e)
}

/// Check `ready` up to `tries` times, sleeping `interval_ms` between checks
#[cfg_attr(not(feature = "rpi"), allow(dead_code))]
fn poll_until<D: DelayNs>(
    delay: &mut D,
    tries: u32,
    interval_ms: u32,
    mut ready: impl FnMut() -> bool,
) -> bool {
    for _ in 0..tries {
        if ready() {
            return true;
        }
        delay.delay_ms(interval_ms);
    }
    ready()
}

/// Colour a frame pixel ends up as on the panel
fn tri_color(black: &Plane, red: &Plane, x: i32, y: i32) -> TriColor {
    if red.get(x, y) {
        TriColor::Chromatic
    } else if black.get(x, y) {
        TriColor::Black
    } else {
        TriColor::White
    }
}

/// E-paper sink
///
/// ## Type Parameters
///
/// - `SPI` - SPI device the panel sits on
/// - `BUSY` - BUSY input pin (LOW while the panel is busy)
/// - `DC` - Data/Command output pin
/// - `RST` - Reset output pin
/// - `DELAY` - Delay provider for timing
pub struct EpdSink<SPI, BUSY, DC, RST, DELAY> {
    spi: SPI,
    delay: DELAY,
    /// Handed to the driver on `init`
    pins: Option<(BUSY, DC, RST)>,
    epd: Option<Epd2in13bc<SPI, BUSY, DC, RST, DELAY>>,
    asleep: bool,
    buffer: Display2in13bc,
    rotation: Rotation,
}

impl<SPI, BUSY, DC, RST, DELAY> EpdSink<SPI, BUSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Wrap the bus and pins; nothing is sent until [`DisplaySink::init`]
    pub fn new(spi: SPI, busy: BUSY, dc: DC, rst: RST, delay: DELAY) -> Self {
        Self {
            spi,
            delay,
            pins: Some((busy, dc, rst)),
            epd: None,
            asleep: false,
            buffer: Display2in13bc::default(),
            rotation: Rotation::default(),
        }
    }

    /// Copy both planes into the tri-colour buffer
    fn fill_buffer(&mut self, black: &Plane, red: &Plane) {
        self.buffer.set_rotation(self.rotation.into());
        let _ = self.buffer.clear(TriColor::White);

        let (width, height) = (black.width() as i32, black.height() as i32);
        let pixels = (0..height)
            .flat_map(|y| (0..width).map(move |x| Point::new(x, y)))
            .map(|point| Pixel(point, tri_color(black, red, point.x, point.y)));
        let _ = self.buffer.draw_iter(pixels);
    }
}

impl<SPI, BUSY, DC, RST, DELAY> DisplaySink for EpdSink<SPI, BUSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    fn init(&mut self) -> Result<()> {
        if let Some(epd) = self.epd.as_mut() {
            log::debug!("Panel already initialised, waking it up");
            epd.wake_up(&mut self.spi, &mut self.delay)
                .map_err(hardware("Waking up e-paper"))?;
            self.asleep = false;
            return Ok(());
        }

        let (busy, dc, rst) = self.pins.take().context("E-paper pins already in use")?;
        log::info!("Initialising e-paper panel ({}x{})", WIDTH, HEIGHT);
        let epd = Epd2in13bc::new(&mut self.spi, busy, dc, rst, &mut self.delay, None)
            .map_err(hardware("Initialising e-paper"))?;
        self.epd = Some(epd);
        Ok(())
    }

    fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    fn width(&self) -> u32 {
        self.rotation.frame_size(WIDTH, HEIGHT).width
    }

    fn height(&self) -> u32 {
        self.rotation.frame_size(WIDTH, HEIGHT).height
    }

    fn display_frame(&mut self, black: &Plane, red: &Plane) -> Result<()> {
        self.fill_buffer(black, red);

        let epd = self.epd.as_mut().context("E-paper panel not initialised")?;
        if self.asleep {
            epd.wake_up(&mut self.spi, &mut self.delay)
                .map_err(hardware("Waking up e-paper"))?;
            self.asleep = false;
        }

        log::info!("Sending frame to e-paper");
        epd.update_color_frame(
            &mut self.spi,
            &mut self.delay,
            self.buffer.bw_buffer(),
            self.buffer.chromatic_buffer(),
        )
        .map_err(hardware("Sending frame"))?;
        epd.display_frame(&mut self.spi, &mut self.delay)
            .map_err(hardware("Refreshing e-paper"))?;

        epd.sleep(&mut self.spi, &mut self.delay)
            .map_err(hardware("Putting e-paper to sleep"))?;
        self.asleep = true;
        log::info!("Frame displayed, panel asleep");
        Ok(())
    }
}

#[cfg(feature = "rpi")]
pub use self::hat::{open_hat, HatSink};

#[cfg(feature = "rpi")]
mod hat {
    use anyhow::{bail, Context, Result};
    use linux_embedded_hal::{
        spidev::{self, SpidevOptions},
        sysfs_gpio::Direction,
        Delay, SpidevDevice, SysfsPin,
    };

    use super::{poll_until, EpdSink};
    use crate::sink::pins::Pins;

    /// sysfs creates the pin directory asynchronously after an export
    const EXPORT_TRIES: u32 = 50;
    const EXPORT_INTERVAL_MS: u32 = 10;

    /// The HAT wired to a Raspberry Pi
    pub type HatSink = EpdSink<SpidevDevice, SysfsPin, SysfsPin, SysfsPin, Delay>;

    fn export_pin(number: u64, direction: Direction) -> Result<SysfsPin> {
        let pin = SysfsPin::new(number);
        pin.export()
            .with_context(|| format!("Exporting GPIO {}", number))?;
        if !poll_until(&mut Delay, EXPORT_TRIES, EXPORT_INTERVAL_MS, || pin.is_exported()) {
            bail!(
                "GPIO {} not exported after {} ms",
                number,
                EXPORT_TRIES * EXPORT_INTERVAL_MS
            );
        }
        pin.set_direction(direction)
            .with_context(|| format!("Setting direction of GPIO {}", number))?;
        Ok(pin)
    }

    /// Claim the GPIOs and SPI device of the HAT
    ///
    /// Needs access to sysfs GPIO and spidev, usually root.
    pub fn open_hat() -> Result<HatSink> {
        let busy = export_pin(Pins::BUSY, Direction::In)?;
        let dc = export_pin(Pins::DC, Direction::Out)?;
        let rst = export_pin(Pins::RST, Direction::Out)?;

        let cs = export_pin(Pins::CS, Direction::Out)?;
        cs.set_value(1).context("Raising chip select")?;

        let mut spi = SpidevDevice::open(Pins::SPI_DEVICE)
            .with_context(|| format!("Opening {}", Pins::SPI_DEVICE))?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(Pins::SPI_SPEED_HZ)
            .mode(spidev::SpiModeFlags::SPI_MODE_0)
            .build();
        spi.configure(&options).context("Configuring SPI")?;

        log::debug!("HAT pins exported, SPI at {} Hz", Pins::SPI_SPEED_HZ);
        Ok(EpdSink::new(spi, busy, dc, rst, Delay))
    }
}
