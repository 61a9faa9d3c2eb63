//! Pin definitions for the Waveshare 2.13" (B) e-Paper HAT on a Raspberry Pi
//!
//! Numbers are BCM GPIO numbers as used by sysfs.

/// Pin configuration constants for the HAT
pub struct Pins;

#[allow(dead_code)]
impl Pins {
    /// Busy status pin, GPIO 24 (board pin 18), low while the panel refreshes
    pub const BUSY: u64 = 24;
    /// Data/Command control pin, GPIO 25 (board pin 22)
    pub const DC: u64 = 25;
    /// Reset pin, GPIO 17 (board pin 11)
    pub const RST: u64 = 17;
    /// Chip select driven by hand; CE0 (GPIO 8) does not work on a Pi Zero
    pub const CS: u64 = 26;

    /// Kernel SPI device the HAT sits on
    pub const SPI_DEVICE: &'static str = "/dev/spidev0.0";
    /// SPI clock
    pub const SPI_SPEED_HZ: u32 = 4_000_000;
}
