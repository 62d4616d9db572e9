// librc522-rs/librc522/src/transport/traits.rs

use crate::{Error, Result};

/// Transport trait abstracts the register bus away from protocol logic.
///
/// Addresses are the 6-bit datasheet register addresses; each backend
/// applies its own bus framing (the SPI address byte with its read/write
/// flag, or an I2C register pointer).
pub trait Transport {
    /// Write `data` to one register. A multi-byte write repeats the same
    /// address, which the chip uses for FIFO bursts.
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<()>;

    /// Fill `out` from one register. A multi-byte read repeats the same
    /// address, which the chip uses for FIFO bursts.
    fn read(&mut self, addr: u8, out: &mut [u8]) -> Result<()>;

    /// Current level of the hardware reset line, `None` when the backend
    /// has no reset pin wired.
    fn reset_level(&mut self) -> Option<bool> {
        None
    }

    /// Drive the hardware reset line. Default implementation reports the
    /// pin as missing so bus-only backends keep working.
    fn set_reset(&mut self, _high: bool) -> Result<()> {
        Err(Error::Unsupported("reset line not wired"))
    }
}
