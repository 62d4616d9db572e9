// librc522-rs/librc522/src/transport/rppal.rs

//! SPI backend for Raspberry Pi hosts, built on rppal.
//!
//! The chip's SPI framing shifts the register address left by one and puts
//! the read flag in bit 7: a write frame is `[(addr << 1) & 0x7E, data..]`,
//! a read clocks `0x80 | (addr << 1)` once per wanted byte with a trailing
//! zero, and the response arrives shifted by one byte.

use rppal::gpio::{Gpio, IoPin, Level, Mode as GpioMode};
use rppal::spi::{Bus, Mode, SlaveSelect, Spi};

use crate::constants::SPI_CLOCK_HZ;
use crate::transport::traits::Transport;
use crate::{Error, Result};

/// Register bus over SPI, with an optional GPIO-driven reset line.
pub struct SpiTransport {
    spi: Spi,
    reset: Option<IoPin>,
}

impl SpiTransport {
    /// Open the bus at 4 MHz, SPI mode 0. `reset_bcm` is the BCM number of
    /// the pin wired to NRSTPD, if any.
    pub fn open(bus: Bus, slave: SlaveSelect, reset_bcm: Option<u8>) -> Result<Self> {
        let spi = Spi::new(bus, slave, SPI_CLOCK_HZ, Mode::Mode0)?;
        let reset = match reset_bcm {
            Some(pin) => Some(Gpio::new()?.get(pin)?.into_io(GpioMode::Input)),
            None => None,
        };
        Ok(Self { spi, reset })
    }
}

impl Transport for SpiTransport {
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<()> {
        let mut frame = Vec::with_capacity(data.len() + 1);
        frame.push((addr << 1) & 0x7E);
        frame.extend_from_slice(data);
        self.spi.write(&frame)?;
        Ok(())
    }

    fn read(&mut self, addr: u8, out: &mut [u8]) -> Result<()> {
        if out.is_empty() {
            return Ok(());
        }
        let mut tx = vec![0x80 | ((addr << 1) & 0x7E); out.len() + 1];
        tx[out.len()] = 0x00;
        let mut rx = vec![0u8; out.len() + 1];
        self.spi.transfer(&mut rx, &tx)?;
        out.copy_from_slice(&rx[1..]);
        Ok(())
    }

    fn reset_level(&mut self) -> Option<bool> {
        let pin = self.reset.as_mut()?;
        pin.set_mode(GpioMode::Input);
        Some(pin.read() == Level::High)
    }

    fn set_reset(&mut self, high: bool) -> Result<()> {
        match self.reset.as_mut() {
            Some(pin) => {
                pin.set_mode(GpioMode::Output);
                if high {
                    pin.set_high();
                } else {
                    pin.set_low();
                }
                Ok(())
            }
            None => Err(Error::Unsupported("reset line not wired")),
        }
    }
}
