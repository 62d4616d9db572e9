// librc522-rs/librc522/src/pcd/io.rs

//! Register access helpers shared by the protocol layers.

use log::trace;

use crate::pcd::registers::{PcdCommand, Register};
use crate::pcd::Pcd;
use crate::{Error, Result};

impl<State> Pcd<State> {
    pub(crate) fn write_register(&mut self, reg: Register, value: u8) -> Result<()> {
        self.transport.write(reg as u8, &[value])
    }

    pub(crate) fn write_register_buf(&mut self, reg: Register, data: &[u8]) -> Result<()> {
        self.transport.write(reg as u8, data)
    }

    pub(crate) fn read_register(&mut self, reg: Register) -> Result<u8> {
        let mut out = [0u8; 1];
        self.transport.read(reg as u8, &mut out)?;
        Ok(out[0])
    }

    /// Burst read. When `rx_align` is non-zero only bits `rx_align..8` of
    /// the first byte are taken from the chip; the low bits keep whatever
    /// the caller already holds there, which is how partial anticollision
    /// bytes are merged.
    pub(crate) fn read_register_buf(
        &mut self,
        reg: Register,
        out: &mut [u8],
        rx_align: u8,
    ) -> Result<()> {
        if out.is_empty() {
            return Ok(());
        }
        let kept = out[0];
        self.transport.read(reg as u8, out)?;
        if rx_align > 0 {
            let mask = 0xFFu8 << rx_align;
            out[0] = (kept & !mask) | (out[0] & mask);
        }
        Ok(())
    }

    pub(crate) fn set_register_bits(&mut self, reg: Register, mask: u8) -> Result<()> {
        let value = self.read_register(reg)?;
        self.write_register(reg, value | mask)
    }

    pub(crate) fn clear_register_bits(&mut self, reg: Register, mask: u8) -> Result<()> {
        let value = self.read_register(reg)?;
        self.write_register(reg, value & !mask)
    }

    pub(crate) fn command(&mut self, command: PcdCommand) -> Result<()> {
        self.write_register(Register::Command, command as u8)
    }

    /// Poll an interrupt register until a bit in `wait_mask` rises. A bit
    /// in `abort_mask` or an exhausted budget resolves to `Timeout`.
    pub(crate) fn wait_for_irq(
        &mut self,
        reg: Register,
        wait_mask: u8,
        abort_mask: u8,
        budget_ms: u64,
    ) -> Result<u8> {
        let deadline = self.clock.now_ms() + budget_ms;
        loop {
            let irq = self.read_register(reg)?;
            if irq & wait_mask != 0 {
                trace!("irq wait done, {:?} = 0x{:02x}", reg, irq);
                return Ok(irq);
            }
            if irq & abort_mask != 0 {
                trace!("irq wait aborted by chip timer, {:?} = 0x{:02x}", reg, irq);
                return Err(Error::Timeout);
            }
            self.clock.yield_now();
            if self.clock.now_ms() >= deadline {
                trace!("irq wait budget of {} ms exhausted", budget_ms);
                return Err(Error::Timeout);
            }
        }
    }
}
