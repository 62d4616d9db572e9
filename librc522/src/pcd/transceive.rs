// librc522-rs/librc522/src/pcd/transceive.rs

//! The timed command engine behind every card exchange.

use crate::constants::TRANSCEIVE_BUDGET_MS;
use crate::pcd::registers::{PcdCommand, Register};
use crate::pcd::{Initialized, Pcd};
use crate::{Error, Result};

/// What came back from the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Received {
    /// Bytes placed into the caller's buffer, trailing CRC included.
    pub len: usize,
    /// Valid bits of the final byte, 0 meaning all eight.
    pub last_bits: u8,
}

impl Pcd<Initialized> {
    /// Send a frame and collect the answer into `back`.
    ///
    /// `tx_last_bits` is the number of valid bits in the final outgoing
    /// byte (0 for whole bytes), `rx_align` the bit offset at which the
    /// first received bit lands. With `check_crc` the trailing CRC_A of
    /// the answer is verified and kept in the buffer, and a lone 4-bit
    /// answer is reported as [`Error::MifareNack`].
    pub fn transceive(
        &mut self,
        send: &[u8],
        tx_last_bits: u8,
        back: &mut [u8],
        rx_align: u8,
        check_crc: bool,
    ) -> Result<Received> {
        self.communicate(
            PcdCommand::Transceive,
            0x30,
            send,
            tx_last_bits,
            Some(back),
            rx_align,
            check_crc,
        )
    }

    /// Shared engine for Transceive and MfAuthent. Loads the FIFO, starts
    /// `command`, waits for `wait_irq` with the chip timer as the abort
    /// signal, then drains the FIFO and classifies the error register.
    pub(crate) fn communicate(
        &mut self,
        command: PcdCommand,
        wait_irq: u8,
        send: &[u8],
        tx_last_bits: u8,
        back: Option<&mut [u8]>,
        rx_align: u8,
        check_crc: bool,
    ) -> Result<Received> {
        self.command(PcdCommand::Idle)?;
        // Clear all interrupt request bits
        self.write_register(Register::ComIrq, 0x7F)?;
        self.write_register(Register::FifoLevel, 0x80)?;
        self.write_register_buf(Register::FifoData, send)?;
        self.write_register(Register::BitFraming, (rx_align << 4) | tx_last_bits)?;
        self.command(command)?;
        if command == PcdCommand::Transceive {
            // StartSend
            self.set_register_bits(Register::BitFraming, 0x80)?;
        }

        self.wait_for_irq(Register::ComIrq, wait_irq, 0x01, TRANSCEIVE_BUDGET_MS)?;

        let error = self.read_register(Register::Error)?;
        // BufferOvfl, ParityErr or ProtocolErr end the exchange
        if error & 0x13 != 0 {
            return Err(Error::Communication);
        }

        let mut received = Received {
            len: 0,
            last_bits: 0,
        };
        if let Some(back) = back {
            let len = self.read_register(Register::FifoLevel)? as usize;
            if len > back.len() {
                return Err(Error::NoRoom {
                    needed: len,
                    capacity: back.len(),
                });
            }
            self.read_register_buf(Register::FifoData, &mut back[..len], rx_align)?;
            received.len = len;
            received.last_bits = self.read_register(Register::Control)? & 0x07;

            if error & 0x08 != 0 {
                return Err(self.collision_error(&back[..len], received.last_bits)?);
            }

            if check_crc {
                if received.len == 1 && received.last_bits == 4 {
                    return Err(Error::MifareNack);
                }
                if received.len < 2 || received.last_bits != 0 {
                    return Err(Error::CrcWrong);
                }
                let computed = self.calculate_crc(&back[..received.len - 2])?;
                if computed != back[received.len - 2..received.len] {
                    return Err(Error::CrcWrong);
                }
            }
        } else if error & 0x08 != 0 {
            return Err(self.collision_error(&[], 0)?);
        }

        Ok(received)
    }

    /// Build a collision error with the normalized first-collision
    /// position: 1..=32 within the current frame, or `None` when the chip
    /// marks the position as out of range.
    fn collision_error(&mut self, partial: &[u8], partial_bits: u8) -> Result<Error> {
        let coll = self.read_register(Register::Coll)?;
        let position = if coll & 0x20 != 0 {
            None
        } else {
            let p = coll & 0x1F;
            Some(if p == 0 { 32 } else { p })
        };
        Ok(Error::Collision {
            position,
            partial: partial.to_vec(),
            partial_bits,
        })
    }
}
