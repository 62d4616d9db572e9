// librc522-rs/librc522/src/mifare/mod.rs

//! MIFARE Classic and Ultralight block commands.
//!
//! Everything here runs against a selected card. Classic commands other
//! than the Ultralight write require a Crypto1 session: start one with
//! [`Pcd::authenticate`] and end it with [`Pcd::stop_crypto1`] before the
//! next card is touched, or the chip will refuse further activations.

use log::{debug, trace};

use crate::constants::MF_ACK;
use crate::pcd::{Initialized, Pcd, PcdCommand, Register};
use crate::types::{MifareKey, Uid};
use crate::{Error, Result};

pub mod access;
pub mod magic;
pub mod value;

pub use access::{AccessBits, SectorLayout};
pub use value::ValueBlock;

/// Which of the two sector keys an authentication uses. The discriminant
/// doubles as the command byte of the authentication frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum KeyType {
    /// Sector key A
    #[display(fmt = "key A")]
    KeyA = 0x60,
    /// Sector key B
    #[display(fmt = "key B")]
    KeyB = 0x61,
}

pub(crate) const MF_READ: u8 = 0x30;
pub(crate) const MF_WRITE: u8 = 0xA0;
pub(crate) const MF_DECREMENT: u8 = 0xC0;
pub(crate) const MF_INCREMENT: u8 = 0xC1;
pub(crate) const MF_RESTORE: u8 = 0xC2;
pub(crate) const MF_TRANSFER: u8 = 0xB0;
pub(crate) const UL_WRITE: u8 = 0xA2;
pub(crate) const NTAG_PWD_AUTH: u8 = 0x1B;

impl Pcd<Initialized> {
    /// Authenticate one block of a MIFARE Classic sector.
    ///
    /// The 12-byte frame is key type, block address, the six key bytes and
    /// the last four UID bytes. MfAuthent raises IdleIRq when the Crypto1
    /// unit engages; a card that rejects the key simply stays silent, so a
    /// failed authentication surfaces as [`Error::Timeout`].
    pub fn authenticate(
        &mut self,
        key_type: KeyType,
        block: u8,
        key: &MifareKey,
        uid: &Uid,
    ) -> Result<()> {
        if uid.len() < 4 {
            return Err(Error::Invalid("authentication needs at least 4 uid bytes"));
        }
        let mut frame = [0u8; 12];
        frame[0] = key_type as u8;
        frame[1] = block;
        frame[2..8].copy_from_slice(key.as_bytes());
        frame[8..12].copy_from_slice(&uid.as_bytes()[uid.len() - 4..]);

        debug!("authenticate block {} with {}", block, key_type);
        self.communicate(PcdCommand::MfAuthent, 0x10, &frame, 0, None, 0, false)?;
        Ok(())
    }

    /// Drop the Crypto1 session by clearing the MFCrypto1On flag.
    pub fn stop_crypto1(&mut self) -> Result<()> {
        self.clear_register_bits(Register::Status2, 0x08)
    }

    /// Read one 16-byte block (or, on Ultralight, four 4-byte pages).
    pub fn read_block(&mut self, block: u8) -> Result<[u8; 16]> {
        let mut frame = [MF_READ, block, 0, 0];
        let crc = self.calculate_crc(&frame[..2])?;
        frame[2..].copy_from_slice(&crc);

        // 16 データバイト + CRC_A
        let mut back = [0u8; 18];
        let received = self.transceive(&frame, 0, &mut back, 0, true)?;
        if received.len != 18 {
            return Err(Error::Communication);
        }
        let mut data = [0u8; 16];
        data.copy_from_slice(&back[..16]);
        Ok(data)
    }

    /// Write one 16-byte block on a Classic card. Two-phase: the command
    /// is acknowledged first, then the data.
    pub fn write_block(&mut self, block: u8, data: &[u8; 16]) -> Result<()> {
        debug!("write block {}", block);
        self.mifare_transceive(&[MF_WRITE, block], false)?;
        self.mifare_transceive(data, false)
    }

    /// Write one 4-byte page on an Ultralight, in a single frame.
    pub fn ultralight_write(&mut self, page: u8, data: &[u8; 4]) -> Result<()> {
        let mut frame = [0u8; 6];
        frame[0] = UL_WRITE;
        frame[1] = page;
        frame[2..].copy_from_slice(data);
        self.mifare_transceive(&frame, false)
    }

    /// Add `delta` to the value block, into the internal Transfer Buffer.
    /// [`Pcd::transfer`] commits the result.
    pub fn increment(&mut self, block: u8, delta: i32) -> Result<()> {
        self.two_step(MF_INCREMENT, block, delta)
    }

    /// Subtract `delta` from the value block, into the Transfer Buffer.
    pub fn decrement(&mut self, block: u8, delta: i32) -> Result<()> {
        self.two_step(MF_DECREMENT, block, delta)
    }

    /// Copy the value block into the Transfer Buffer unchanged.
    pub fn restore(&mut self, block: u8) -> Result<()> {
        // The operand is ignored by the card but the data phase is still
        // mandatory.
        self.two_step(MF_RESTORE, block, 0)
    }

    /// Commit the Transfer Buffer to `block`.
    pub fn transfer(&mut self, block: u8) -> Result<()> {
        self.mifare_transceive(&[MF_TRANSFER, block], false)
    }

    /// Read a value block and return its 32-bit value. The redundant
    /// copies are not cross-checked here; use [`ValueBlock::parse`] on
    /// [`Pcd::read_block`] output when that matters.
    pub fn get_value(&mut self, block: u8) -> Result<i32> {
        let data = self.read_block(block)?;
        Ok(i32::from_le_bytes([data[0], data[1], data[2], data[3]]))
    }

    /// Format `block` as a value block holding `value`.
    pub fn set_value(&mut self, block: u8, value: i32) -> Result<()> {
        self.write_block(block, &ValueBlock::new(value, block).encode())
    }

    /// NTAG21x password authentication: the 4-byte password goes out, the
    /// 2-byte password acknowledge comes back. No Crypto1 involved.
    pub fn ntag_password_auth(&mut self, password: &[u8; 4]) -> Result<[u8; 2]> {
        let mut frame = [0u8; 7];
        frame[0] = NTAG_PWD_AUTH;
        frame[1..5].copy_from_slice(password);
        let crc = self.calculate_crc(&frame[..5])?;
        frame[5..].copy_from_slice(&crc);

        let mut back = [0u8; 6];
        let received = self.transceive(&frame, 0, &mut back, 0, true)?;
        if received.len != 4 {
            return Err(Error::Communication);
        }
        Ok([back[0], back[1]])
    }

    /// Two-step value operation. The command phase must be acknowledged;
    /// the operand phase is fire-and-forget because the card answers it
    /// only on error, so its timeout reads as success.
    fn two_step(&mut self, command: u8, block: u8, delta: i32) -> Result<()> {
        self.mifare_transceive(&[command, block], false)?;
        self.mifare_transceive(&delta.to_le_bytes(), true)
    }

    /// One MIFARE exchange: append the CRC_A, send, and demand the lone
    /// 4-bit ACK nibble back. Any other nibble is [`Error::MifareNack`].
    ///
    /// The increment/decrement/restore data phase gets no answer at all
    /// from some cards; `accept_timeout` turns that silence into success.
    pub(crate) fn mifare_transceive(&mut self, send: &[u8], accept_timeout: bool) -> Result<()> {
        if send.is_empty() || send.len() > 16 {
            return Err(Error::Invalid("mifare frame must be 1 to 16 bytes"));
        }
        let mut frame = [0u8; 18];
        frame[..send.len()].copy_from_slice(send);
        let crc = self.calculate_crc(send)?;
        frame[send.len()..send.len() + 2].copy_from_slice(&crc);

        let mut back = [0u8; 18];
        match self.transceive(&frame[..send.len() + 2], 0, &mut back, 0, false) {
            Ok(received) => {
                trace!(
                    "mifare answer: {} bytes, {} bits",
                    received.len, received.last_bits
                );
                if received.len != 1 || received.last_bits != 4 {
                    return Err(Error::Communication);
                }
                if back[0] & 0x0F != MF_ACK {
                    return Err(Error::MifareNack);
                }
                Ok(())
            }
            Err(Error::Timeout) if accept_timeout => Ok(()),
            Err(e) => Err(e),
        }
    }
}
