// librc522-rs/librc522/src/picc/mod.rs

//! Card (PICC) activation: request, anticollision cascade, select, halt.

use crate::pcd::{Initialized, Pcd, PcdCommand, Register};
use crate::types::Atqa;
use crate::{Error, Result};

pub mod checksum;
pub mod select;
pub mod session;

pub use select::{BasicSelection, Selection};
pub use session::TagSession;

/// REQA command byte, sent as a 7-bit frame.
pub(crate) const REQA: u8 = 0x26;
/// WUPA command byte, sent as a 7-bit frame.
pub(crate) const WUPA: u8 = 0x52;
/// Cascade tag, first byte of a non-final UID segment.
pub(crate) const CASCADE_TAG: u8 = 0x88;
/// Select commands for cascade levels 1 to 3.
pub(crate) const SEL_CL1: u8 = 0x93;
pub(crate) const SEL_CL2: u8 = 0x95;
pub(crate) const SEL_CL3: u8 = 0x97;
/// First byte of the HLTA frame.
pub(crate) const HLTA: u8 = 0x50;
/// RATS start byte.
pub(crate) const RATS: u8 = 0xE0;

/// Card family, decoded from the select acknowledge byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum PiccType {
    /// The cascade bit is still set; selection stopped halfway.
    #[display(fmt = "incomplete UID")]
    NotComplete,
    /// MIFARE Mini, 320 bytes
    #[display(fmt = "MIFARE Mini")]
    MifareMini,
    /// MIFARE Classic 1K
    #[display(fmt = "MIFARE Classic 1K")]
    Mifare1K,
    /// MIFARE Classic 4K
    #[display(fmt = "MIFARE Classic 4K")]
    Mifare4K,
    /// MIFARE Ultralight or NTAG
    #[display(fmt = "MIFARE Ultralight")]
    MifareUltralight,
    /// MIFARE Plus
    #[display(fmt = "MIFARE Plus")]
    MifarePlus,
    /// MIFARE DESFire, told apart from other 14443-4 cards by the ATQA
    #[display(fmt = "MIFARE DESFire")]
    MifareDesfire,
    /// TNP3xxx game token
    #[display(fmt = "TNP3xxx game token")]
    Tnp3xxx,
    /// Card speaking ISO 14443-4
    #[display(fmt = "ISO 14443-4 card")]
    Iso14443_4,
    /// Card speaking ISO 18092 (NFCIP-1)
    #[display(fmt = "ISO 18092 target")]
    Iso18092,
    /// SAK outside every known pattern
    #[display(fmt = "unknown card")]
    Unknown,
}

impl PiccType {
    /// Classify a SAK. Bit 7 is reserved for future use and ignored.
    pub fn from_sak(sak: u8) -> Self {
        match sak & 0x7F {
            0x04 => Self::NotComplete,
            0x09 => Self::MifareMini,
            0x08 => Self::Mifare1K,
            0x18 => Self::Mifare4K,
            0x00 => Self::MifareUltralight,
            0x10 | 0x11 => Self::MifarePlus,
            0x01 => Self::Tnp3xxx,
            0x20 => Self::Iso14443_4,
            0x40 => Self::Iso18092,
            _ => Self::Unknown,
        }
    }
}

impl Pcd<Initialized> {
    /// REQA: probe for cards in idle state. 7-bit frame, no CRC.
    pub fn request_a(&mut self) -> Result<Atqa> {
        self.reqa_or_wupa(REQA)
    }

    /// WUPA: probe for cards in idle or halt state.
    pub fn wakeup_a(&mut self) -> Result<Atqa> {
        self.reqa_or_wupa(WUPA)
    }

    fn reqa_or_wupa(&mut self, command: u8) -> Result<Atqa> {
        // ValuesAfterColl = 0: bits received after a collision are cleared
        self.clear_register_bits(Register::Coll, 0x80)?;

        let mut back = [0u8; 2];
        let received = self.transceive(&[command], 7, &mut back, 0, false)?;
        if received.len != 2 || received.last_bits != 0 {
            return Err(Error::Communication);
        }
        Ok(Atqa::from_bytes(back))
    }

    /// HLTA: put the active card into halt state. The card acknowledges
    /// by staying silent, so a timeout is the success path and an answer
    /// means the halt was rejected.
    pub fn halt_a(&mut self) -> Result<()> {
        let mut frame = [HLTA, 0x00, 0, 0];
        let crc = self.calculate_crc(&frame[..2])?;
        frame[2..].copy_from_slice(&crc);

        match self.communicate(PcdCommand::Transceive, 0x30, &frame, 0, None, 0, false) {
            Err(Error::Timeout) => Ok(()),
            Ok(_) => Err(Error::Communication),
            Err(e) => Err(e),
        }
    }

    /// Reset the baseline the activation commands rely on after a higher
    /// bit rate or a soft protocol left it changed.
    pub(crate) fn prepare_for_request(&mut self) -> Result<()> {
        self.write_register(Register::TxMode, 0x00)?;
        self.write_register(Register::RxMode, 0x00)?;
        self.write_register(Register::ModWidth, 0x26)
    }
}
