// librc522-rs/librc522/src/mifare/magic.rs

//! Backdoor commands for UID-changeable "magic" Classic cards.
//!
//! Gen1 magic cards accept a raw 0x40/0x43 sequence outside the normal
//! protocol and then treat block 0 as writable. None of this is part of
//! any standard; a genuine card ignores the sequence and the backdoor
//! steps fail with [`Error::Timeout`].

use log::{debug, warn};

use crate::constants::MF_ACK;
use crate::mifare::KeyType;
use crate::pcd::{Initialized, Pcd};
use crate::types::{MifareKey, Uid};
use crate::{Error, Result};

/// Block 0 of a factory-fresh card: UID 01 02 03 04, its BCC, SAK 0x08,
/// ATQA 0x0004.
const UNBRICK_BLOCK0: [u8; 16] = [
    0x01, 0x02, 0x03, 0x04, 0x04, 0x08, 0x04, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

impl Pcd<Initialized> {
    /// Put a gen1 magic card into backdoor mode.
    ///
    /// The card must be halted first; an active card would answer the
    /// backdoor bytes through the normal state machine. Both steps must
    /// come back with the MIFARE ACK nibble.
    pub fn open_uid_backdoor(&mut self) -> Result<()> {
        // Quiet the field; with no active card the halt is a no-op.
        let _ = self.halt_a();

        self.backdoor_step(&[0x40], 7)?;
        self.backdoor_step(&[0x43], 0)
    }

    fn backdoor_step(&mut self, frame: &[u8], tx_last_bits: u8) -> Result<()> {
        let mut back = [0u8; 2];
        let received = self.transceive(frame, tx_last_bits, &mut back, 0, false)?;
        if received.len != 1 || received.last_bits != 4 {
            return Err(Error::Communication);
        }
        if back[0] & 0x0F != MF_ACK {
            warn!("backdoor step 0x{:02x} answered NAK", frame[0]);
            return Err(Error::MifareNack);
        }
        Ok(())
    }

    /// Rewrite the UID bytes of block 0 on a magic card.
    ///
    /// Reads the current block 0 under the transport key A of sector 0,
    /// patches in `new_uid` plus its BCC, and writes the block back
    /// through the backdoor. The write makes the card drop out of the
    /// field; the caller wakes and re-selects it under the new UID.
    pub fn set_card_uid(&mut self, current: &Uid, new_uid: &[u8]) -> Result<()> {
        if new_uid.is_empty() || new_uid.len() > 15 {
            return Err(Error::Invalid("new uid must be 1 to 15 bytes"));
        }

        self.authenticate(KeyType::KeyA, 1, &MifareKey::DEFAULT, current)?;
        let mut block0 = self.read_block(0)?;

        let mut bcc = 0u8;
        for (slot, byte) in block0.iter_mut().zip(new_uid) {
            *slot = *byte;
            bcc ^= *byte;
        }
        block0[new_uid.len()] = bcc;
        debug!("rewriting uid {} -> {}", current.to_hex(), hex_of(new_uid));

        self.stop_crypto1()?;
        self.open_uid_backdoor()?;
        self.write_block(0, &block0)?;

        // The card reset itself after the block 0 write.
        let _ = self.wakeup_a();
        Ok(())
    }

    /// Write a default block 0 through the backdoor, for cards whose
    /// block 0 was corrupted past the point of answering a select.
    pub fn unbrick_uid_sector(&mut self) -> Result<()> {
        self.open_uid_backdoor()?;
        self.write_block(0, &UNBRICK_BLOCK0)
    }
}

fn hex_of(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}
