// librc522-rs/librc522/src/picc/select.rs

//! Anticollision cascade and the pluggable selection strategies.

use log::{debug, trace};

use crate::pcd::{Initialized, Pcd, Received, Register};
use crate::picc::session::TagSession;
use crate::picc::{CASCADE_TAG, SEL_CL1, SEL_CL2, SEL_CL3};
use crate::types::{Atqa, Uid};
use crate::{Error, Result};

/// How a detected card is taken through activation. [`BasicSelection`]
/// stops at the UID; [`crate::tcl::TclSelection`] continues into the
/// ISO 14443-4 handshake for cards that offer it.
pub trait Selection {
    /// Probe the field. On an answer (even a colliding one) the session
    /// restarts with the fresh ATQA and true is returned; an empty field
    /// returns false.
    fn card_present(&mut self, pcd: &mut Pcd<Initialized>, session: &mut TagSession)
        -> Result<bool>;

    /// Run the activation and fill the session.
    fn select(&mut self, pcd: &mut Pcd<Initialized>, session: &mut TagSession) -> Result<()>;
}

/// ISO 14443-3 activation only: cascade to the UID and stop.
#[derive(Debug, Default)]
pub struct BasicSelection;

impl Selection for BasicSelection {
    fn card_present(
        &mut self,
        pcd: &mut Pcd<Initialized>,
        session: &mut TagSession,
    ) -> Result<bool> {
        detect_card(pcd, session)
    }

    fn select(&mut self, pcd: &mut Pcd<Initialized>, session: &mut TagSession) -> Result<()> {
        session.uid = Some(pcd.select_card(&[], 0)?);
        Ok(())
    }
}

/// Shared detection step: reset the activation baseline and send REQA.
/// A collision still counts as a card in the field; the cascade sorts
/// the cards out afterwards.
pub(crate) fn detect_card(pcd: &mut Pcd<Initialized>, session: &mut TagSession) -> Result<bool> {
    pcd.prepare_for_request()?;
    match pcd.request_a() {
        Ok(atqa) => {
            session.begin(atqa);
            Ok(true)
        }
        Err(Error::Collision { partial, .. }) => {
            let atqa = if partial.len() >= 2 {
                Atqa::from_bytes([partial[0], partial[1]])
            } else {
                Atqa::from_bytes([0x00, 0x00])
            };
            session.begin(atqa);
            Ok(true)
        }
        Err(Error::Timeout) => Ok(false),
        Err(e) => Err(e),
    }
}

impl Pcd<Initialized> {
    /// Run the anticollision cascade and select one card.
    ///
    /// `expected` with `valid_bits` of it seeds the search when part of
    /// the UID is already known, which skips those anticollision rounds;
    /// pass an empty seed to discover whatever answers. At most 80 seed
    /// bits make sense (a triple-size UID has 10 bytes).
    pub fn select_card(&mut self, expected: &[u8], valid_bits: u8) -> Result<Uid> {
        if valid_bits > 80 {
            return Err(Error::Invalid("at most 80 seed bits"));
        }

        // ValuesAfterColl = 0: bits received after a collision are cleared
        self.clear_register_bits(Register::Coll, 0x80)?;

        let mut uid_bytes = [0u8; 10];
        let seeded = expected.len().min(10);
        uid_bytes[..seeded].copy_from_slice(&expected[..seeded]);

        let mut cascade_level = 1usize;
        let sak = loop {
            // Segment layout for this level: select command, whether the
            // segment starts with the cascade tag, where its bytes sit in
            // the full UID
            let (sel_cmd, uid_index, use_cascade_tag) = match cascade_level {
                1 => (SEL_CL1, 0usize, valid_bits > 0 && expected.len() > 4),
                2 => (SEL_CL2, 3, valid_bits > 0 && expected.len() > 7),
                3 => (SEL_CL3, 6, false),
                _ => return Err(Error::Internal("cascade level out of range")),
            };
            let mut known_bits = (valid_bits as i16 - 8 * uid_index as i16).max(0) as usize;

            // buffer holds the frame under construction: SEL, NVB, up to
            // 4 segment bytes, BCC, CRC. Responses land in its tail so
            // partial bytes merge in place
            let mut buffer = [0u8; 9];
            buffer[0] = sel_cmd;
            let mut index = 2usize;
            if use_cascade_tag {
                buffer[index] = CASCADE_TAG;
                index += 1;
            }
            let mut bytes_to_copy = known_bits / 8 + usize::from(known_bits % 8 != 0);
            if bytes_to_copy > 0 {
                let max_bytes = if use_cascade_tag { 3 } else { 4 };
                bytes_to_copy = bytes_to_copy.min(max_bytes);
                buffer[index..index + bytes_to_copy]
                    .copy_from_slice(&uid_bytes[uid_index..uid_index + bytes_to_copy]);
            }
            if use_cascade_tag {
                known_bits += 8;
            }

            let mut select_done = false;
            let mut received = Received { len: 0, last_bits: 0 };
            while !select_done {
                let (tx_last_bits, used, response_start) = if known_bits >= 32 {
                    // Full segment known: SELECT with BCC and CRC
                    buffer[1] = 0x70;
                    buffer[6] = buffer[2] ^ buffer[3] ^ buffer[4] ^ buffer[5];
                    let crc = self.calculate_crc(&buffer[..7])?;
                    buffer[7..9].copy_from_slice(&crc);
                    (0u8, 9usize, 6usize)
                } else {
                    // ANTICOLLISION with the partial segment; NVB encodes
                    // whole bytes in the high nibble, spare bits low
                    let tx_last = (known_bits % 8) as u8;
                    let frame_index = 2 + known_bits / 8;
                    buffer[1] = ((frame_index as u8) << 4) + tx_last;
                    let used = frame_index + usize::from(tx_last != 0);
                    (tx_last, used, frame_index)
                };

                let tx = buffer;
                match self.transceive(
                    &tx[..used],
                    tx_last_bits,
                    &mut buffer[response_start..9],
                    tx_last_bits,
                    false,
                ) {
                    Ok(r) => {
                        received = r;
                        if known_bits >= 32 {
                            select_done = true;
                        } else {
                            known_bits = 32;
                        }
                    }
                    Err(Error::Collision {
                        position: Some(position),
                        ..
                    }) => {
                        let position = position as usize;
                        if position <= known_bits {
                            return Err(Error::Internal("collision position not past known bits"));
                        }
                        trace!(
                            "collision at bit {} of cascade level {}",
                            position,
                            cascade_level
                        );
                        // Claim the colliding bit as 1 and go again
                        known_bits = position;
                        let byte_index = 1 + known_bits / 8 + usize::from(known_bits % 8 != 0);
                        buffer[byte_index] |= 1 << ((known_bits - 1) % 8);
                    }
                    Err(e) => return Err(e),
                }
            }

            // SAK is one byte plus CRC_A
            if received.len != 3 || received.last_bits != 0 {
                return Err(Error::Communication);
            }
            let crc = self.calculate_crc(&buffer[6..7])?;
            if crc != buffer[7..9] {
                return Err(Error::CrcWrong);
            }

            let (src, count) = if buffer[2] == CASCADE_TAG {
                (3usize, 3usize)
            } else {
                (2, 4)
            };
            uid_bytes[uid_index..uid_index + count].copy_from_slice(&buffer[src..src + count]);

            if buffer[6] & 0x04 != 0 {
                cascade_level += 1;
            } else {
                break buffer[6];
            }
        };

        let uid = Uid::new(&uid_bytes[..3 * cascade_level + 1], sak)?;
        debug!("selected card, uid {} sak 0x{:02x}", uid.to_hex(), sak);
        Ok(uid)
    }
}
