// librc522-rs/librc522/src/tcl/ats.rs

//! RATS and the ATS decoder.

use log::{debug, trace};

use crate::pcd::{Initialized, Pcd};
use crate::picc::RATS;
use crate::tcl::{Ats, Ta1, Tb1, Tc1};
use crate::{Error, Result};

/// FSCI to frame size. 8 and the reserved codes all mean the 256-byte
/// maximum.
fn fsci_to_fsc(fsci: u8) -> u16 {
    const TABLE: [u16; 8] = [16, 24, 32, 40, 48, 64, 96, 128];
    TABLE.get(fsci as usize).copied().unwrap_or(256)
}

impl Ats {
    /// Decode an ATS frame, CRC already stripped off.
    ///
    /// The walk is defensive: a card that flags an interface byte but
    /// truncates the frame gets the byte treated as absent rather than an
    /// out-of-range read. Only a completely empty frame is an error.
    pub fn parse(frame: &[u8]) -> Result<Self> {
        let Some(&tl) = frame.first() else {
            return Err(Error::Invalid("empty ats"));
        };
        let mut ats = Ats {
            len: tl,
            fsc: 32,
            ta1: None,
            tb1: None,
            tc1: None,
            historical: Vec::new(),
        };
        let Some(&t0) = frame.get(1) else {
            return Ok(ats);
        };
        ats.fsc = fsci_to_fsc(t0 & 0x0F);

        let mut idx = 2;
        if t0 & 0x40 != 0 {
            if let Some(&ta) = frame.get(idx) {
                ats.ta1 = Some(Ta1 {
                    same_d: ta & 0x80 != 0,
                    ds_mask: (ta >> 4) & 0x07,
                    dr_mask: ta & 0x07,
                });
                idx += 1;
            }
        }
        if t0 & 0x20 != 0 {
            if let Some(&tb) = frame.get(idx) {
                ats.tb1 = Some(Tb1 {
                    fwi: tb >> 4,
                    sfgi: tb & 0x0F,
                });
                idx += 1;
            }
        }
        if t0 & 0x10 != 0 {
            if let Some(&tc) = frame.get(idx) {
                ats.tc1 = Some(Tc1 {
                    supports_cid: tc & 0x02 != 0,
                    supports_nad: tc & 0x01 != 0,
                });
                idx += 1;
            }
        }
        if idx < frame.len() {
            ats.historical = frame[idx..].to_vec();
        }
        trace!(
            "ats: fsc {}, ta1 {:?}, tb1 {:?}, tc1 {:?}",
            ats.fsc, ats.ta1, ats.tb1, ats.tc1
        );
        Ok(ats)
    }
}

impl Pcd<Initialized> {
    /// Send RATS to the selected card and decode its ATS.
    ///
    /// FSDI 5 announces the 64-byte frame the FIFO can take; the CID is
    /// fixed at 0. The card's state machine allows a single RATS per
    /// activation, so on any failure the card is halted before the error
    /// comes back.
    pub fn request_ats(&mut self) -> Result<Ats> {
        let mut frame = [RATS, 0x50, 0, 0];
        let crc = self.calculate_crc(&frame[..2])?;
        frame[2..].copy_from_slice(&crc);

        let mut back = [0u8; 64];
        let received = match self.transceive(&frame, 0, &mut back, 0, true) {
            Ok(received) if received.len >= 3 => received,
            Ok(_) => {
                let _ = self.halt_a();
                return Err(Error::Communication);
            }
            Err(e) => {
                debug!("rats got no usable answer: {}", e);
                let _ = self.halt_a();
                return Err(e);
            }
        };
        Ats::parse(&back[..received.len - 2])
    }
}
