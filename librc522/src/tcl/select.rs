// librc522-rs/librc522/src/tcl/select.rs

//! Selection strategy that continues into the ISO 14443-4 handshake.

use log::debug;

use crate::pcd::{Initialized, Pcd};
use crate::picc::select::{detect_card, Selection};
use crate::picc::TagSession;
use crate::Result;

/// Full activation for protocol cards: the 14443-3 cascade, then RATS
/// and a conditional PPS for cards whose SAK advertises the block
/// protocol. Plain memory cards come out exactly as they would from
/// [`crate::picc::BasicSelection`].
#[derive(Debug, Default)]
pub struct TclSelection;

impl Selection for TclSelection {
    fn card_present(
        &mut self,
        pcd: &mut Pcd<Initialized>,
        session: &mut TagSession,
    ) -> Result<bool> {
        detect_card(pcd, session)
    }

    fn select(&mut self, pcd: &mut Pcd<Initialized>, session: &mut TagSession) -> Result<()> {
        let uid = pcd.select_card(&[], 0)?;
        // SAK bit 5 set and bit 2 clear: a complete UID on a card that
        // speaks ISO 14443-4
        let tcl_capable = uid.sak() & 0x24 == 0x20;
        session.uid = Some(uid);
        if !tcl_capable {
            return Ok(());
        }

        match pcd.request_ats() {
            Ok(ats) => {
                if let Some(ta1) = &ats.ta1 {
                    let (ds, dr) = ta1.negotiable_rates();
                    if let Err(e) = pcd.pps_with_rates(ds, dr) {
                        // Stay at 106 kbit/s; the protocol still works.
                        debug!("pps declined: {}", e);
                    }
                }
                session.ats = Some(ats);
            }
            Err(e) => {
                // The SAK promised the protocol but the handshake failed.
                // The card was halted and remains usable over plain
                // 14443-3 after a wakeup.
                debug!("ats refused: {}", e);
            }
        }
        Ok(())
    }
}
