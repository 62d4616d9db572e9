// librc522-rs/librc522/src/picc/session.rs

use crate::picc::PiccType;
use crate::tcl::Ats;
use crate::types::{Atqa, Uid};

/// Everything learned about the card currently in the field.
///
/// Filled in stages by [`super::Selection`]: the ATQA at request time, the
/// UID once the cascade completes, the ATS only when the card speaks
/// ISO 14443-4 and the selection asked for it. `block_number` is the
/// reader-side block toggle of the half-duplex block protocol.
#[derive(Debug, Clone, Default)]
pub struct TagSession {
    /// Answer to the request or wakeup that found the card.
    pub atqa: Option<Atqa>,
    /// The resolved UID with its SAK.
    pub uid: Option<Uid>,
    /// Decoded ATS, for cards that answered a RATS.
    pub ats: Option<Ats>,
    /// Block-number toggle of the block protocol.
    pub block_number: bool,
}

impl TagSession {
    /// Empty session, nothing learned yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start over for a freshly answered request.
    pub(crate) fn begin(&mut self, atqa: Atqa) {
        self.atqa = Some(atqa);
        self.uid = None;
        self.ats = None;
        self.block_number = false;
    }

    /// Card family, once the UID is in. A SAK of 0x20 is split between
    /// DESFire and generic ISO 14443-4 by the ATQA.
    pub fn picc_type(&self) -> Option<PiccType> {
        let uid = self.uid.as_ref()?;
        let kind = PiccType::from_sak(uid.sak());
        if kind == PiccType::Iso14443_4
            && self.atqa.map(|a| a.bits()) == Some(0x0344)
        {
            return Some(PiccType::MifareDesfire);
        }
        Some(kind)
    }

    /// Whether block frames may carry a CID. Without an ATS the card is
    /// assumed to accept one.
    pub fn supports_cid(&self) -> bool {
        match self.ats.as_ref().and_then(|ats| ats.tc1.as_ref()) {
            Some(tc1) => tc1.supports_cid,
            None => true,
        }
    }

    /// Frame size the card can accept, in bytes.
    pub fn fsc(&self) -> u16 {
        self.ats.as_ref().map(|ats| ats.fsc).unwrap_or(32)
    }
}
