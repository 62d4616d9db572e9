// librc522-rs/librc522/src/tcl/mod.rs

//! ISO 14443-4 (T=CL): the ATS handshake, parameter selection and the
//! half-duplex block protocol on top of the activated card.

pub mod ats;
pub mod pps;
pub mod select;
pub mod transceive;

pub use select::TclSelection;
pub use transceive::ReceivedBlock;

/// Divisor-coded bit rates used by parameter selection. The wire value
/// is the divisor index D, not the rate itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, derive_more::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TagBitRate {
    /// 106 kbit/s, the activation rate
    #[display(fmt = "106 kbit/s")]
    Kbit106 = 0x00,
    /// 212 kbit/s
    #[display(fmt = "212 kbit/s")]
    Kbit212 = 0x01,
    /// 424 kbit/s, negotiable but not wired up
    #[display(fmt = "424 kbit/s")]
    Kbit424 = 0x02,
    /// 848 kbit/s, negotiable but not wired up
    #[display(fmt = "848 kbit/s")]
    Kbit848 = 0x03,
}

/// Interface byte TA(1): bit-rate capabilities in each direction.
///
/// The masks use the D coding of the standard: bit 0 for 212, bit 1 for
/// 424, bit 2 for 848 kbit/s. 106 kbit/s is always supported and has no
/// bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ta1 {
    /// Card accepts only the same divisor in both directions.
    pub same_d: bool,
    /// Card-to-reader capability mask.
    pub ds_mask: u8,
    /// Reader-to-card capability mask.
    pub dr_mask: u8,
}

impl Ta1 {
    /// Rates to negotiate, one per direction. 424 and 848 kbit/s are not
    /// wired up, so each direction picks 212 when offered and stays at
    /// 106 otherwise.
    pub fn negotiable_rates(&self) -> (TagBitRate, TagBitRate) {
        let pick = |mask: u8| {
            if mask & 0x01 != 0 {
                TagBitRate::Kbit212
            } else {
                TagBitRate::Kbit106
            }
        };
        (pick(self.ds_mask), pick(self.dr_mask))
    }
}

/// Interface byte TB(1): frame-waiting and start-up guard times, kept as
/// the raw exponents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tb1 {
    /// Frame waiting time integer.
    pub fwi: u8,
    /// Start-up frame guard time integer.
    pub sfgi: u8,
}

/// Interface byte TC(1): which optional prologue fields the card takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tc1 {
    /// Card accepts a CID prologue byte.
    pub supports_cid: bool,
    /// Card accepts a NAD prologue byte.
    pub supports_nad: bool,
}

/// The Answer To Select, decoded.
///
/// Interface bytes the card did not transmit stay `None`; their protocol
/// defaults (FSC 32, 106 kbit/s, CID accepted) are applied where they are
/// consumed, in [`crate::picc::TagSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ats {
    /// TL, the length byte as the card sent it.
    pub len: u8,
    /// Frame size the card accepts, decoded from FSCI.
    pub fsc: u16,
    /// Bit-rate capabilities, when transmitted.
    pub ta1: Option<Ta1>,
    /// Timing parameters, when transmitted.
    pub tb1: Option<Tb1>,
    /// Prologue-field support, when transmitted.
    pub tc1: Option<Tc1>,
    /// Historical bytes, whatever follows the interface bytes.
    pub historical: Vec<u8>,
}

// PCB ビットの割り当て
pub(crate) const PCB_I_BLOCK: u8 = 0x02;
pub(crate) const PCB_R_ACK: u8 = 0xA2;
pub(crate) const PCB_R_NAK: u8 = 0xB2;
pub(crate) const PCB_S_DESELECT: u8 = 0xC2;
pub(crate) const PCB_CHAINING: u8 = 0x10;
pub(crate) const PCB_CID_FOLLOWS: u8 = 0x08;
pub(crate) const PCB_NAD_FOLLOWS: u8 = 0x04;
pub(crate) const PCB_BLOCK_NUMBER: u8 = 0x01;

/// R-blocks have the top bits 10; the NAK flavour sets bit 4.
pub(crate) fn is_r_nak(pcb: u8) -> bool {
    pcb & 0xC0 == 0x80 && pcb & 0x10 != 0
}
