// librc522-rs/librc522/src/types.rs

use crate::Error;
use std::convert::TryFrom;
use std::fmt::Write as _;

/// UID - 4 / 7 / 10 バイト
///
/// Fixed backing array with an explicit length, so a single type covers all
/// three cascade sizes without allocating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Uid {
    bytes: [u8; 10],
    len: u8,
    sak: u8,
}

impl Uid {
    /// Build a UID from its bytes and the SAK returned by the final select.
    pub fn new(bytes: &[u8], sak: u8) -> Result<Self, Error> {
        if !matches!(bytes.len(), 4 | 7 | 10) {
            return Err(Error::Invalid("uid must be 4, 7 or 10 bytes"));
        }
        let mut arr = [0u8; 10];
        arr[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            bytes: arr,
            len: bytes.len() as u8,
            sak,
        })
    }

    /// The UID bytes, in transmission order.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// UID length in bytes (4, 7 or 10).
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Always false; kept for slice-like ergonomics.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Select acknowledge byte from the final cascade level.
    pub fn sak(&self) -> u8 {
        self.sak
    }

    /// Lowercase hex rendering without separators.
    pub fn to_hex(&self) -> String {
        let mut s = String::with_capacity(self.len() * 2);
        for b in self.as_bytes() {
            let _ = write!(&mut s, "{:02x}", b);
        }
        s
    }
}

/// MIFARE Classic sector key - Newtype Pattern (6 バイト)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MifareKey([u8; 6]);

impl MifareKey {
    /// The transport key all blank cards ship with, FF FF FF FF FF FF.
    pub const DEFAULT: Self = Self([0xFF; 6]);

    /// Wrap six raw key bytes.
    pub fn from_bytes(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// The key bytes, in transmission order.
    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }
}

impl TryFrom<&[u8]> for MifareKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != 6 {
            return Err(Error::Invalid("key must be 6 bytes"));
        }
        let mut arr = [0u8; 6];
        arr.copy_from_slice(&bytes[..6]);
        Ok(Self(arr))
    }
}

/// Answer To Request - Newtype Pattern (2 バイト, LSB first on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Atqa([u8; 2]);

impl Atqa {
    /// Wrap the two answer bytes as they arrived.
    pub fn from_bytes(bytes: [u8; 2]) -> Self {
        Self(bytes)
    }

    /// The answer bytes, wire order.
    pub fn as_bytes(&self) -> &[u8; 2] {
        &self.0
    }

    /// The 16-bit value, wire order being little endian.
    pub fn bits(&self) -> u16 {
        u16::from_le_bytes(self.0)
    }
}

impl TryFrom<&[u8]> for Atqa {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != 2 {
            return Err(Error::Invalid("atqa must be 2 bytes"));
        }
        Ok(Self([bytes[0], bytes[1]]))
    }
}

/// Chip firmware revision, from the version register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FirmwareVersion {
    /// Counterfeit FM17522 and friends report 0x88.
    #[display(fmt = "clone chip (0x88)")]
    Clone,
    /// Version 0.0, register value 0x90.
    #[display(fmt = "version 0.0")]
    V0_0,
    /// Version 1.0, register value 0x91.
    #[display(fmt = "version 1.0")]
    V1_0,
    /// Version 2.0, register value 0x92.
    #[display(fmt = "version 2.0")]
    V2_0,
    /// Anything else the version register reported.
    #[display(fmt = "unknown version 0x{:02x}", _0)]
    Unknown(u8),
}

impl FirmwareVersion {
    /// Classify a version register read.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0x88 => Self::Clone,
            0x90 => Self::V0_0,
            0x91 => Self::V1_0,
            0x92 => Self::V2_0,
            other => Self::Unknown(other),
        }
    }

    /// The register value this variant decodes from.
    pub fn as_byte(&self) -> u8 {
        match self {
            Self::Clone => 0x88,
            Self::V0_0 => 0x90,
            Self::V1_0 => 0x91,
            Self::V2_0 => 0x92,
            Self::Unknown(b) => *b,
        }
    }
}
