// librc522-rs/librc522/src/mifare/value.rs

//! The redundant MIFARE value-block layout.
//!
//! A value block stores a signed 32-bit value three times (the middle copy
//! inverted) and a one-byte address tag four times (twice inverted), so
//! the card can detect tearing. Increment/decrement only work on blocks
//! in this format.

use crate::{Error, Result};

/// A decoded value block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueBlock {
    /// The signed counter.
    pub value: i32,
    /// The address tag. Usually the block number; backup schemes store a
    /// partner block here instead.
    pub addr: u8,
}

impl ValueBlock {
    /// Value block tagged with `addr`.
    pub fn new(value: i32, addr: u8) -> Self {
        Self { value, addr }
    }

    /// Lay the block out with its built-in redundancy.
    pub fn encode(&self) -> [u8; 16] {
        let v = self.value.to_le_bytes();
        let mut block = [0u8; 16];
        block[..4].copy_from_slice(&v);
        for i in 0..4 {
            block[4 + i] = !v[i];
        }
        block[8..12].copy_from_slice(&v);
        block[12] = self.addr;
        block[13] = !self.addr;
        block[14] = self.addr;
        block[15] = !self.addr;
        block
    }

    /// Check every redundant copy and recover value and address. A block
    /// that was never formatted as a value block fails here.
    pub fn parse(block: &[u8; 16]) -> Result<Self> {
        for i in 0..4 {
            if block[i] != block[8 + i] || block[4 + i] != !block[i] {
                return Err(Error::Invalid("value copies disagree"));
            }
        }
        if block[12] != block[14] || block[13] != block[15] || block[13] != !block[12] {
            return Err(Error::Invalid("address tag is damaged"));
        }
        Ok(Self {
            value: i32::from_le_bytes([block[0], block[1], block[2], block[3]]),
            addr: block[12],
        })
    }
}
