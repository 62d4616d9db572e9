// librc522-rs/librc522/src/mifare/access.rs

//! Sector-trailer access bits and the Classic sector geometry.

use crate::{Error, Result};

/// The four 3-bit access conditions of one sector.
///
/// Groups 0 to 2 guard the data blocks (on the big 4K sectors each group
/// covers five blocks), group 3 guards the trailer itself. Each group is
/// the C1 C2 C3 triple as one value 0..=7; the trailer bytes 6..9 carry
/// the four groups interleaved with their complements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccessBits {
    groups: [u8; 4],
}

impl AccessBits {
    /// Transport configuration of a factory-fresh card: everything open
    /// under key A, trailer bytes FF 07 80.
    pub const TRANSPORT: Self = Self {
        groups: [0b000, 0b000, 0b000, 0b001],
    };

    /// Build from the four group values, each 0..=7.
    pub fn new(g0: u8, g1: u8, g2: u8, g3: u8) -> Result<Self> {
        let groups = [g0, g1, g2, g3];
        if groups.iter().any(|g| *g > 7) {
            return Err(Error::Invalid("access group exceeds 3 bits"));
        }
        Ok(Self { groups })
    }

    /// The C1 C2 C3 triple of `group`, 0..=3.
    pub fn group(&self, group: usize) -> Option<u8> {
        self.groups.get(group).copied()
    }

    /// Pack the groups into trailer bytes 6, 7 and 8.
    pub fn encode(&self) -> [u8; 3] {
        let [g0, g1, g2, g3] = self.groups;
        let c1 = ((g3 & 4) << 1) | (g2 & 4) | ((g1 & 4) >> 1) | ((g0 & 4) >> 2);
        let c2 = ((g3 & 2) << 2) | ((g2 & 2) << 1) | (g1 & 2) | ((g0 & 2) >> 1);
        let c3 = ((g3 & 1) << 3) | ((g2 & 1) << 2) | ((g1 & 1) << 1) | (g0 & 1);
        [
            ((!c2 & 0x0F) << 4) | (!c1 & 0x0F),
            (c1 << 4) | (!c3 & 0x0F),
            (c3 << 4) | c2,
        ]
    }

    /// Unpack trailer bytes 6..9, verifying the stored complements. A
    /// mismatch means the trailer was corrupted (or was never a Classic
    /// trailer to begin with).
    pub fn decode(bytes: &[u8; 3]) -> Result<Self> {
        let c1 = bytes[1] >> 4;
        let c2 = bytes[2] & 0x0F;
        let c3 = bytes[2] >> 4;
        if (!c1 & 0x0F) != (bytes[0] & 0x0F)
            || (!c2 & 0x0F) != (bytes[0] >> 4)
            || (!c3 & 0x0F) != (bytes[1] & 0x0F)
        {
            return Err(Error::Invalid("access bit complements disagree"));
        }
        let mut groups = [0u8; 4];
        for (i, group) in groups.iter_mut().enumerate() {
            *group = (((c1 >> i) & 1) << 2) | (((c2 >> i) & 1) << 1) | ((c3 >> i) & 1);
        }
        Ok(Self { groups })
    }
}

/// Where a Classic sector sits in the flat block address space. The first
/// 32 sectors hold 4 blocks, the 4K tail sectors hold 16.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SectorLayout {
    /// Sector number, 0..=39.
    pub sector: u8,
    /// First block of the sector in the flat address space.
    pub first_block: u8,
    /// Blocks in the sector, trailer included.
    pub blocks: u8,
}

impl SectorLayout {
    /// Layout of `sector`, 0..=39.
    pub fn of(sector: u8) -> Result<Self> {
        match sector {
            0..=31 => Ok(Self {
                sector,
                first_block: sector * 4,
                blocks: 4,
            }),
            32..=39 => Ok(Self {
                sector,
                first_block: 128 + (sector - 32) * 16,
                blocks: 16,
            }),
            _ => Err(Error::Invalid("sector out of range")),
        }
    }

    /// Layout of the sector containing `block`. Every block address maps
    /// to a sector, so this cannot fail.
    pub fn of_block(block: u8) -> Self {
        if block < 128 {
            Self {
                sector: block / 4,
                first_block: block & !3,
                blocks: 4,
            }
        } else {
            Self {
                sector: 32 + (block - 128) / 16,
                first_block: block & !15,
                blocks: 16,
            }
        }
    }

    /// The sector trailer holding the keys and access bits.
    pub fn trailer_block(&self) -> u8 {
        self.first_block + self.blocks - 1
    }

    /// Whether `block` lies in this sector.
    pub fn contains(&self, block: u8) -> bool {
        block >= self.first_block && block < self.first_block + self.blocks
    }
}
