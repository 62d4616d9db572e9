// librc522-rs/librc522/src/tcl/pps.rs

//! Protocol and parameter selection, the optional step between ATS and
//! the first block exchange.

use log::debug;

use crate::pcd::{Initialized, Pcd, Register};
use crate::tcl::TagBitRate;
use crate::{Error, Result};

/// PPS start byte with the CID fixed at 0, matching the RATS.
const PPSS: u8 = 0xD0;

impl Pcd<Initialized> {
    /// PPS without a PPS1: both directions stay at 106 kbit/s and only
    /// the chip-side CRC generation is switched on for the block
    /// protocol.
    pub fn pps(&mut self) -> Result<()> {
        let mut frame = [PPSS, 0x00, 0, 0];
        let crc = self.calculate_crc(&frame[..2])?;
        frame[2..].copy_from_slice(&crc);

        self.pps_exchange(&frame)?;

        let tx = self.read_register(Register::TxMode)?;
        self.write_register(Register::TxMode, tx | 0x80)?;
        let rx = self.read_register(Register::RxMode)?;
        self.write_register(Register::RxMode, rx | 0x80)
    }

    /// PPS with a PPS1 carrying the divisors: `ds` card-to-reader, `dr`
    /// reader-to-card. On acceptance the TxMode/RxMode speed fields, the
    /// CRC enables and the modulation width all follow the new rates.
    ///
    /// Only 106 and 212 kbit/s are wired up; the two faster divisors are
    /// rejected here rather than negotiated and then missed.
    pub fn pps_with_rates(&mut self, ds: TagBitRate, dr: TagBitRate) -> Result<()> {
        if ds > TagBitRate::Kbit212 || dr > TagBitRate::Kbit212 {
            return Err(Error::Unsupported("bit rates above 212 kbit/s"));
        }

        let pps1 = ((ds as u8) << 2) | dr as u8;
        let mut frame = [PPSS, 0x11, pps1, 0, 0];
        let crc = self.calculate_crc(&frame[..3])?;
        frame[3..].copy_from_slice(&crc);

        self.pps_exchange(&frame)?;
        debug!("pps accepted: ds {}, dr {}", ds, dr);

        // 送信側が DR、受信側が DS
        let tx = self.read_register(Register::TxMode)?;
        self.write_register(Register::TxMode, (tx & 0x8F) | ((dr as u8) << 4) | 0x80)?;
        let rx = self.read_register(Register::RxMode)?;
        self.write_register(Register::RxMode, (rx & 0x8F) | ((ds as u8) << 4) | 0x80)?;

        let mod_width = if ds == TagBitRate::Kbit212 { 0x15 } else { 0x26 };
        self.write_register(Register::ModWidth, mod_width)?;
        self.settle(1);
        Ok(())
    }

    /// One PPS request/response round. The card must echo the PPS start
    /// byte; anything else means the request was not accepted.
    fn pps_exchange(&mut self, frame: &[u8]) -> Result<()> {
        let mut back = [0u8; 8];
        let received = self.transceive(frame, 0, &mut back, 0, true)?;
        if received.len != 3 || back[0] != PPSS {
            return Err(Error::Communication);
        }
        Ok(())
    }
}
