// librc522-rs/librc522/src/pcd/crc.rs

//! CRC_A through the chip's coprocessor.

use crate::constants::CRC_BUDGET_MS;
use crate::pcd::registers::{PcdCommand, Register};
use crate::pcd::{Initialized, Pcd};
use crate::Result;

impl Pcd<Initialized> {
    /// Run the coprocessor over `data` and return the checksum, low byte
    /// first as it goes on the wire. Init leaves the preset at 0x6363, so
    /// this matches [`crate::picc::checksum::crc_a`].
    pub(crate) fn calculate_crc(&mut self, data: &[u8]) -> Result<[u8; 2]> {
        self.command(PcdCommand::Idle)?;
        // Clear the CRCIRq bit
        self.write_register(Register::DivIrq, 0x04)?;
        // FlushBuffer
        self.write_register(Register::FifoLevel, 0x80)?;
        self.write_register_buf(Register::FifoData, data)?;
        self.command(PcdCommand::CalcCrc)?;

        self.wait_for_irq(Register::DivIrq, 0x04, 0x00, CRC_BUDGET_MS)?;
        self.command(PcdCommand::Idle)?;

        Ok([
            self.read_register(Register::CrcResultL)?,
            self.read_register(Register::CrcResultH)?,
        ])
    }
}
