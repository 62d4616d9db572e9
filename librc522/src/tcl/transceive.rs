// librc522-rs/librc522/src/tcl/transceive.rs

//! The half-duplex block protocol: I-blocks with chaining, R-blocks and
//! the S(DESELECT) farewell.

use log::{debug, trace};

use crate::constants::FIFO_SIZE;
use crate::pcd::{Initialized, Pcd, Register};
use crate::picc::TagSession;
use crate::tcl::{
    is_r_nak, PCB_BLOCK_NUMBER, PCB_CHAINING, PCB_CID_FOLLOWS, PCB_I_BLOCK, PCB_NAD_FOLLOWS,
    PCB_R_ACK, PCB_R_NAK, PCB_S_DESELECT,
};
use crate::{Error, Result};

/// An outgoing protocol block. The prologue fields are only put on the
/// wire when the matching PCB bit is set.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PcbBlock<'a> {
    pub pcb: u8,
    pub cid: u8,
    pub nad: u8,
    pub inf: &'a [u8],
}

impl<'a> PcbBlock<'a> {
    pub(crate) fn new(pcb: u8, inf: &'a [u8]) -> Self {
        // CID fixed at 0, pinned by the RATS
        Self {
            pcb,
            cid: 0x00,
            nad: 0x00,
            inf,
        }
    }
}

/// A protocol block as the card answered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedBlock {
    /// Protocol control byte.
    pub pcb: u8,
    /// CID prologue byte, when the PCB announced one.
    pub cid: Option<u8>,
    /// NAD prologue byte, when the PCB announced one.
    pub nad: Option<u8>,
    /// Information field.
    pub inf: Vec<u8>,
}

impl ReceivedBlock {
    /// More I-blocks follow this one.
    pub fn chaining(&self) -> bool {
        self.pcb & PCB_CHAINING != 0
    }
}

impl Pcd<Initialized> {
    /// One raw block exchange.
    ///
    /// The CRC_A goes through the chip when the PPS enabled it in the
    /// mode registers and in software otherwise, in both directions. An
    /// R(NAK) answer is reported as [`Error::MifareNack`].
    pub(crate) fn exchange_block(&mut self, block: &PcbBlock) -> Result<ReceivedBlock> {
        let mut out = Vec::with_capacity(block.inf.len() + 5);
        out.push(block.pcb);
        if block.pcb & PCB_CID_FOLLOWS != 0 {
            out.push(block.cid);
        }
        if block.pcb & PCB_NAD_FOLLOWS != 0 {
            out.push(block.nad);
        }
        out.extend_from_slice(block.inf);

        if self.read_register(Register::TxMode)? & 0x80 == 0 {
            let crc = self.calculate_crc(&out)?;
            out.extend_from_slice(&crc);
        }

        let mut back = [0u8; FIFO_SIZE];
        let received = self.transceive(&out, 0, &mut back, 0, false)?;
        let mut frame = &back[..received.len];

        let Some(&pcb) = frame.first() else {
            return Err(Error::Communication);
        };
        let mut offset = 1;
        let mut cid = None;
        if pcb & PCB_CID_FOLLOWS != 0 {
            cid = frame.get(offset).copied();
            offset += 1;
        }
        let mut nad = None;
        if pcb & 0xC0 == 0x00 && pcb & PCB_NAD_FOLLOWS != 0 {
            nad = frame.get(offset).copied();
            offset += 1;
        }

        if self.read_register(Register::RxMode)? & 0x80 == 0 {
            if frame.len() < offset + 2 {
                return Err(Error::CrcWrong);
            }
            let computed = self.calculate_crc(&frame[..frame.len() - 2])?;
            if computed != frame[frame.len() - 2..] {
                return Err(Error::CrcWrong);
            }
            frame = &frame[..frame.len() - 2];
        }

        if is_r_nak(pcb) {
            return Err(Error::MifareNack);
        }

        Ok(ReceivedBlock {
            pcb,
            cid,
            nad,
            inf: frame[offset.min(frame.len())..].to_vec(),
        })
    }

    /// Send application data in an I-block and collect the card's answer
    /// into `back`, following a chained answer through R(ACK) rounds until
    /// the card clears the chaining bit. Returns the bytes written.
    pub fn tcl_transceive(
        &mut self,
        session: &mut TagSession,
        send: &[u8],
        back: &mut [u8],
    ) -> Result<usize> {
        let mut pcb = PCB_I_BLOCK;
        if session.supports_cid() {
            pcb |= PCB_CID_FOLLOWS;
        }
        if session.block_number {
            pcb |= PCB_BLOCK_NUMBER;
        }

        trace!("i-block pcb 0x{:02x}, {} bytes", pcb, send.len());
        let mut block = self.exchange_block(&PcbBlock::new(pcb, send))?;
        session.block_number = !session.block_number;

        let mut total = 0;
        loop {
            let needed = total + block.inf.len();
            if needed > back.len() {
                return Err(Error::NoRoom {
                    needed,
                    capacity: back.len(),
                });
            }
            back[total..needed].copy_from_slice(&block.inf);
            total = needed;

            if !block.chaining() {
                break;
            }
            // もっと続く: ACK で次のブロックを引き出す
            block = self.tcl_r_block(session, true)?;
        }
        Ok(total)
    }

    /// Send a lone R-block, normally the ACK that pulls the next chained
    /// I-block out of the card.
    pub fn tcl_r_block(&mut self, session: &mut TagSession, ack: bool) -> Result<ReceivedBlock> {
        let mut pcb = if ack { PCB_R_ACK } else { PCB_R_NAK };
        if session.supports_cid() {
            pcb |= PCB_CID_FOLLOWS;
        }
        if session.block_number {
            pcb |= PCB_BLOCK_NUMBER;
        }

        let block = self.exchange_block(&PcbBlock::new(pcb, &[]))?;
        session.block_number = !session.block_number;
        Ok(block)
    }

    /// S(DESELECT): release the card from the protocol. The card must
    /// echo the block; afterwards it only reacts to a wakeup.
    pub fn tcl_deselect(&mut self, session: &mut TagSession) -> Result<()> {
        let mut pcb = PCB_S_DESELECT;
        if session.supports_cid() {
            pcb |= PCB_CID_FOLLOWS;
        }

        let answer = self.exchange_block(&PcbBlock::new(pcb, &[]))?;
        if answer.pcb & !PCB_CID_FOLLOWS != PCB_S_DESELECT {
            return Err(Error::Communication);
        }
        debug!("card deselected");
        Ok(())
    }
}
