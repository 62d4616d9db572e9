// librc522-rs/librc522/src/transport/mock.rs

use std::collections::VecDeque;

use crate::pcd::registers::{PcdCommand, Register};
use crate::picc::checksum::crc_a;
use crate::transport::traits::Transport;
use crate::{Error, Result};

const REG_COMMAND: usize = Register::Command as usize;
const REG_COM_IRQ: usize = Register::ComIrq as usize;
const REG_DIV_IRQ: usize = Register::DivIrq as usize;
const REG_ERROR: usize = Register::Error as usize;
const REG_STATUS2: usize = Register::Status2 as usize;
const REG_FIFO_LEVEL: usize = Register::FifoLevel as usize;
const REG_CONTROL: usize = Register::Control as usize;
const REG_BIT_FRAMING: usize = Register::BitFraming as usize;
const REG_COLL: usize = Register::Coll as usize;
const REG_CRC_H: usize = Register::CrcResultH as usize;
const REG_CRC_L: usize = Register::CrcResultL as usize;
const REG_AUTO_TEST: usize = Register::AutoTest as usize;
const REG_VERSION: usize = Register::Version as usize;

/// ISO 14443-3 state of a simulated card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    /// Powered but not yet addressed; answers REQA and WUPA.
    Idle,
    /// Answered a request, waiting for the cascade.
    Ready,
    /// Selected; answers memory commands.
    Active,
    /// Halted by HLTA; only WUPA brings it back.
    Halted,
}

/// A card the mock reader sees in its field. The simulator covers the
/// activation commands (REQA, WUPA, anticollision, select, HLTA) and
/// Crypto1 authentication; everything above that is answered from the
/// scripted reply queue.
#[derive(Debug, Clone)]
pub struct SimCard {
    /// Full UID, 4, 7 or 10 bytes.
    pub uid: Vec<u8>,
    /// SAK of the final cascade level.
    pub sak: u8,
    /// Answer to request, wire order.
    pub atqa: [u8; 2],
    /// Sector key accepted for key A authentication.
    pub key_a: [u8; 6],
    /// Sector key accepted for key B authentication.
    pub key_b: [u8; 6],
    /// Current ISO 14443-3 state.
    pub state: CardState,
}

impl SimCard {
    fn new(uid: &[u8], sak: u8, atqa: [u8; 2]) -> Self {
        Self {
            uid: uid.to_vec(),
            sak,
            atqa,
            key_a: [0xFF; 6],
            key_b: [0xFF; 6],
            state: CardState::Idle,
        }
    }

    /// MIFARE Classic 1K with a single-size UID.
    pub fn classic_1k(uid: [u8; 4]) -> Self {
        Self::new(&uid, 0x08, [0x04, 0x00])
    }

    /// MIFARE Classic 4K with a single-size UID.
    pub fn classic_4k(uid: [u8; 4]) -> Self {
        Self::new(&uid, 0x18, [0x02, 0x00])
    }

    /// MIFARE Ultralight with a double-size UID.
    pub fn ultralight(uid: [u8; 7]) -> Self {
        Self::new(&uid, 0x00, [0x44, 0x00])
    }

    /// DESFire with a double-size UID; the SAK advertises ISO 14443-4.
    pub fn desfire(uid: [u8; 7]) -> Self {
        Self::new(&uid, 0x20, [0x44, 0x03])
    }

    /// Triple-size UID card for exercising cascade level 3.
    pub fn triple_size(uid: [u8; 10]) -> Self {
        Self::new(&uid, 0x08, [0x44, 0x00])
    }

    fn cascade_levels(&self) -> usize {
        match self.uid.len() {
            4 => 1,
            7 => 2,
            _ => 3,
        }
    }

    /// UID segment plus BCC for a 1-based cascade level.
    fn segment(&self, level: usize) -> [u8; 5] {
        let mut seg = [0u8; 5];
        let levels = self.cascade_levels();
        let body: [u8; 4] = if level < levels {
            let off = (level - 1) * 3;
            [0x88, self.uid[off], self.uid[off + 1], self.uid[off + 2]]
        } else {
            let off = (levels - 1) * 3;
            [
                self.uid[off],
                self.uid[off + 1],
                self.uid[off + 2],
                self.uid[off + 3],
            ]
        };
        seg[..4].copy_from_slice(&body);
        seg[4] = body[0] ^ body[1] ^ body[2] ^ body[3];
        seg
    }
}

/// One pre-seeded answer for the next transceive that the card simulator
/// does not recognize.
#[derive(Debug, Clone, Default)]
pub struct ScriptedReply {
    /// Bytes delivered into the FIFO.
    pub data: Vec<u8>,
    /// Valid bits of the final byte, 0 meaning all eight.
    pub last_bits: u8,
    /// Value left in the error register.
    pub error_bits: u8,
    /// Value left in the collision register.
    pub coll_reg: u8,
    /// Deliver nothing and let the frame-wait timer expire instead.
    pub timeout: bool,
}

/// One frame the driver pushed through the antenna.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxFrame {
    /// Frame bytes as loaded into the FIFO.
    pub data: Vec<u8>,
    /// Valid bits of the final byte, 0 meaning all eight.
    pub last_bits: u8,
}

/// Mock transport for unit tests. Rather than replaying canned register
/// values it behaves like the chip: a register file, a FIFO, a command
/// execution unit and a small card simulator, so driver logic is tested
/// against chip semantics instead of against itself.
#[derive(Debug)]
pub struct MockTransport {
    /// Register file, indexed by datasheet address.
    pub registers: [u8; 64],
    /// The 64 byte FIFO behind the FifoData register.
    pub fifo: VecDeque<u8>,
    /// Cards in the field, served by the activation simulator.
    pub cards: Vec<SimCard>,
    /// Replies for frames the simulator does not recognize, FIFO order.
    pub scripted: VecDeque<ScriptedReply>,
    /// Every register write observed, in order (address, value).
    pub writes: Vec<(u8, u8)>,
    /// Every transmitted frame, in order.
    pub transmitted: Vec<TxFrame>,
    /// Testing hook: number of reads that should fail at the bus level.
    pub fail_reads: usize,
    /// Testing hook: number of writes that should fail at the bus level.
    pub fail_writes: usize,
    /// Testing hook: the CRC coprocessor never raises its interrupt.
    pub hang_crc: bool,
    /// Testing hook: corrupt the self test output stream.
    pub corrupt_selftest: bool,
    /// Testing hook: reads of Command keep the power-down bit set for
    /// this many polls after a wake-up is requested.
    pub slow_wake_polls: usize,
    /// Value of the version register, 0x92 unless a test overrides it.
    pub version_byte: u8,
    /// Simulated reset line level, `None` when not wired.
    pub reset_pin: Option<bool>,
    /// Reset line transitions driven by the driver, in order.
    pub reset_transitions: Vec<bool>,
    transceive_pending: bool,
    wake_countdown: Option<usize>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// Chip at power-on defaults, no cards in the field.
    pub fn new() -> Self {
        let mut mock = Self {
            registers: [0u8; 64],
            fifo: VecDeque::new(),
            cards: Vec::new(),
            scripted: VecDeque::new(),
            writes: Vec::new(),
            transmitted: Vec::new(),
            fail_reads: 0,
            fail_writes: 0,
            hang_crc: false,
            corrupt_selftest: false,
            slow_wake_polls: 0,
            version_byte: 0x92,
            reset_pin: None,
            reset_transitions: Vec::new(),
            transceive_pending: false,
            wake_countdown: None,
        };
        mock.power_on_defaults();
        mock
    }

    /// Mock with one simulated card already in the field.
    pub fn with_card(card: SimCard) -> Self {
        let mut mock = Self::new();
        mock.cards.push(card);
        mock
    }

    /// Reset the register file to chip power-on values.
    pub fn power_on_defaults(&mut self) {
        self.registers = [0u8; 64];
        self.registers[REG_VERSION] = self.version_byte;
        self.registers[Register::TxControl as usize] = 0x80;
        self.registers[Register::ModWidth as usize] = 0x26;
        self.registers[Register::Mode as usize] = 0x3F;
        self.registers[Register::RfCfg as usize] = 0x48;
        self.fifo.clear();
        self.transceive_pending = false;
    }

    /// Queue a clean byte-aligned reply.
    pub fn script_reply(&mut self, data: &[u8]) {
        self.scripted.push_back(ScriptedReply {
            data: data.to_vec(),
            ..Default::default()
        });
    }

    /// Queue a reply whose final byte carries only `last_bits` bits.
    pub fn script_reply_bits(&mut self, data: &[u8], last_bits: u8) {
        self.scripted.push_back(ScriptedReply {
            data: data.to_vec(),
            last_bits,
            ..Default::default()
        });
    }

    /// Queue a no-answer: the frame-wait timer fires instead.
    pub fn script_timeout(&mut self) {
        self.scripted.push_back(ScriptedReply {
            timeout: true,
            ..Default::default()
        });
    }

    /// Queue the 4-bit MIFARE ACK nibble.
    pub fn script_ack(&mut self) {
        self.script_reply_bits(&[0x0A], 4);
    }

    /// Queue a 4-bit MIFARE answer other than ACK.
    pub fn script_nibble(&mut self, nibble: u8) {
        self.script_reply_bits(&[nibble & 0x0F], 4);
    }

    /// Queue a reply with error register bits raised.
    pub fn script_error(&mut self, error_bits: u8) {
        self.scripted.push_back(ScriptedReply {
            error_bits,
            ..Default::default()
        });
    }

    /// Queue a collision; `coll_reg` is the raw Coll register value.
    pub fn script_collision(&mut self, data: &[u8], coll_reg: u8) {
        self.scripted.push_back(ScriptedReply {
            data: data.to_vec(),
            error_bits: 0x08,
            coll_reg,
            ..Default::default()
        });
    }

    /// All values written to one register, in order.
    pub fn writes_to(&self, reg: Register) -> Vec<u8> {
        let addr = reg as u8;
        self.writes
            .iter()
            .filter(|(a, _)| *a == addr)
            .map(|(_, v)| *v)
            .collect()
    }

    fn write_one(&mut self, addr: u8, value: u8) {
        self.writes.push((addr, value));
        let idx = addr as usize;
        match idx {
            i if i == Register::FifoData as usize => {
                if self.fifo.len() >= crate::constants::FIFO_SIZE {
                    self.registers[REG_ERROR] |= 0x10;
                } else {
                    self.fifo.push_back(value);
                }
            }
            REG_FIFO_LEVEL => {
                // Bit 7 is FlushBuffer
                if value & 0x80 != 0 {
                    self.fifo.clear();
                }
            }
            REG_COM_IRQ | REG_DIV_IRQ => {
                // Bit 7 selects set (1) or clear (0) for the masked bits
                if value & 0x80 != 0 {
                    self.registers[idx] |= value & 0x7F;
                } else {
                    self.registers[idx] &= !(value & 0x7F);
                }
            }
            REG_COMMAND => {
                let had_power_down = self.registers[REG_COMMAND] & 0x10 != 0;
                self.registers[REG_COMMAND] = value;
                if had_power_down && value & 0x10 == 0 && self.slow_wake_polls > 0 {
                    // Oscillator start-up: the bit reads back as set for a
                    // few polls before the chip clears it
                    self.registers[REG_COMMAND] |= 0x10;
                    self.wake_countdown = Some(self.slow_wake_polls);
                }
                self.execute(value & 0x0F);
            }
            REG_BIT_FRAMING => {
                self.registers[idx] = value;
                if value & 0x80 != 0 && self.transceive_pending {
                    self.registers[REG_BIT_FRAMING] &= 0x7F;
                    self.transceive_pending = false;
                    self.run_transceive();
                }
            }
            _ => {
                if idx < self.registers.len() {
                    self.registers[idx] = value;
                }
            }
        }
    }

    fn read_one(&mut self, addr: u8) -> u8 {
        let idx = addr as usize;
        match idx {
            REG_FIFO_LEVEL => self.fifo.len() as u8,
            i if i == Register::FifoData as usize => self.fifo.pop_front().unwrap_or(0),
            REG_COMMAND => {
                if let Some(n) = self.wake_countdown {
                    if n == 0 {
                        self.registers[REG_COMMAND] &= !0x10;
                        self.wake_countdown = None;
                    } else {
                        self.wake_countdown = Some(n - 1);
                    }
                }
                self.registers[REG_COMMAND]
            }
            _ if idx < self.registers.len() => self.registers[idx],
            _ => 0,
        }
    }

    fn execute(&mut self, command: u8) {
        // Error flags refer to the previous command; starting a new one
        // clears them
        if command != PcdCommand::Idle as u8 && command != PcdCommand::NoCmdChange as u8 {
            self.registers[REG_ERROR] = 0;
        }
        match command {
            c if c == PcdCommand::SoftReset as u8 => {
                let slow = self.slow_wake_polls;
                self.power_on_defaults();
                if slow > 0 {
                    self.registers[REG_COMMAND] = 0x10;
                    self.wake_countdown = Some(slow);
                }
            }
            c if c == PcdCommand::CalcCrc as u8 => {
                if self.registers[REG_AUTO_TEST] == 0x09 {
                    self.run_self_test();
                } else if !self.hang_crc {
                    let data: Vec<u8> = self.fifo.drain(..).collect();
                    let crc = crc_a(&data);
                    self.registers[REG_CRC_L] = crc[0];
                    self.registers[REG_CRC_H] = crc[1];
                    self.registers[REG_DIV_IRQ] |= 0x04;
                }
            }
            c if c == PcdCommand::Mem as u8 => {
                self.fifo.clear();
            }
            c if c == PcdCommand::MfAuthent as u8 => {
                self.run_authent();
            }
            c if c == PcdCommand::Transceive as u8 => {
                self.transceive_pending = true;
            }
            c if c == PcdCommand::Idle as u8 => {
                self.transceive_pending = false;
            }
            _ => {}
        }
    }

    fn run_self_test(&mut self) {
        self.fifo.clear();
        let version = crate::types::FirmwareVersion::from_byte(self.version_byte);
        let mut out = match crate::pcd::reference_for(version) {
            Some(table) => table.to_vec(),
            None => vec![0u8; 64],
        };
        if self.corrupt_selftest {
            out[63] ^= 0xFF;
        }
        self.fifo.extend(out);
    }

    fn run_authent(&mut self) {
        let frame: Vec<u8> = self.fifo.drain(..).collect();
        if frame.len() != 12 {
            self.registers[REG_COM_IRQ] |= 0x01;
            return;
        }
        let key = &frame[2..8];
        let uid4 = &frame[8..12];
        let matched = self.cards.iter().any(|card| {
            if card.uid.len() < 4 {
                return false;
            }
            let tail = &card.uid[card.uid.len() - 4..];
            let expected = match frame[0] {
                0x60 => &card.key_a,
                0x61 => &card.key_b,
                _ => return false,
            };
            tail == uid4 && expected == key
        });
        if matched {
            self.registers[REG_STATUS2] |= 0x08;
            self.registers[REG_COM_IRQ] |= 0x10;
        } else {
            self.registers[REG_COM_IRQ] |= 0x01;
        }
    }

    fn run_transceive(&mut self) {
        let tx: Vec<u8> = self.fifo.drain(..).collect();
        let tx_last_bits = self.registers[REG_BIT_FRAMING] & 0x07;
        self.transmitted.push(TxFrame {
            data: tx.clone(),
            last_bits: tx_last_bits,
        });

        if !self.cards.is_empty() && Self::is_activation_frame(&tx, tx_last_bits) {
            self.run_card_model(&tx);
            return;
        }

        match self.scripted.pop_front() {
            Some(reply) if reply.timeout => {
                self.registers[REG_COM_IRQ] |= 0x01;
            }
            Some(reply) => {
                self.fifo.extend(reply.data.iter());
                self.registers[REG_CONTROL] =
                    (self.registers[REG_CONTROL] & !0x07) | (reply.last_bits & 0x07);
                self.registers[REG_ERROR] = reply.error_bits;
                self.registers[REG_COLL] = reply.coll_reg;
                self.registers[REG_COM_IRQ] |= 0x30;
            }
            None => {
                self.registers[REG_COM_IRQ] |= 0x01;
            }
        }
    }

    fn is_activation_frame(tx: &[u8], tx_last_bits: u8) -> bool {
        match tx.first() {
            Some(0x26) | Some(0x52) => tx.len() == 1 && tx_last_bits == 7,
            Some(0x93) | Some(0x95) | Some(0x97) => tx.len() >= 2,
            Some(0x50) => tx.len() == 4 && tx[1] == 0x00,
            _ => false,
        }
    }

    fn run_card_model(&mut self, tx: &[u8]) {
        match tx[0] {
            0x26 | 0x52 => self.model_request(tx[0]),
            0x50 => self.model_halt(tx),
            sel => self.model_select(sel, tx),
        }
    }

    fn model_request(&mut self, command: u8) {
        let mut atqa = [0u8; 2];
        let mut answered = false;
        for card in &mut self.cards {
            let wakes = match card.state {
                CardState::Idle => true,
                CardState::Halted => command == 0x52,
                _ => false,
            };
            if wakes {
                card.state = CardState::Ready;
                atqa[0] |= card.atqa[0];
                atqa[1] |= card.atqa[1];
                answered = true;
            }
        }
        if answered {
            self.fifo.extend(atqa);
            self.registers[REG_CONTROL] &= !0x07;
            self.registers[REG_COM_IRQ] |= 0x30;
        } else {
            self.registers[REG_COM_IRQ] |= 0x01;
        }
    }

    fn model_halt(&mut self, tx: &[u8]) {
        if crc_a(&tx[..2]) == [tx[2], tx[3]] {
            for card in &mut self.cards {
                if matches!(card.state, CardState::Ready | CardState::Active) {
                    card.state = CardState::Halted;
                }
            }
        }
        // A halting card stays silent, so the timer always fires
        self.registers[REG_COM_IRQ] |= 0x01;
    }

    fn model_select(&mut self, sel: u8, tx: &[u8]) {
        let level = match sel {
            0x93 => 1,
            0x95 => 2,
            _ => 3,
        };
        let nvb = tx[1];
        if nvb == 0x70 {
            self.model_full_select(level, tx);
        } else {
            self.model_anticollision(level, nvb, tx);
        }
    }

    fn model_full_select(&mut self, level: usize, tx: &[u8]) {
        if tx.len() != 9
            || crc_a(&tx[..7]) != [tx[7], tx[8]]
            || tx[6] != (tx[2] ^ tx[3] ^ tx[4] ^ tx[5])
        {
            self.registers[REG_COM_IRQ] |= 0x01;
            return;
        }
        let mut response = None;
        for card in &mut self.cards {
            if card.state != CardState::Ready || card.cascade_levels() < level {
                continue;
            }
            let seg = card.segment(level);
            if seg[..4] != tx[2..6] {
                continue;
            }
            let sak = if level < card.cascade_levels() {
                0x04
            } else {
                card.state = CardState::Active;
                card.sak
            };
            response = Some(sak);
            break;
        }
        match response {
            Some(sak) => {
                let crc = crc_a(&[sak]);
                self.fifo.extend([sak, crc[0], crc[1]]);
                self.registers[REG_CONTROL] &= !0x07;
                self.registers[REG_COM_IRQ] |= 0x30;
            }
            None => {
                self.registers[REG_COM_IRQ] |= 0x01;
            }
        }
    }

    fn model_anticollision(&mut self, level: usize, nvb: u8, tx: &[u8]) {
        let known = (((nvb >> 4).saturating_sub(2)) as usize) * 8 + (nvb & 0x0F) as usize;
        let rx_align = ((self.registers[REG_BIT_FRAMING] >> 4) & 0x07) as usize;

        let sent_bit = |i: usize| -> u8 { (tx[2 + i / 8] >> (i % 8)) & 1 };
        let seg_bit = |seg: &[u8; 5], i: usize| -> u8 { (seg[i / 8] >> (i % 8)) & 1 };

        let mut participants: Vec<[u8; 5]> = Vec::new();
        for card in &self.cards {
            if card.state != CardState::Ready || card.cascade_levels() < level {
                continue;
            }
            let seg = card.segment(level);
            if (0..known).all(|i| seg_bit(&seg, i) == sent_bit(i)) {
                participants.push(seg);
            }
        }
        if participants.is_empty() {
            self.registers[REG_COM_IRQ] |= 0x01;
            return;
        }

        // First bit at which the remaining participants disagree, if any
        let mut collision_at = None;
        for i in known..40 {
            let first = seg_bit(&participants[0], i);
            if participants[1..].iter().any(|seg| seg_bit(seg, i) != first) {
                collision_at = Some(i);
                break;
            }
        }

        let source = participants[0];
        match collision_at {
            Some(bit) => {
                self.deliver_bits(&source, known, bit - known, rx_align);
                self.registers[REG_ERROR] |= 0x08;
                // CollPos is 1-based and 32 is encoded as 0
                let pos = (bit + 1) as u8;
                self.registers[REG_COLL] = if pos == 32 { 0x00 } else { pos & 0x1F };
                self.registers[REG_COM_IRQ] |= 0x30;
            }
            None => {
                self.deliver_bits(&source, known, 40 - known, rx_align);
                self.registers[REG_ERROR] = 0;
                self.registers[REG_COM_IRQ] |= 0x30;
            }
        }
    }

    /// Put `bits` response bits, starting at segment bit `from`, into the
    /// FIFO at the requested receive alignment.
    fn deliver_bits(&mut self, seg: &[u8; 5], from: usize, bits: usize, rx_align: usize) {
        if bits > 0 {
            let mut bytes = vec![0u8; (rx_align + bits).div_ceil(8)];
            for j in 0..bits {
                let bit = (seg[(from + j) / 8] >> ((from + j) % 8)) & 1;
                if bit != 0 {
                    bytes[(rx_align + j) / 8] |= 1 << ((rx_align + j) % 8);
                }
            }
            self.fifo.extend(bytes);
        }
        self.registers[REG_CONTROL] =
            (self.registers[REG_CONTROL] & !0x07) | (((rx_align + bits) % 8) as u8);
    }
}

impl Transport for MockTransport {
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<()> {
        if self.fail_writes > 0 {
            self.fail_writes -= 1;
            return Err(Error::Transport("injected write fault".to_string()));
        }
        for &byte in data {
            self.write_one(addr, byte);
        }
        Ok(())
    }

    fn read(&mut self, addr: u8, out: &mut [u8]) -> Result<()> {
        if self.fail_reads > 0 {
            self.fail_reads -= 1;
            return Err(Error::Transport("injected read fault".to_string()));
        }
        for slot in out.iter_mut() {
            *slot = self.read_one(addr);
        }
        Ok(())
    }

    fn reset_level(&mut self) -> Option<bool> {
        self.reset_pin
    }

    fn set_reset(&mut self, high: bool) -> Result<()> {
        self.reset_transitions.push(high);
        let was_low = self.reset_pin == Some(false);
        self.reset_pin = Some(high);
        if was_low && high {
            self.power_on_defaults();
        }
        Ok(())
    }
}

// Shared handle so tests can keep poking at the mock after the driver has
// taken ownership of a boxed copy.
impl Transport for std::rc::Rc<std::cell::RefCell<MockTransport>> {
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<()> {
        self.borrow_mut().write(addr, data)
    }

    fn read(&mut self, addr: u8, out: &mut [u8]) -> Result<()> {
        self.borrow_mut().read(addr, out)
    }

    fn reset_level(&mut self) -> Option<bool> {
        self.borrow_mut().reset_level()
    }

    fn set_reset(&mut self, high: bool) -> Result<()> {
        self.borrow_mut().set_reset(high)
    }
}
