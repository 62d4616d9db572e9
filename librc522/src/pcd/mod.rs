// librc522-rs/librc522/src/pcd/mod.rs

//! Reader (PCD) handle: lifecycle, register access, the timed command
//! engine and the CRC coprocessor.

use std::marker::PhantomData;

use log::debug;

use crate::constants::{POWER_UP_BUDGET_MS, RESET_SETTLE_MS};
use crate::time::{Clock, StdClock};
use crate::transport::Transport;
use crate::types::FirmwareVersion;
use crate::{Error, Result};

pub mod registers;

mod crc;
mod io;
mod selftest;
mod transceive;

pub use registers::{AntennaGain, PcdCommand, Register};
pub use selftest::SelfTestOutcome;
pub use transceive::Received;

pub(crate) use selftest::reference_for;

/// Type-state marker: reader constructed but not yet configured.
pub struct Uninitialized;
/// Type-state marker: baseline registers written, antenna on.
pub struct Initialized;

/// Reader handle that enforces the initialization sequence at compile
/// time: only an initialized reader exposes the protocol operations.
pub struct Pcd<State = Uninitialized> {
    transport: Box<dyn Transport>,
    clock: Box<dyn Clock>,
    _state: PhantomData<State>,
}

impl Pcd<Uninitialized> {
    /// Create a reader handle over a transport and an explicit clock.
    pub fn new(transport: Box<dyn Transport>, clock: Box<dyn Clock>) -> Self {
        Self {
            transport,
            clock,
            _state: PhantomData,
        }
    }

    /// Create a reader handle using the wall clock. This is the normal
    /// constructor; tests inject a mock clock through [`Pcd::new`].
    pub fn new_with_transport(transport: Box<dyn Transport>) -> Self {
        Self::new(transport, Box::new(StdClock::new()))
    }

    /// Reset the chip and bring its registers to the driver's baseline.
    /// Returns an initialized reader on success.
    pub fn initialize(self) -> Result<Pcd<Initialized>> {
        let mut this = self;
        this.reset_chip()?;
        this.init_registers()?;

        let version = this.version()?;
        debug!("reader initialized, firmware {}", version);

        Ok(Pcd {
            transport: this.transport,
            clock: this.clock,
            _state: PhantomData,
        })
    }
}

impl<State> Pcd<State> {
    /// Hard reset over the NRSTPD line when the transport has one wired
    /// and reports the chip held in power-down, soft reset otherwise.
    pub(crate) fn reset_chip(&mut self) -> Result<()> {
        if self.transport.reset_level() == Some(false) {
            self.transport.set_reset(false)?;
            self.clock.delay_ms(1);
            self.transport.set_reset(true)?;
            self.clock.delay_ms(RESET_SETTLE_MS);
            return Ok(());
        }

        self.write_register(Register::Command, PcdCommand::SoftReset as u8)?;
        // The power-down bit stays up while the oscillator starts; give it
        // up to three settle periods
        for _ in 0..3 {
            self.clock.delay_ms(RESET_SETTLE_MS);
            if self.read_register(Register::Command)? & 0x10 == 0 {
                break;
            }
        }
        Ok(())
    }

    /// Baseline register setup: 106 kbit/s both ways, 25 ms frame-wait
    /// timer, 100 % ASK, CRC preset 0x6363.
    pub(crate) fn init_registers(&mut self) -> Result<()> {
        self.write_register(Register::TxMode, 0x00)?;
        self.write_register(Register::RxMode, 0x00)?;
        self.write_register(Register::ModWidth, 0x26)?;

        // TAuto=1: the timer starts automatically at the end of transmission
        self.write_register(Register::TMode, 0x80)?;
        // 40 kHz timer tick, reload 1000 -> 25 ms until TimerIRq
        self.write_register(Register::TPrescaler, 0xA9)?;
        self.write_register(Register::TReloadH, 0x03)?;
        self.write_register(Register::TReloadL, 0xE8)?;

        self.write_register(Register::TxAsk, 0x40)?;
        self.write_register(Register::Mode, 0x3D)?;
        self.antenna_on()
    }

    /// Switch the antenna drivers on if they are off.
    pub fn antenna_on(&mut self) -> Result<()> {
        let value = self.read_register(Register::TxControl)?;
        if value & 0x03 != 0x03 {
            self.write_register(Register::TxControl, value | 0x03)?;
        }
        Ok(())
    }

    /// Switch the antenna drivers off.
    pub fn antenna_off(&mut self) -> Result<()> {
        self.clear_register_bits(Register::TxControl, 0x03)
    }

    /// Current receiver gain.
    pub fn antenna_gain(&mut self) -> Result<AntennaGain> {
        let value = self.read_register(Register::RfCfg)?;
        Ok(AntennaGain::from_bits((value >> 4) & 0x07))
    }

    /// Set the receiver gain. No register traffic when the chip already
    /// runs at the requested gain.
    pub fn set_antenna_gain(&mut self, gain: AntennaGain) -> Result<()> {
        if self.antenna_gain()? != gain {
            self.clear_register_bits(Register::RfCfg, 0x70)?;
            self.set_register_bits(Register::RfCfg, (gain as u8) << 4)?;
        }
        Ok(())
    }

    /// Firmware revision from the version register.
    pub fn version(&mut self) -> Result<FirmwareVersion> {
        let byte = self.read_register(Register::Version)?;
        Ok(FirmwareVersion::from_byte(byte))
    }

    /// Let the analog path settle after a mode change.
    pub(crate) fn settle(&mut self, ms: u64) {
        self.clock.delay_ms(ms);
    }

    /// Enter soft power-down. Only register access works in this mode;
    /// the antenna and the oscillator are off.
    pub fn soft_power_down(&mut self) -> Result<()> {
        self.set_register_bits(Register::Command, 0x10)
    }

    /// Leave soft power-down and wait for the oscillator to come back.
    pub fn soft_power_up(&mut self) -> Result<()> {
        self.clear_register_bits(Register::Command, 0x10)?;

        let deadline = self.clock.now_ms() + POWER_UP_BUDGET_MS;
        loop {
            if self.read_register(Register::Command)? & 0x10 == 0 {
                return Ok(());
            }
            self.clock.yield_now();
            if self.clock.now_ms() >= deadline {
                return Err(Error::Timeout);
            }
        }
    }
}

impl Pcd<Initialized> {
    /// Re-run the reset and baseline setup, for instance after the chip
    /// lost power or a self test scrambled its state.
    pub fn reset(&mut self) -> Result<()> {
        self.reset_chip()?;
        self.init_registers()
    }
}
