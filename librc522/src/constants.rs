// librc522-rs/librc522/src/constants.rs
//! Common protocol and chip constants used across the crate

/// SPI clock used when the driver opens the bus itself. The chip is rated
/// for 10 MHz; 4 MHz leaves margin on long wires.
pub const SPI_CLOCK_HZ: u32 = 4_000_000;

/// Depth of the chip's transmit/receive FIFO in bytes
pub const FIFO_SIZE: usize = 64;

/// Budget for one CRC coprocessor run in milliseconds. The datasheet worst
/// case for 64 bytes is 73 us, so this is generous by orders of magnitude.
pub const CRC_BUDGET_MS: u64 = 89;

/// Budget for one transceive in milliseconds, on top of the chip's own
/// 25 ms frame-wait timer
pub const TRANSCEIVE_BUDGET_MS: u64 = 36;

/// Budget for the chip to leave soft power-down once the bit is cleared
pub const POWER_UP_BUDGET_MS: u64 = 500;

/// Oscillator settle time after a hard reset, in milliseconds
pub const RESET_SETTLE_MS: u64 = 50;

/// The 4-bit MIFARE acknowledge nibble
pub const MF_ACK: u8 = 0x0A;

/// Length of a MIFARE Classic sector key in bytes
pub const MF_KEY_SIZE: usize = 6;
