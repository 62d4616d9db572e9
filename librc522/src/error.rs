// librc522-rs/librc522/src/error.rs

use thiserror::Error;

/// 共通エラー型
///
/// Every protocol operation resolves to `Ok` or exactly one of these
/// variants; callers branch on the variant the way the wire protocol
/// branches on its status byte.
#[derive(Error, Debug)]
pub enum Error {
    /// The reader flagged a communication fault (parity, protocol or
    /// buffer-overflow bits in its error register).
    #[error("communication fault flagged by the reader")]
    Communication,

    /// More than one card answered in the same frame. `position` is the
    /// first colliding bit within the current anticollision segment
    /// (1..=32), or `None` when the chip reports it as unrepresentable.
    /// `partial` holds the bits received before the collision; bits after
    /// it read as zero.
    #[error("bit collision in the received frame")]
    Collision {
        /// First colliding bit, or `None` for an unrepresentable position.
        position: Option<u8>,
        /// Bytes received up to the collision.
        partial: Vec<u8>,
        /// Valid bits of the final partial byte, 0 meaning all eight.
        partial_bits: u8,
    },

    /// Nothing came back within the completion budget.
    #[error("no response from the card within the completion budget")]
    Timeout,

    /// The answer does not fit the caller's buffer.
    #[error("response too large: {needed} bytes offered, room for {capacity}")]
    NoRoom {
        /// Bytes the card offered.
        needed: usize,
        /// Bytes the caller's buffer can take.
        capacity: usize,
    },

    /// A protocol invariant was violated. Driver or hardware fault; not
    /// worth retrying.
    #[error("internal error: {0}")]
    Internal(&'static str),

    /// A caller-supplied argument fails a precondition.
    #[error("invalid argument: {0}")]
    Invalid(&'static str),

    /// The trailing checksum of the answer does not match its payload.
    #[error("CRC_A mismatch on the received frame")]
    CrcWrong,

    /// The card refused the command with a NAK nibble.
    #[error("card answered NAK")]
    MifareNack,

    /// Failure below the register layer, reported by the bus backend.
    #[error("transport error: {0}")]
    Transport(String),

    /// The operation is not wired up on this transport or configuration.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    // rppal バックエンドを後から有効化できるように optional dependency にしている
    /// SPI bus failure from the rppal backend.
    #[cfg(feature = "rppal")]
    #[error("spi error: {0}")]
    Spi(#[from] rppal::spi::Error),

    /// GPIO failure from the rppal backend.
    #[cfg(feature = "rppal")]
    #[error("gpio error: {0}")]
    Gpio(#[from] rppal::gpio::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
