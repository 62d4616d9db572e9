// librc522-rs/librc522/src/lib.rs

//! librc522
//!
//! Pure Rust driver for the NXP MFRC522 contactless reader IC.
#![warn(missing_docs)]

pub mod constants;
pub mod error;
pub mod mifare;
pub mod pcd;
pub mod picc;
pub mod prelude;
pub mod tcl;
pub mod test_support;
pub mod time;
pub mod transport;
pub mod types;

// Re-export common types at crate root so `crate::Error`, `crate::Result`,
// and the newtypes in `types` are available for consumers and for
// convenient `prelude` re-exports.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;
