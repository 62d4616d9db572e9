// librc522-rs/librc522/src/prelude.rs

pub use crate::mifare::{AccessBits, KeyType, SectorLayout, ValueBlock};
pub use crate::pcd::Pcd;
pub use crate::pcd::{Initialized, Uninitialized};
pub use crate::picc::{BasicSelection, PiccType, Selection, TagSession};
pub use crate::tcl::{Ats, TagBitRate, TclSelection};
pub use crate::time::{Clock, StdClock};
pub use crate::transport::Transport;
pub use crate::{Atqa, Error, FirmwareVersion, MifareKey, Result, Uid};
