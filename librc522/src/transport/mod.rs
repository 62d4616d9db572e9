// librc522-rs/librc522/src/transport/mod.rs

pub mod mock;
#[cfg(feature = "rppal")]
pub mod rppal;
pub mod traits;

pub use mock::{CardState, MockTransport, ScriptedReply, SimCard, TxFrame};
#[cfg(feature = "rppal")]
pub use rppal::SpiTransport;
pub use traits::Transport;
