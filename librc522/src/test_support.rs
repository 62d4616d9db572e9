// librc522-rs/librc522/src/test_support.rs

//! Test support helpers intended for use by unit and integration tests.
//!
//! These helpers centralize common MockTransport setup so tests across the
//! crate and tests/ directory can reuse the same logic.
#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use crate::pcd::{Initialized, Pcd, Uninitialized};
use crate::picc::checksum::crc_a;
use crate::time::MockClock;
use crate::transport::{MockTransport, SimCard};
use crate::Result;

/// Shared handle to a mock transport. Tests keep one end for scripting and
/// inspection while the reader owns a boxed clone of the other.
pub type SharedMock = Rc<RefCell<MockTransport>>;

/// Reader over a fresh mock with no card in the field, not yet initialized.
#[doc(hidden)]
pub fn mock_pcd() -> (Pcd<Uninitialized>, SharedMock) {
    let mock = Rc::new(RefCell::new(MockTransport::new()));
    let pcd = Pcd::new(Box::new(Rc::clone(&mock)), Box::new(MockClock::new()));
    (pcd, mock)
}

/// Initialized reader over a fresh mock with no card in the field.
#[doc(hidden)]
pub fn initialized_mock_pcd() -> Result<(Pcd<Initialized>, SharedMock)> {
    let (pcd, mock) = mock_pcd();
    Ok((pcd.initialize()?, mock))
}

/// Initialized reader with one simulated card in the field.
#[doc(hidden)]
pub fn initialized_mock_pcd_with_card(card: SimCard) -> Result<(Pcd<Initialized>, SharedMock)> {
    let mock = Rc::new(RefCell::new(MockTransport::with_card(card)));
    let pcd = Pcd::new(Box::new(Rc::clone(&mock)), Box::new(MockClock::new())).initialize()?;
    Ok((pcd, mock))
}

/// Append a CRC_A to `body`, the way a card finishes its answers.
#[doc(hidden)]
pub fn with_crc(body: &[u8]) -> Vec<u8> {
    let mut frame = body.to_vec();
    frame.extend_from_slice(&crc_a(body));
    frame
}

/// Script `body` plus its CRC_A as the next unrecognized-frame answer.
#[doc(hidden)]
pub fn script_with_crc(mock: &SharedMock, body: &[u8]) {
    let frame = with_crc(body);
    mock.borrow_mut().script_reply(&frame);
}
