use std::cell::RefCell;
use std::rc::Rc;

use librc522::pcd::Register;
use librc522::time::MockClock;
use librc522::transport::{MockTransport, Transport};
use librc522::{Error, Pcd};

#[test]
fn injected_read_failure_then_recovery() {
    let mut m = MockTransport::new();
    m.fail_reads = 1;

    let mut out = [0u8; 1];
    assert!(matches!(
        m.read(Register::Version as u8, &mut out),
        Err(Error::Transport(_))
    ));

    // The fault was one-shot
    m.read(Register::Version as u8, &mut out).unwrap();
    assert_eq!(out[0], 0x92);
}

#[test]
fn bus_fault_during_initialization_propagates() {
    let mut m = MockTransport::new();
    m.fail_writes = 1;

    let pcd = Pcd::new(Box::new(m), Box::new(MockClock::new()));
    assert!(matches!(pcd.initialize(), Err(Error::Transport(_))));
}

#[test]
fn bus_fault_mid_exchange_aborts_upward() {
    let mock = Rc::new(RefCell::new(MockTransport::new()));
    let pcd = Pcd::new(Box::new(Rc::clone(&mock)), Box::new(MockClock::new()));
    let mut pcd = pcd.initialize().unwrap();

    mock.borrow_mut().fail_writes = 1;
    let mut back = [0u8; 4];
    assert!(matches!(
        pcd.transceive(&[0x26], 7, &mut back, 0, false),
        Err(Error::Transport(_))
    ));

    // The next exchange is unaffected
    mock.borrow_mut().script_reply(&[0x04, 0x00]);
    let received = pcd.transceive(&[0x26], 7, &mut back, 0, false).unwrap();
    assert_eq!(received.len, 2);
}
