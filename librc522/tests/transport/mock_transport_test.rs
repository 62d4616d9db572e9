use librc522::pcd::Register;
use librc522::transport::{MockTransport, Transport};

#[test]
fn register_file_round_trips_single_writes() {
    let mut m = MockTransport::new();
    m.write(Register::TxAsk as u8, &[0x40]).unwrap();

    let mut out = [0u8; 1];
    m.read(Register::TxAsk as u8, &mut out).unwrap();
    assert_eq!(out[0], 0x40);
    assert_eq!(m.writes_to(Register::TxAsk), vec![0x40]);
}

#[test]
fn burst_write_feeds_the_fifo_in_order() {
    let mut m = MockTransport::new();
    m.write(Register::FifoData as u8, &[0x10, 0x20, 0x30]).unwrap();

    let mut level = [0u8; 1];
    m.read(Register::FifoLevel as u8, &mut level).unwrap();
    assert_eq!(level[0], 3);

    let mut out = [0u8; 3];
    m.read(Register::FifoData as u8, &mut out).unwrap();
    assert_eq!(out, [0x10, 0x20, 0x30]);
}

#[test]
fn reset_line_transitions_are_observable() {
    let mut m = MockTransport::new();
    assert_eq!(m.reset_level(), None);

    m.reset_pin = Some(false);
    assert_eq!(m.reset_level(), Some(false));

    m.set_reset(true).unwrap();
    assert_eq!(m.reset_level(), Some(true));
    assert_eq!(m.reset_transitions, vec![true]);
}

#[test]
fn rising_reset_restores_power_on_defaults() {
    let mut m = MockTransport::new();
    m.reset_pin = Some(true);
    m.write(Register::TxAsk as u8, &[0x40]).unwrap();

    m.set_reset(false).unwrap();
    m.set_reset(true).unwrap();

    let mut out = [0u8; 1];
    m.read(Register::TxAsk as u8, &mut out).unwrap();
    assert_eq!(out[0], 0x00);
    m.read(Register::Version as u8, &mut out).unwrap();
    assert_eq!(out[0], 0x92);
}
