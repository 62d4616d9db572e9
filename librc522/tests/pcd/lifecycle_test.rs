#[path = "../common/mod.rs"]
mod common;

use librc522::pcd::Register;
use librc522::FirmwareVersion;

#[test]
fn initialize_brings_up_the_protocol_baseline() {
    let (pcd, mock) = common::helpers::mock_pcd();
    let mut pcd = pcd.initialize().unwrap();

    assert_eq!(pcd.version().unwrap(), FirmwareVersion::V2_0);

    let mock = mock.borrow();
    // 106 kbit/s both ways, 25 ms frame-wait timer, forced 100 % ASK
    assert_eq!(mock.writes_to(Register::TxMode), vec![0x00]);
    assert_eq!(mock.writes_to(Register::RxMode), vec![0x00]);
    assert_eq!(mock.writes_to(Register::TMode), vec![0x80]);
    assert_eq!(mock.writes_to(Register::TPrescaler), vec![0xA9]);
    assert_eq!(mock.writes_to(Register::TxAsk), vec![0x40]);
    assert_eq!(mock.writes_to(Register::Mode), vec![0x3D]);
    assert_eq!(mock.registers[Register::TxControl as usize] & 0x03, 0x03);
}

#[test]
fn version_follows_the_chip() {
    for (byte, expected) in [(0x91u8, FirmwareVersion::V1_0), (0x88, FirmwareVersion::Clone)] {
        let (pcd, mock) = common::helpers::mock_pcd();
        mock.borrow_mut().version_byte = byte;
        let mut pcd = pcd.initialize().unwrap();
        assert_eq!(pcd.version().unwrap(), expected);
    }
}

#[test]
fn wired_reset_line_is_pulsed_instead_of_soft_reset() {
    let (pcd, mock) = common::helpers::mock_pcd();
    // NRSTPD wired and currently holding the chip in power-down
    mock.borrow_mut().reset_pin = Some(false);

    let _pcd = pcd.initialize().unwrap();

    let mock = mock.borrow();
    assert_eq!(mock.reset_transitions, vec![false, true]);
    // Baseline still applied after the pulse
    assert_eq!(mock.registers[Register::Mode as usize], 0x3D);
}

#[test]
fn power_down_round_trip_with_a_slow_oscillator() {
    let (mut pcd, mock) = common::helpers::initialized_mock_pcd().unwrap();
    mock.borrow_mut().slow_wake_polls = 5;

    pcd.soft_power_down().unwrap();
    assert_ne!(
        mock.borrow().registers[Register::Command as usize] & 0x10,
        0
    );

    // Comes back even though the power-down bit lingers for a few polls
    pcd.soft_power_up().unwrap();
    assert_eq!(
        mock.borrow().registers[Register::Command as usize] & 0x10,
        0
    );
}

#[test]
fn reset_restores_a_scrambled_chip() {
    let (mut pcd, mock) = common::helpers::initialized_mock_pcd().unwrap();
    {
        let mut mock = mock.borrow_mut();
        mock.registers[Register::Mode as usize] = 0x00;
        mock.registers[Register::TMode as usize] = 0x55;
    }

    pcd.reset().unwrap();

    let mock = mock.borrow();
    assert_eq!(mock.registers[Register::Mode as usize], 0x3D);
    assert_eq!(mock.registers[Register::TMode as usize], 0x80);
}
