#[path = "../common/mod.rs"]
mod common;

use librc522::pcd::Register;
use librc522::prelude::*;
use librc522::transport::CardState;

fn tcl_selected() -> (
    librc522::Pcd<Initialized>,
    common::helpers::SharedMock,
    TagSession,
) {
    let (mut pcd, mock) =
        common::helpers::initialized_mock_pcd_with_card(common::fixtures::desfire_card()).unwrap();
    common::helpers::script_with_crc(&mock, &common::fixtures::desfire_ats_body());
    // PPS echo
    common::helpers::script_with_crc(&mock, &[0xD0]);

    let mut strategy = TclSelection;
    let mut session = TagSession::new();
    assert!(strategy.card_present(&mut pcd, &mut session).unwrap());
    strategy.select(&mut pcd, &mut session).unwrap();
    (pcd, mock, session)
}

#[test]
fn full_activation_negotiates_ats_and_rates() {
    let (_pcd, mock, session) = tcl_selected();

    assert_eq!(session.picc_type(), Some(PiccType::MifareDesfire));
    let ats = session.ats.as_ref().unwrap();
    assert_eq!(ats.fsc, 64);
    assert_eq!(ats.tb1.unwrap().fwi, 8);
    assert!(session.supports_cid());

    let mock = mock.borrow();
    // RATS with FSDI 5 and CID 0, then the PPS, then 212 kbit/s both ways
    assert!(mock
        .transmitted
        .iter()
        .any(|f| f.data.len() >= 2 && f.data[..2] == [0xE0, 0x50]));
    assert!(mock.transmitted.iter().any(|f| f.data.first() == Some(&0xD0)));
    assert_eq!(mock.registers[Register::TxMode as usize] & 0xF0, 0x90);
    assert_eq!(mock.registers[Register::RxMode as usize] & 0xF0, 0x90);
}

#[test]
fn declining_ats_keeps_plain_14443_3_activation() {
    let (mut pcd, mock) =
        common::helpers::initialized_mock_pcd_with_card(common::fixtures::desfire_card()).unwrap();
    // no scripted ATS: the RATS times out and the card is halted

    let mut strategy = TclSelection;
    let mut session = TagSession::new();
    assert!(strategy.card_present(&mut pcd, &mut session).unwrap());
    strategy.select(&mut pcd, &mut session).unwrap();

    assert!(session.uid.is_some());
    assert!(session.ats.is_none());
    assert_eq!(mock.borrow().cards[0].state, CardState::Halted);

    // The card still answers a wakeup afterwards
    assert!(pcd.wakeup_a().is_ok());
}

#[test]
fn reselection_resets_the_block_toggle() {
    let (mut pcd, mock, mut session) = tcl_selected();

    // Chip-side CRC is on after the PPS, so the visible answer has none
    mock.borrow_mut().script_reply(&[0x0A, 0x00, 0x90, 0x00]);
    let mut back = [0u8; 8];
    pcd.tcl_transceive(&mut session, &[0x00], &mut back).unwrap();
    assert!(session.block_number);

    // A fresh detection starts the session over
    mock.borrow_mut().cards[0].state = CardState::Idle;
    let mut strategy = TclSelection;
    assert!(strategy.card_present(&mut pcd, &mut session).unwrap());
    assert!(!session.block_number);
    assert!(session.uid.is_none());
    assert!(session.ats.is_none());
}
