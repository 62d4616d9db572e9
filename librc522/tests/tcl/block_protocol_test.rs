#[path = "../common/mod.rs"]
mod common;

use librc522::prelude::*;
use librc522::Error;

/// Reader plus a session activated without a rate change, so every block
/// carries a software CRC_A that the scripted answers must match.
fn tcl_session_at_106() -> (
    librc522::Pcd<Initialized>,
    common::helpers::SharedMock,
    TagSession,
) {
    let (mut pcd, mock) =
        common::helpers::initialized_mock_pcd_with_card(common::fixtures::desfire_card()).unwrap();
    // ATS without TA1: no PPS, the mode registers stay at their baseline
    common::helpers::script_with_crc(&mock, &common::fixtures::plain_ats_body());

    let mut strategy = TclSelection;
    let mut session = TagSession::new();
    assert!(strategy.card_present(&mut pcd, &mut session).unwrap());
    strategy.select(&mut pcd, &mut session).unwrap();
    assert!(session.ats.is_some());
    (pcd, mock, session)
}

#[test]
fn three_fragment_chain_is_reassembled_in_order() {
    let (mut pcd, mock, mut session) = tcl_session_at_106();

    // The plain ATS turned the CID off, so the prologue is the bare PCB
    common::helpers::script_with_crc(&mock, &[0x12, 0x01, 0x02]);
    common::helpers::script_with_crc(&mock, &[0x13, 0x03, 0x04]);
    common::helpers::script_with_crc(&mock, &[0x02, 0x05, 0x06]);

    let mut back = [0u8; 32];
    let len = pcd
        .tcl_transceive(&mut session, &[0xB0, 0x00], &mut back)
        .unwrap();
    assert_eq!(&back[..len], &[0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);

    let mock = mock.borrow();
    // I-block, then an R(ACK) per chained fragment
    assert_eq!(mock.transmitted.len(), 3);
    assert_eq!(mock.transmitted[0].data[0], 0x02);
    assert_eq!(mock.transmitted[1].data[0], 0xA3);
    assert_eq!(mock.transmitted[2].data[0], 0xA2);
}

#[test]
fn chain_one_byte_over_capacity_is_no_room() {
    let (mut pcd, mock, mut session) = tcl_session_at_106();

    common::helpers::script_with_crc(&mock, &[0x12, 0x01, 0x02]);
    common::helpers::script_with_crc(&mock, &[0x02, 0x03]);

    // Total payload is 3 bytes; give it room for 2
    let mut back = [0u8; 2];
    assert!(matches!(
        pcd.tcl_transceive(&mut session, &[0xB0, 0x00], &mut back),
        Err(Error::NoRoom {
            needed: 3,
            capacity: 2
        })
    ));
}

#[test]
fn toggle_runs_through_the_chain_and_into_the_next_exchange() {
    let (mut pcd, mock, mut session) = tcl_session_at_106();

    common::helpers::script_with_crc(&mock, &[0x12, 0xAA]);
    common::helpers::script_with_crc(&mock, &[0x03, 0xBB]);
    let mut back = [0u8; 8];
    pcd.tcl_transceive(&mut session, &[0x00], &mut back).unwrap();

    // Two exchanges happened (I-block plus one ACK): toggle is back at 0
    assert!(!session.block_number);
    common::helpers::script_with_crc(&mock, &[0x02, 0xCC]);
    pcd.tcl_transceive(&mut session, &[0x00], &mut back).unwrap();
    assert!(session.block_number);

    let mock = mock.borrow();
    assert_eq!(mock.transmitted[2].data[0], 0x02);
}

#[test]
fn deselect_releases_the_card() {
    let (mut pcd, mock, mut session) = tcl_session_at_106();

    common::helpers::script_with_crc(&mock, &[0xC2]);
    pcd.tcl_deselect(&mut session).unwrap();

    let mock = mock.borrow();
    assert_eq!(mock.transmitted[0].data[0], 0xC2);
}

#[test]
fn silent_card_inside_a_chain_surfaces_the_timeout() {
    let (mut pcd, mock, mut session) = tcl_session_at_106();

    common::helpers::script_with_crc(&mock, &[0x12, 0x01]);
    // nothing scripted for the R(ACK): the card went away mid-chain

    let mut back = [0u8; 8];
    assert!(matches!(
        pcd.tcl_transceive(&mut session, &[0x00], &mut back),
        Err(Error::Timeout)
    ));
}
