#[path = "../common/mod.rs"]
mod common;

use librc522::mifare::KeyType;
use librc522::pcd::Register;
use librc522::prelude::*;

fn selected_classic() -> (
    librc522::Pcd<Initialized>,
    common::helpers::SharedMock,
    TagSession,
) {
    let (mut pcd, mock) =
        common::helpers::initialized_mock_pcd_with_card(common::fixtures::classic_card()).unwrap();
    let mut strategy = BasicSelection;
    let mut session = TagSession::new();
    assert!(strategy.card_present(&mut pcd, &mut session).unwrap());
    strategy.select(&mut pcd, &mut session).unwrap();
    (pcd, mock, session)
}

#[test]
fn authenticated_read_write_round_trip() {
    let (mut pcd, mock, session) = selected_classic();
    let uid = session.uid.as_ref().unwrap();

    pcd.authenticate(KeyType::KeyA, 4, &common::fixtures::default_key(), uid)
        .unwrap();
    assert_ne!(mock.borrow().registers[Register::Status2 as usize] & 0x08, 0);

    let block = common::fixtures::sample_block(0x5A);
    mock.borrow_mut()
        .script_reply(&common::fixtures::read_answer(&block));
    assert_eq!(pcd.read_block(4).unwrap(), block);

    mock.borrow_mut().script_ack();
    mock.borrow_mut().script_ack();
    pcd.write_block(4, &block).unwrap();

    {
        let mock = mock.borrow();
        let frames = &mock.transmitted;
        // command phase then data phase, CRC_A appended to both
        let n = frames.len();
        assert_eq!(&frames[n - 2].data[..2], &[0xA0, 0x04]);
        assert_eq!(frames[n - 1].data.len(), 18);
        assert_eq!(&frames[n - 1].data[..16], &block);
    }

    pcd.stop_crypto1().unwrap();
    assert_eq!(mock.borrow().registers[Register::Status2 as usize] & 0x08, 0);
}

#[test]
fn wrong_key_stays_silent_and_crypto1_stays_off() {
    let (mut pcd, mock, session) = selected_classic();
    let uid = session.uid.as_ref().unwrap();

    let wrong = MifareKey::from_bytes([0xA0, 0xA1, 0xA2, 0xA3, 0xA4, 0xA5]);
    assert!(matches!(
        pcd.authenticate(KeyType::KeyB, 4, &wrong, uid),
        Err(Error::Timeout)
    ));
    assert_eq!(mock.borrow().registers[Register::Status2 as usize] & 0x08, 0);
}

#[test]
fn nack_on_write_data_is_reported() {
    let (mut pcd, mock, session) = selected_classic();
    let uid = session.uid.as_ref().unwrap();
    pcd.authenticate(KeyType::KeyA, 4, &common::fixtures::default_key(), uid)
        .unwrap();

    // Command phase acknowledged, data phase refused
    mock.borrow_mut().script_ack();
    mock.borrow_mut().script_nibble(0x05);
    assert!(matches!(
        pcd.write_block(4, &common::fixtures::sample_block(0xA5)),
        Err(Error::MifareNack)
    ));
}

#[test]
fn short_read_answer_is_a_protocol_error() {
    let (mut pcd, mock, _session) = selected_classic();
    // Well-formed CRC but only two payload bytes
    common::helpers::script_with_crc(&mock, &[0x01, 0x02]);
    assert!(matches!(pcd.read_block(4), Err(Error::Communication)));
}

#[test]
fn ultralight_page_write_is_one_frame() {
    let (mut pcd, mock) =
        common::helpers::initialized_mock_pcd_with_card(common::fixtures::ultralight_card())
            .unwrap();
    let mut strategy = BasicSelection;
    let mut session = TagSession::new();
    assert!(strategy.card_present(&mut pcd, &mut session).unwrap());
    strategy.select(&mut pcd, &mut session).unwrap();
    assert_eq!(session.picc_type(), Some(PiccType::MifareUltralight));

    mock.borrow_mut().script_ack();
    pcd.ultralight_write(6, &[0x11, 0x22, 0x33, 0x44]).unwrap();

    let mock = mock.borrow();
    let frame = mock.transmitted.last().unwrap();
    assert_eq!(frame.data.len(), 8);
    assert_eq!(&frame.data[..6], &[0xA2, 0x06, 0x11, 0x22, 0x33, 0x44]);
}

#[test]
fn ntag_password_auth_returns_the_pack() {
    let (mut pcd, mock) =
        common::helpers::initialized_mock_pcd_with_card(common::fixtures::ultralight_card())
            .unwrap();
    let mut strategy = BasicSelection;
    let mut session = TagSession::new();
    assert!(strategy.card_present(&mut pcd, &mut session).unwrap());
    strategy.select(&mut pcd, &mut session).unwrap();

    common::helpers::script_with_crc(&mock, &[0xAA, 0x55]);
    let pack = pcd.ntag_password_auth(&[0x12, 0x34, 0x56, 0x78]).unwrap();
    assert_eq!(pack, [0xAA, 0x55]);

    let mock = mock.borrow();
    let frame = mock.transmitted.last().unwrap();
    assert_eq!(&frame.data[..5], &[0x1B, 0x12, 0x34, 0x56, 0x78]);
}
