#[path = "../common/mod.rs"]
mod common;

use librc522::prelude::*;
use librc522::transport::CardState;

#[test]
fn single_card_is_found_and_selected() {
    let (mut pcd, _mock) =
        common::helpers::initialized_mock_pcd_with_card(common::fixtures::classic_card()).unwrap();

    let mut strategy = BasicSelection;
    let mut session = TagSession::new();
    assert!(strategy.card_present(&mut pcd, &mut session).unwrap());
    assert_eq!(session.atqa.unwrap().bits(), 0x0004);

    strategy.select(&mut pcd, &mut session).unwrap();
    let uid = session.uid.as_ref().unwrap();
    assert_eq!(uid.as_bytes(), &common::fixtures::sample_uid4());
    assert_eq!(uid.sak(), 0x08);
    assert_eq!(session.picc_type(), Some(PiccType::Mifare1K));
}

#[test]
fn empty_field_reports_no_card() {
    let (mut pcd, _mock) = common::helpers::initialized_mock_pcd().unwrap();

    let mut strategy = BasicSelection;
    let mut session = TagSession::new();
    assert!(!strategy.card_present(&mut pcd, &mut session).unwrap());
    assert!(session.uid.is_none());
}

#[test]
fn halted_card_ignores_request_but_answers_wakeup() {
    let (mut pcd, mock) =
        common::helpers::initialized_mock_pcd_with_card(common::fixtures::classic_card()).unwrap();

    let mut strategy = BasicSelection;
    let mut session = TagSession::new();
    assert!(strategy.card_present(&mut pcd, &mut session).unwrap());
    strategy.select(&mut pcd, &mut session).unwrap();

    pcd.halt_a().unwrap();
    assert_eq!(mock.borrow().cards[0].state, CardState::Halted);

    // REQA cannot see it any more
    assert!(!strategy.card_present(&mut pcd, &mut session).unwrap());

    // WUPA brings it back
    let atqa = pcd.wakeup_a().unwrap();
    assert_eq!(atqa.bits(), 0x0004);
    assert_eq!(mock.borrow().cards[0].state, CardState::Ready);
}

#[test]
fn known_uid_goes_straight_to_select() {
    let (mut pcd, mock) =
        common::helpers::initialized_mock_pcd_with_card(common::fixtures::classic_card()).unwrap();
    pcd.request_a().unwrap();

    let uid = pcd.select_card(&common::fixtures::sample_uid4(), 32).unwrap();
    assert_eq!(uid.as_bytes(), &common::fixtures::sample_uid4());

    // One SEL frame, already in full-select form: no anticollision round
    let mock = mock.borrow();
    let sel_frames: Vec<_> = mock
        .transmitted
        .iter()
        .filter(|f| f.data.first() == Some(&0x93))
        .collect();
    assert_eq!(sel_frames.len(), 1);
    assert_eq!(sel_frames[0].data[1], 0x70);
}

#[test]
fn triple_size_uid_walks_three_cascade_levels() {
    let uid_bytes = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xAA];
    let (mut pcd, mock) = common::helpers::initialized_mock_pcd_with_card(
        librc522::transport::SimCard::triple_size(uid_bytes),
    )
    .unwrap();

    let mut strategy = BasicSelection;
    let mut session = TagSession::new();
    assert!(strategy.card_present(&mut pcd, &mut session).unwrap());
    strategy.select(&mut pcd, &mut session).unwrap();

    let uid = session.uid.as_ref().unwrap();
    assert_eq!(uid.as_bytes(), &uid_bytes);

    let mock = mock.borrow();
    for sel in [0x93u8, 0x95, 0x97] {
        assert!(mock.transmitted.iter().any(|f| f.data.first() == Some(&sel)));
    }
}
