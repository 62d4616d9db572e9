#[path = "../common/mod.rs"]
mod common;

use librc522::prelude::*;
use librc522::transport::SimCard;

#[test]
fn two_cards_converge_to_one_uid() {
    let (mut pcd, mock) = common::helpers::initialized_mock_pcd().unwrap();
    // First UID bit differs: guaranteed collision in the first round
    mock.borrow_mut()
        .cards
        .push(SimCard::classic_1k([0x01, 0x00, 0x00, 0x00]));
    mock.borrow_mut()
        .cards
        .push(SimCard::classic_1k([0x02, 0x00, 0x00, 0x00]));

    let mut strategy = BasicSelection;
    let mut session = TagSession::new();
    assert!(strategy.card_present(&mut pcd, &mut session).unwrap());
    strategy.select(&mut pcd, &mut session).unwrap();

    // The cascade claims colliding bits as 1, so the 0x01 card wins
    let uid = session.uid.as_ref().unwrap();
    assert_eq!(uid.as_bytes(), &[0x01, 0x00, 0x00, 0x00]);

    // The other card is still reachable by an addressed select
    pcd.halt_a().unwrap();
    pcd.wakeup_a().unwrap();
    let other = pcd.select_card(&[0x02, 0x00, 0x00, 0x00], 32).unwrap();
    assert_eq!(other.as_bytes(), &[0x02, 0x00, 0x00, 0x00]);
}

#[test]
fn collision_resolution_narrows_the_frames() {
    let (mut pcd, mock) = common::helpers::initialized_mock_pcd().unwrap();
    mock.borrow_mut()
        .cards
        .push(SimCard::classic_1k([0x01, 0x00, 0x00, 0x00]));
    mock.borrow_mut()
        .cards
        .push(SimCard::classic_1k([0x02, 0x00, 0x00, 0x00]));

    let mut strategy = BasicSelection;
    let mut session = TagSession::new();
    assert!(strategy.card_present(&mut pcd, &mut session).unwrap());
    strategy.select(&mut pcd, &mut session).unwrap();

    let mock = mock.borrow();
    let sel_frames: Vec<_> = mock
        .transmitted
        .iter()
        .filter(|f| f.data.first() == Some(&0x93))
        .collect();
    // Round 1: blind anticollision. Round 2: one claimed bit. Round 3:
    // the full select
    assert_eq!(sel_frames.len(), 3);
    assert_eq!(sel_frames[0].data[1], 0x20);
    assert_eq!(sel_frames[1].data[1], 0x21);
    assert_eq!(sel_frames[1].last_bits, 1);
    assert_eq!(sel_frames[2].data[1], 0x70);
}

#[test]
fn out_of_range_collision_position_is_surfaced() {
    let (mut pcd, mock) = common::helpers::initialized_mock_pcd().unwrap();
    // CollPosNotValid: the chip lost track of where the collision was
    mock.borrow_mut().script_reply(&[0x04, 0x00]);
    mock.borrow_mut().script_collision(&[], 0x20);

    pcd.request_a().unwrap();
    match pcd.select_card(&[], 0) {
        Err(Error::Collision { position, .. }) => assert_eq!(position, None),
        other => panic!("expected a collision error, got {other:?}"),
    }
}
