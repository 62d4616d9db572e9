#[path = "../common/mod.rs"]
mod common;

use librc522::prelude::*;
use librc522::transport::CardState;

#[test]
fn uid_rewrite_walks_the_full_backdoor_sequence() {
    let (mut pcd, mock) =
        common::helpers::initialized_mock_pcd_with_card(common::fixtures::classic_card()).unwrap();
    let mut strategy = BasicSelection;
    let mut session = TagSession::new();
    assert!(strategy.card_present(&mut pcd, &mut session).unwrap());
    strategy.select(&mut pcd, &mut session).unwrap();
    let uid = session.uid.clone().unwrap();

    // Current block 0: UID, BCC, SAK, ATQA, manufacturer filler
    let mut block0 = [0u8; 16];
    block0[..4].copy_from_slice(&common::fixtures::sample_uid4());
    block0[4] = block0[0] ^ block0[1] ^ block0[2] ^ block0[3];
    block0[5] = 0x08;
    block0[6] = 0x04;
    mock.borrow_mut()
        .script_reply(&common::fixtures::read_answer(&block0));
    // Backdoor handshake, then the two write phases
    for _ in 0..4 {
        mock.borrow_mut().script_ack();
    }

    pcd.set_card_uid(&uid, &[0x12, 0x34, 0x56, 0x78]).unwrap();

    let mock = mock.borrow();
    // Raw backdoor bytes, outside any framing
    assert!(mock
        .transmitted
        .iter()
        .any(|f| f.data == vec![0x40] && f.last_bits == 7));
    assert!(mock.transmitted.iter().any(|f| f.data == vec![0x43]));

    let data_phase = mock
        .transmitted
        .iter()
        .rev()
        .find(|f| f.data.len() == 18)
        .expect("block 0 data phase");
    assert_eq!(&data_phase.data[..4], &[0x12, 0x34, 0x56, 0x78]);
    assert_eq!(data_phase.data[4], 0x12 ^ 0x34 ^ 0x56 ^ 0x78);
    // SAK and ATQA survive the patch
    assert_eq!(data_phase.data[5], 0x08);
    assert_eq!(data_phase.data[6], 0x04);

    // The final wakeup pulled the card back out of halt
    assert_eq!(mock.cards[0].state, CardState::Ready);
    let last = mock.transmitted.last().unwrap();
    assert_eq!((last.data.as_slice(), last.last_bits), (&[0x52u8][..], 7));
}

#[test]
fn unbrick_does_not_need_a_selected_card() {
    let (mut pcd, mock) = common::helpers::initialized_mock_pcd().unwrap();
    for _ in 0..4 {
        mock.borrow_mut().script_ack();
    }

    pcd.unbrick_uid_sector().unwrap();

    let mock = mock.borrow();
    let data_phase = mock
        .transmitted
        .iter()
        .rev()
        .find(|f| f.data.len() == 18)
        .expect("block 0 data phase");
    // Factory UID 01 02 03 04 with its BCC
    assert_eq!(&data_phase.data[..5], &[0x01, 0x02, 0x03, 0x04, 0x04]);
}
