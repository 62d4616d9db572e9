#[path = "../common/mod.rs"]
mod common;

use librc522::pcd::{Register, SelfTestOutcome};
use librc522::FirmwareVersion;

#[test]
fn self_test_passes_on_every_published_firmware() {
    for version_byte in [0x88u8, 0x90, 0x91, 0x92] {
        let (pcd, mock) = common::helpers::mock_pcd();
        mock.borrow_mut().version_byte = version_byte;
        let mut pcd = pcd.initialize().unwrap();

        assert_eq!(pcd.self_test().unwrap(), SelfTestOutcome::Passed);
        // Normal operation restored afterwards
        assert_eq!(mock.borrow().registers[Register::Mode as usize], 0x3D);
    }
}

#[test]
fn corrupted_output_is_reported_not_swallowed() {
    let (pcd, mock) = common::helpers::mock_pcd();
    mock.borrow_mut().corrupt_selftest = true;
    let mut pcd = pcd.initialize().unwrap();

    assert_eq!(pcd.self_test().unwrap(), SelfTestOutcome::Mismatch);
}

#[test]
fn unknown_firmware_has_no_reference_to_compare() {
    let (pcd, mock) = common::helpers::mock_pcd();
    mock.borrow_mut().version_byte = 0x77;
    let mut pcd = pcd.initialize().unwrap();

    assert_eq!(
        pcd.self_test().unwrap(),
        SelfTestOutcome::UnsupportedVersion(FirmwareVersion::Unknown(0x77))
    );
}
