#![cfg(feature = "rppal")]

#[path = "common.rs"]
mod common;

use librc522::pcd::SelfTestOutcome;
use librc522::Result;
use serial_test::serial;

// These integration tests require a real MFRC522 wired to SPI0 CE0 (and
// NRSTPD on BCM 25 if present). They are marked `#[ignore]` so CI does not
// attempt to run them, and `#[serial]` because they share the one bus. Run
// manually with:
//
// cargo test -p librc522 --test hardware --features rppal -- --ignored

#[test]
#[serial]
#[ignore]
fn open_and_initialize_reader() -> Result<()> {
    match common::open_and_initialize_reader()? {
        Some(_) => Ok(()),
        None => Ok(()),
    }
}

#[test]
#[serial]
#[ignore]
fn version_register_names_a_firmware() -> Result<()> {
    let Some(mut pcd) = common::open_and_initialize_reader()? else {
        return Ok(());
    };
    let version = pcd.version()?;
    println!("firmware: {version}");
    Ok(())
}

#[test]
#[serial]
#[ignore]
fn digital_self_test_output_matches_the_reference() -> Result<()> {
    let Some(mut pcd) = common::open_and_initialize_reader()? else {
        return Ok(());
    };
    match pcd.self_test()? {
        SelfTestOutcome::Mismatch => panic!("self test output mismatch, chip suspect"),
        outcome => {
            println!("self test: {outcome}");
            Ok(())
        }
    }
}
