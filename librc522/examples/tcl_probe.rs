// Probe an ISO 14443-4 card: print its ATS and try one I-block exchange.
//
// The I-block carries a DESFire "get version" native command; a card that
// does not understand it will answer an error frame, which is fine for a
// probe. Run with `cargo run --example tcl_probe --features rppal`.

use anyhow::Context;
use librc522::prelude::*;
use librc522::transport::SpiTransport;
use rppal::spi::{Bus, SlaveSelect};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let transport =
        SpiTransport::open(Bus::Spi0, SlaveSelect::Ss0, Some(25)).context("open SPI bus")?;
    let mut pcd = Pcd::new_with_transport(Box::new(transport))
        .initialize()
        .context("initialize reader")?;

    let mut strategy = TclSelection;
    let mut session = TagSession::new();
    println!("waiting for a protocol card...");
    while !strategy.card_present(&mut pcd, &mut session)? {
        std::thread::sleep(std::time::Duration::from_millis(100));
    }
    strategy.select(&mut pcd, &mut session)?;

    let uid = session.uid.as_ref().expect("select filled the session");
    println!("uid {}, sak 0x{:02x}", uid.to_hex(), uid.sak());

    let Some(ats) = session.ats.clone() else {
        println!("card did not answer the RATS; not a 14443-4 card");
        return Ok(());
    };
    println!("fsc {} bytes", ats.fsc);
    if let Some(ta1) = &ats.ta1 {
        println!("ta1: ds 0x{:x}, dr 0x{:x}, same-d {}", ta1.ds_mask, ta1.dr_mask, ta1.same_d);
    }
    if let Some(tb1) = &ats.tb1 {
        println!("tb1: fwi {}, sfgi {}", tb1.fwi, tb1.sfgi);
    }
    if let Some(tc1) = &ats.tc1 {
        println!("tc1: cid {}, nad {}", tc1.supports_cid, tc1.supports_nad);
    }
    if !ats.historical.is_empty() {
        println!("historical: {:02x?}", ats.historical);
    }

    let mut back = [0u8; 64];
    match pcd.tcl_transceive(&mut session, &[0x60], &mut back) {
        Ok(len) => println!("i-block answer: {:02x?}", &back[..len]),
        Err(e) => println!("i-block exchange failed: {e}"),
    }

    pcd.tcl_deselect(&mut session).context("deselect")?;
    Ok(())
}
