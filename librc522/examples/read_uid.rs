// Wait for a card on a Raspberry Pi wired reader and print its UID.
//
// Wiring: SPI0 CE0 for the chip, an optional BCM 25 for NRSTPD. Run with
// `cargo run --example read_uid --features rppal`.

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
    println!("reader up, firmware {}", pcd.version()?);

    let mut strategy = BasicSelection;
    let mut session = TagSession::new();
    println!("waiting for a card...");
    loop {
        match strategy.card_present(&mut pcd, &mut session) {
            Ok(true) => {}
            Ok(false) => {
                std::thread::sleep(std::time::Duration::from_millis(100));
                continue;
            }
            Err(e) => {
                eprintln!("probe failed: {e}");
                continue;
            }
        }

        match strategy.select(&mut pcd, &mut session) {
            Ok(()) => {
                let uid = session.uid.as_ref().expect("select filled the session");
                println!(
                    "card: uid {} ({} bytes), sak 0x{:02x}, {}",
                    uid.to_hex(),
                    uid.len(),
                    uid.sak(),
                    session.picc_type().unwrap_or(PiccType::Unknown),
                );
                let _ = pcd.halt_a();
            }
            Err(Error::Collision { .. }) => eprintln!("unresolvable collision, present one card"),
            Err(e) => eprintln!("selection failed: {e}"),
        }
        std::thread::sleep(std::time::Duration::from_millis(500));
    }
}
