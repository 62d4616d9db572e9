#![cfg(feature = "rppal")]

//! 共通: 実機テスト用ヘルパー
//!
//! `--features rppal` でコンパイルされる実機テストに共通の関数を提供します。
//! リーダーを安全に open/initialize して、配線の無い環境（CI 等）では
//! `Ok(None)` を返すことが主な目的です。

use librc522::pcd::{Initialized, Pcd};
use librc522::transport::SpiTransport;
use librc522::{Error, Result};
use rppal::spi::{Bus, SlaveSelect};

/// Reader wiring the examples use as well: SPI0 CE0, NRSTPD on BCM 25.
const RESET_BCM: Option<u8> = Some(25);

/// Open and initialize the reader on SPI0 CE0.
///
/// - `Ok(Some(pcd))` : reader found and initialized
/// - `Ok(None)` : no SPI bus or reset pin on this host (CI etc.)
/// - `Err(e)` : the bus is there but the chip misbehaved
pub fn open_and_initialize_reader() -> Result<Option<Pcd<Initialized>>> {
    let transport = match SpiTransport::open(Bus::Spi0, SlaveSelect::Ss0, RESET_BCM) {
        Ok(transport) => transport,
        Err(Error::Spi(_)) | Err(Error::Gpio(_)) => return Ok(None),
        Err(e) => return Err(e),
    };
    let pcd = Pcd::new_with_transport(Box::new(transport)).initialize()?;
    Ok(Some(pcd))
}
