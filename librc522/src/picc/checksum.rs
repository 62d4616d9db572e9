// librc522-rs/librc522/src/picc/checksum.rs

/// Compute CRC_A (ISO 14443-3) over `data`.
///
/// Preset 0x6363, polynomial 0x8408, LSB first; the result is appended to
/// frames low byte first. The chip's coprocessor computes the same value,
/// this software copy exists for host-side frame verification.
pub fn crc_a(data: &[u8]) -> [u8; 2] {
    let mut crc: u16 = 0x6363;
    for &b in data {
        let mut ch = b ^ (crc as u8);
        ch ^= ch << 4;
        crc = (crc >> 8) ^ ((ch as u16) << 8) ^ ((ch as u16) << 3) ^ ((ch as u16) >> 4);
    }
    [crc as u8, (crc >> 8) as u8]
}
