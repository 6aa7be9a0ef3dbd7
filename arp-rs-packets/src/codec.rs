//! Fixed-width big-endian helpers shared by the header codecs, plus the text forms used in logs.

use crate::PacketError;

fn leading<const N: usize>(bytes: &[u8]) -> Result<[u8; N], PacketError> {
    match bytes.get(..N) {
        Some(head) => {
            let mut out = [0; N];
            out.copy_from_slice(head);
            Ok(out)
        }
        None => Err(PacketError::MalformedInput {
            needed: N,
            actual: bytes.len(),
        }),
    }
}

/// Decodes a `u16` from the first two bytes of `bytes`.
pub fn read_u16_be(bytes: &[u8]) -> Result<u16, PacketError> {
    leading::<2>(bytes).map(u16::from_be_bytes)
}

/// Decodes a `u32` from the first four bytes of `bytes`.
pub fn read_u32_be(bytes: &[u8]) -> Result<u32, PacketError> {
    leading::<4>(bytes).map(u32::from_be_bytes)
}

pub fn write_u16_be(value: u16) -> [u8; 2] {
    value.to_be_bytes()
}

pub fn write_u32_be(value: u32) -> [u8; 4] {
    value.to_be_bytes()
}

pub fn mac_array(bytes: &[u8]) -> Result<[u8; 6], PacketError> {
    leading::<6>(bytes)
}

/// `aa:bb:cc:dd:ee:ff`
pub fn format_mac_addr(mac: &[u8; 6]) -> String {
    format!(
        "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
        mac[0], mac[1], mac[2], mac[3], mac[4], mac[5]
    )
}

/// Formats a host-order IPv4 address as dotted decimal.
pub fn format_ipv4_addr(addr: u32) -> String {
    let octets = addr.to_be_bytes();
    format!("{}.{}.{}.{}", octets[0], octets[1], octets[2], octets[3])
}
