use crate::codec::{mac_array, read_u16_be, write_u16_be};
use crate::*;

pub const ETHERNET_HEADER_LEN: usize = 14;

const DEST_MAC_RANGE: (usize, usize) = (0, 6);
const SRC_MAC_RANGE: (usize, usize) = (6, 12);
const ETHER_TYPE_RANGE: (usize, usize) = (12, 14);

/// Ethernet II header.
///
/// 0                    6                    12                   14
/// |---6 byte Dest_MAC--|---6 byte Src_MAC---|--2 Byte EtherType--|
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EthernetHeader {
    pub dest_mac: MacAddr,
    pub src_mac: MacAddr,
    pub ether_type: u16,
}

impl EthernetHeader {
    pub fn new(dest_mac: MacAddr, src_mac: MacAddr, ether_type: u16) -> Self {
        EthernetHeader {
            dest_mac,
            src_mac,
            ether_type,
        }
    }

    /// Reads the header from the first 14 bytes of `frame`. Anything after the header is left to
    /// the caller, see [`EthernetHeader::payload`].
    pub fn parse(frame: &[u8]) -> Result<EthernetHeader, PacketError> {
        if frame.len() < ETHERNET_HEADER_LEN {
            return Err(PacketError::TruncatedFrame {
                needed: ETHERNET_HEADER_LEN,
                actual: frame.len(),
            });
        }

        Ok(EthernetHeader {
            dest_mac: MacAddr::new(mac_array(&frame[DEST_MAC_RANGE.0..DEST_MAC_RANGE.1])?),
            src_mac: MacAddr::new(mac_array(&frame[SRC_MAC_RANGE.0..SRC_MAC_RANGE.1])?),
            ether_type: read_u16_be(&frame[ETHER_TYPE_RANGE.0..ETHER_TYPE_RANGE.1])?,
        })
    }

    pub fn serialize(&self) -> [u8; ETHERNET_HEADER_LEN] {
        let mut data = [0; ETHERNET_HEADER_LEN];
        data[DEST_MAC_RANGE.0..DEST_MAC_RANGE.1].copy_from_slice(&self.dest_mac.bytes);
        data[SRC_MAC_RANGE.0..SRC_MAC_RANGE.1].copy_from_slice(&self.src_mac.bytes);
        data[ETHER_TYPE_RANGE.0..ETHER_TYPE_RANGE.1].copy_from_slice(&write_u16_be(self.ether_type));
        data
    }

    /// The bytes following the header. Empty if the frame is too short to carry one.
    pub fn payload(frame: &[u8]) -> &[u8] {
        frame.get(ETHERNET_HEADER_LEN..).unwrap_or(&[])
    }

    /// Returns true if the frame should be accepted by the station owning `mac`.
    pub fn is_for(&self, mac: MacAddr) -> bool {
        self.dest_mac == mac || self.dest_mac.is_broadcast()
    }

    /// Concatenates this header with `payload` into a frame ready for the wire.
    pub fn encap(&self, payload: &[u8]) -> Vec<u8> {
        let mut frame = Vec::with_capacity(ETHERNET_HEADER_LEN + payload.len());
        frame.extend_from_slice(&self.serialize());
        frame.extend_from_slice(payload);
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    #[test]
    fn ethernet_header() {
        let data: Vec<u8> = vec![0xde, 0xad, 0xbe, 0xef, 0xff, 0xff, 1, 2, 3, 4, 5, 6, 0, 0];
        let header = EthernetHeader::parse(&data).unwrap();
        assert_eq!(
            header.dest_mac,
            MacAddr::new([0xde, 0xad, 0xbe, 0xef, 0xff, 0xff])
        );
        assert_eq!(header.src_mac, MacAddr::new([1, 2, 3, 4, 5, 6]));
        assert_eq!(header.ether_type, 0);
        assert!(EthernetHeader::payload(&data).is_empty());
    }

    #[test]
    fn ether_type() {
        let data: Vec<u8> = vec![
            0xde, 0xad, 0xbe, 0xef, 0xff, 0xff, 1, 2, 3, 4, 5, 6, 0x08, 0x06,
        ];
        let header = EthernetHeader::parse(&data).unwrap();
        assert_eq!(header.ether_type, ARP_ETHER_TYPE);
    }

    #[test]
    fn invalid_data_length() {
        let data: Vec<u8> = vec![0xde, 0xad, 0xbe, 0xef, 0xff, 0xff, 1, 2, 3, 4, 5, 6, 0];
        assert_eq!(
            EthernetHeader::parse(&data),
            Err(PacketError::TruncatedFrame {
                needed: 14,
                actual: 13
            })
        );
        assert!(EthernetHeader::parse(&[]).is_err());
    }

    #[test]
    fn serialize_field_order() {
        let header = EthernetHeader::new(
            MacAddr::BROADCAST,
            MacAddr::new([0x98, 0x88, 0x18, 0x12, 0xb4, 0xdf]),
            IPV4_ETHER_TYPE,
        );
        assert_eq!(
            header.serialize(),
            [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x98, 0x88, 0x18, 0x12, 0xb4, 0xdf, 0x08, 0x00]
        );
    }

    #[test]
    fn parse_serialized() {
        let header = EthernetHeader::new(
            MacAddr::new([0x11, 0x22, 0x33, 0x44, 0x55, 0x66]),
            MacAddr::new([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]),
            ARP_ETHER_TYPE,
        );
        assert_eq!(EthernetHeader::parse(&header.serialize()), Ok(header));
    }

    #[test]
    fn encap_payload() {
        let header = EthernetHeader::new(MacAddr::BROADCAST, MacAddr::default(), 0xffff);
        let frame = header.encap(&[1, 2, 3]);
        assert_eq!(frame.len(), 17);
        assert_eq!(EthernetHeader::payload(&frame), &[1, 2, 3]);
    }

    #[test]
    fn destination_filter() {
        let own = MacAddr::new([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);
        let other = MacAddr::new([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0x00]);
        assert!(EthernetHeader::new(own, other, 0).is_for(own));
        assert!(EthernetHeader::new(MacAddr::BROADCAST, other, 0).is_for(own));
        assert!(!EthernetHeader::new(other, own, 0).is_for(own));
    }
}
