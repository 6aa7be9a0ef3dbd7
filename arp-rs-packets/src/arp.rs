use crate::codec::{mac_array, read_u16_be, read_u32_be, write_u16_be, write_u32_be};
use crate::{
    EthernetHeader, MacAddr, PacketError, ARP_ETHER_TYPE, ETHERNET_ADDR_LEN, IPV4_ADDR_LEN,
    IPV4_ETHER_TYPE,
};
use std::convert::TryFrom;
use std::net::Ipv4Addr;

/// Size of an IPv4-over-Ethernet ARP message.
pub const ARP_MESSAGE_LEN: usize = 28;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArpOp {
    Request = 1,
    Reply = 2,
}

impl TryFrom<u16> for ArpOp {
    type Error = u16;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(ArpOp::Request),
            2 => Ok(ArpOp::Reply),
            other => Err(other),
        }
    }
}

pub enum ArpHardwareType {
    Ethernet = 1,
}

const HARDWARE_TYPE_RANGE: (usize, usize) = (0, 2);
const PROTOCOL_TYPE_RANGE: (usize, usize) = (2, 4);
const HARDWARE_ADDR_LEN_OFFSET: usize = 4;
const PROTOCOL_ADDR_LEN_OFFSET: usize = 5;
const OPCODE_RANGE: (usize, usize) = (6, 8);
const SENDER_MAC_RANGE: (usize, usize) = (8, 14);
const SENDER_IP_RANGE: (usize, usize) = (14, 18);
const TARGET_MAC_RANGE: (usize, usize) = (18, 24);
const TARGET_IP_RANGE: (usize, usize) = (24, 28);

///
/// ARP message for IPv4 over Ethernet, as described in RFC 826
/// https://tools.ietf.org/html/rfc826
///
/// The length fields are carried as read off the wire. Decoding always assumes 6-byte hardware
/// and 4-byte protocol addresses; checking that the fields agree is up to the caller.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArpMessage {
    pub hardware_type: u16,
    pub protocol_type: u16,
    pub hardware_addr_len: u8,
    pub protocol_addr_len: u8,
    pub opcode: u16,
    pub sender_mac: MacAddr,
    pub sender_ip: Ipv4Addr,
    pub target_mac: MacAddr,
    pub target_ip: Ipv4Addr,
}

impl ArpMessage {
    /// A message with Ethernet/IPv4 type and length fields already filled in.
    pub fn ethernet_ipv4(
        op: ArpOp,
        sender_mac: MacAddr,
        sender_ip: Ipv4Addr,
        target_mac: MacAddr,
        target_ip: Ipv4Addr,
    ) -> Self {
        ArpMessage {
            hardware_type: ArpHardwareType::Ethernet as u16,
            protocol_type: IPV4_ETHER_TYPE,
            hardware_addr_len: ETHERNET_ADDR_LEN,
            protocol_addr_len: IPV4_ADDR_LEN,
            opcode: op as u16,
            sender_mac,
            sender_ip,
            target_mac,
            target_ip,
        }
    }

    ///
    /// Swaps hardware and protocol fields, putting the local hardware and protocol addresses in
    /// the sender fields, and sets the opcode to reply.
    ///
    pub fn reply_to(request: &ArpMessage, own_mac: MacAddr, own_ip: Ipv4Addr) -> Self {
        ArpMessage::ethernet_ipv4(
            ArpOp::Reply,
            own_mac,
            own_ip,
            request.sender_mac,
            request.sender_ip,
        )
    }

    pub fn op(&self) -> Option<ArpOp> {
        ArpOp::try_from(self.opcode).ok()
    }

    pub fn parse(payload: &[u8]) -> Result<ArpMessage, PacketError> {
        if payload.len() < ARP_MESSAGE_LEN {
            return Err(PacketError::TruncatedFrame {
                needed: ARP_MESSAGE_LEN,
                actual: payload.len(),
            });
        }

        Ok(ArpMessage {
            hardware_type: read_u16_be(field(payload, HARDWARE_TYPE_RANGE))?,
            protocol_type: read_u16_be(field(payload, PROTOCOL_TYPE_RANGE))?,
            hardware_addr_len: payload[HARDWARE_ADDR_LEN_OFFSET],
            protocol_addr_len: payload[PROTOCOL_ADDR_LEN_OFFSET],
            opcode: read_u16_be(field(payload, OPCODE_RANGE))?,
            sender_mac: MacAddr::new(mac_array(field(payload, SENDER_MAC_RANGE))?),
            sender_ip: Ipv4Addr::from(read_u32_be(field(payload, SENDER_IP_RANGE))?),
            target_mac: MacAddr::new(mac_array(field(payload, TARGET_MAC_RANGE))?),
            target_ip: Ipv4Addr::from(read_u32_be(field(payload, TARGET_IP_RANGE))?),
        })
    }

    pub fn serialize(&self) -> [u8; ARP_MESSAGE_LEN] {
        let mut data = [0; ARP_MESSAGE_LEN];
        field_mut(&mut data, HARDWARE_TYPE_RANGE).copy_from_slice(&write_u16_be(self.hardware_type));
        field_mut(&mut data, PROTOCOL_TYPE_RANGE).copy_from_slice(&write_u16_be(self.protocol_type));
        data[HARDWARE_ADDR_LEN_OFFSET] = self.hardware_addr_len;
        data[PROTOCOL_ADDR_LEN_OFFSET] = self.protocol_addr_len;
        field_mut(&mut data, OPCODE_RANGE).copy_from_slice(&write_u16_be(self.opcode));
        field_mut(&mut data, SENDER_MAC_RANGE).copy_from_slice(&self.sender_mac.bytes);
        field_mut(&mut data, SENDER_IP_RANGE)
            .copy_from_slice(&write_u32_be(u32::from(self.sender_ip)));
        field_mut(&mut data, TARGET_MAC_RANGE).copy_from_slice(&self.target_mac.bytes);
        field_mut(&mut data, TARGET_IP_RANGE)
            .copy_from_slice(&write_u32_be(u32::from(self.target_ip)));
        data
    }

    /// Wraps the message in an Ethernet header sourced from `sender_mac` and addressed to `dest`.
    pub fn into_frame(self, dest: MacAddr) -> Vec<u8> {
        EthernetHeader::new(dest, self.sender_mac, ARP_ETHER_TYPE).encap(&self.serialize())
    }
}

// Returns the bytes in the message between start and end, exclusive
fn field(data: &[u8], (start, end): (usize, usize)) -> &[u8] {
    &data[start..end]
}

fn field_mut(data: &mut [u8], (start, end): (usize, usize)) -> &mut [u8] {
    &mut data[start..end]
}
