use arp_rs_packets::PacketError;
use std::fmt;
use std::io;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressField {
    Hardware,
    Protocol,
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressField::Hardware => f.write_str("hardware"),
            AddressField::Protocol => f.write_str("protocol"),
        }
    }
}

/// Reasons a single frame or ARP message is dropped. None of these are fatal.
#[derive(Error, Debug)]
pub enum ArpError {
    #[error(transparent)]
    Packet(#[from] PacketError),

    #[error("unsupported ARP protocol type {0:#06x}")]
    UnsupportedProtocol(u16),

    #[error("ARP {field} address length mismatch: expected {expected}, got {actual}")]
    AddressLengthMismatch {
        field: AddressField,
        expected: u8,
        actual: u8,
    },

    #[error("failed to send frame on {interface}: {source}")]
    SendFailure {
        interface: String,
        #[source]
        source: io::Error,
    },
}
