use arp_rs_afpacket::DeviceError;
use std::io;
use std::net::AddrParseError;
use thiserror::Error;

/// Problems found before the first frame is read.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("expected IFACE=IPV4, got {0:?}")]
    MalformedAddress(String),
    #[error("invalid IPv4 address for {interface}: {source}")]
    InvalidAddress {
        interface: String,
        #[source]
        source: AddrParseError,
    },
    #[error("interface {0} does not exist or cannot be managed")]
    UnknownInterface(String),
    #[error("no interfaces to manage")]
    NoInterfaces,
    #[error("failed to list interfaces: {0}")]
    Enumerate(#[source] io::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    Device(#[from] DeviceError),
    #[error("poll failed: {0}")]
    Poll(#[source] io::Error),
}
