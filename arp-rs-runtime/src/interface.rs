use crate::error::ArpError;
use arp_rs_packets::MacAddr;
use std::fmt;
use std::io;
use std::net::Ipv4Addr;

/// Something that can put a complete link-layer frame on the wire.
pub trait FrameSink {
    fn send_frame(&mut self, frame: &[u8]) -> io::Result<()>;
}

impl<F> FrameSink for F
where
    F: FnMut(&[u8]) -> io::Result<()>,
{
    fn send_frame(&mut self, frame: &[u8]) -> io::Result<()> {
        self(frame)
    }
}

pub struct InterfaceContext {
    name: String,
    mac: MacAddr,
    ipv4: Ipv4Addr,
    sink: Box<dyn FrameSink>,
}

impl InterfaceContext {
    pub fn new(
        name: impl Into<String>,
        mac: MacAddr,
        ipv4: Ipv4Addr,
        sink: Box<dyn FrameSink>,
    ) -> Self {
        InterfaceContext {
            name: name.into(),
            mac,
            ipv4,
            sink,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mac(&self) -> MacAddr {
        self.mac
    }

    /// `0.0.0.0` while the interface has no address.
    pub fn ipv4(&self) -> Ipv4Addr {
        self.ipv4
    }

    pub fn is_configured(&self) -> bool {
        !self.ipv4.is_unspecified()
    }

    pub fn send(&mut self, frame: &[u8]) -> Result<(), ArpError> {
        self.sink
            .send_frame(frame)
            .map_err(|source| ArpError::SendFailure {
                interface: self.name.clone(),
                source,
            })
    }
}

impl fmt::Debug for InterfaceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterfaceContext")
            .field("name", &self.name)
            .field("mac", &self.mac)
            .field("ipv4", &self.ipv4)
            .finish()
    }
}
