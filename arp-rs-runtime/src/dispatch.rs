use crate::arp::{ArpHandler, ArpOutcome};
use crate::error::ArpError;
use crate::interface::InterfaceContext;
use arp_rs_packets::{ArpMessage, EtherType, EthernetHeader, MacAddr};
use std::convert::TryFrom;
use std::fmt;
use tracing::{debug, trace, warn};

/// What became of a received frame.
#[derive(Debug)]
pub enum Disposition {
    /// The ARP payload reached the handler.
    Handled(ArpOutcome),
    /// Addressed to neither this interface nor broadcast.
    NotForUs(MacAddr),
    /// Valid header, but nothing here speaks this ether type yet.
    Unhandled(u16),
    Dropped(ArpError),
}

/// Inbound path for one interface.
#[derive(Debug)]
pub struct Dispatcher {
    ctx: InterfaceContext,
}

impl Dispatcher {
    pub fn new(ctx: InterfaceContext) -> Self {
        Dispatcher { ctx }
    }

    pub fn context(&self) -> &InterfaceContext {
        &self.ctx
    }

    /// Runs one received frame through the destination filter and on to `handler`.
    pub fn on_frame_received<H>(&mut self, handler: &mut H, frame: &[u8]) -> Disposition
    where
        H: ArpHandler + ?Sized,
    {
        trace!(
            interface = self.ctx.name(),
            "Received {} bytes: {}",
            frame.len(),
            Hex(frame)
        );

        let disposition = self.dispatch(handler, frame);
        match &disposition {
            Disposition::Dropped(err @ ArpError::SendFailure { .. }) => warn!("{}", err),
            Disposition::Dropped(err) => {
                debug!(interface = self.ctx.name(), "dropping frame: {}", err)
            }
            Disposition::NotForUs(dest) => {
                trace!(interface = self.ctx.name(), "frame for {} is not for us", dest)
            }
            Disposition::Unhandled(ether_type) => trace!(
                interface = self.ctx.name(),
                "no handler for ether type {:#06x}",
                ether_type
            ),
            Disposition::Handled(_) => {}
        }
        disposition
    }

    fn dispatch<H>(&mut self, handler: &mut H, frame: &[u8]) -> Disposition
    where
        H: ArpHandler + ?Sized,
    {
        let header = match EthernetHeader::parse(frame) {
            Ok(header) => header,
            Err(err) => return Disposition::Dropped(err.into()),
        };

        if !header.is_for(self.ctx.mac()) {
            return Disposition::NotForUs(header.dest_mac);
        }

        match EtherType::try_from(header.ether_type) {
            Ok(EtherType::Arp) => {
                let msg = match ArpMessage::parse(EthernetHeader::payload(frame)) {
                    Ok(msg) => msg,
                    Err(err) => return Disposition::Dropped(err.into()),
                };
                match handler.on_arp_message(&mut self.ctx, &msg) {
                    Ok(outcome) => Disposition::Handled(outcome),
                    Err(err) => Disposition::Dropped(err),
                }
            }
            Ok(EtherType::Ipv4) | Err(_) => Disposition::Unhandled(header.ether_type),
        }
    }
}

struct Hex<'a>(&'a [u8]);

impl fmt::Display for Hex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}
