use crate::arp::{ArpEntry, ArpTable, Upsert};
use crate::error::{AddressField, ArpError};
use crate::interface::InterfaceContext;
use arp_rs_packets::{
    ArpMessage, ArpOp, MacAddr, ETHERNET_ADDR_LEN, IPV4_ADDR_LEN, IPV4_ETHER_TYPE,
};
use std::net::Ipv4Addr;
use tracing::{debug, info};

/// Receives every ARP message a dispatcher accepts.
pub trait ArpHandler {
    fn on_arp_message(
        &mut self,
        ctx: &mut InterfaceContext,
        msg: &ArpMessage,
    ) -> Result<ArpOutcome, ArpError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArpOutcome {
    /// A reply was handed to the interface's sink.
    Replied { to: Ipv4Addr, mac: MacAddr },
    Learned {
        ip: Ipv4Addr,
        mac: MacAddr,
        update: Upsert,
    },
    Ignored,
}

/// Answers ARP requests for the interface's own address and learns from ARP replies.
///
/// The engine never originates requests and keeps nothing between calls except the table.
#[derive(Debug, Default)]
pub struct ArpEngine {
    table: ArpTable,
}

impl ArpEngine {
    pub fn new(table: ArpTable) -> Self {
        ArpEngine { table }
    }

    pub fn table(&self) -> &ArpTable {
        &self.table
    }

    pub fn into_table(self) -> ArpTable {
        self.table
    }

    ///
    /// From the ARP RFC: https://tools.ietf.org/html/rfc826
    ///
    /// ?Do I speak the protocol in ar$pro?
    /// Yes:
    ///     [check the hardware length ar$hln]
    ///     [check the protocol length ar$pln]
    ///
    /// Only IPv4 over Ethernet is spoken here, so both lengths are fixed.
    ///
    fn validate(msg: &ArpMessage) -> Result<(), ArpError> {
        if msg.protocol_type != IPV4_ETHER_TYPE {
            return Err(ArpError::UnsupportedProtocol(msg.protocol_type));
        }

        if msg.hardware_addr_len != ETHERNET_ADDR_LEN {
            return Err(ArpError::AddressLengthMismatch {
                field: AddressField::Hardware,
                expected: ETHERNET_ADDR_LEN,
                actual: msg.hardware_addr_len,
            });
        }

        if msg.protocol_addr_len != IPV4_ADDR_LEN {
            return Err(ArpError::AddressLengthMismatch {
                field: AddressField::Protocol,
                expected: IPV4_ADDR_LEN,
                actual: msg.protocol_addr_len,
            });
        }

        Ok(())
    }

    fn on_request(
        &mut self,
        ctx: &mut InterfaceContext,
        msg: &ArpMessage,
    ) -> Result<ArpOutcome, ArpError> {
        info!(
            interface = ctx.name(),
            "ARP request from {} for {}", msg.sender_ip, msg.target_ip
        );

        if msg.target_ip != ctx.ipv4() {
            return Ok(ArpOutcome::Ignored);
        }

        let reply = ArpMessage::reply_to(msg, ctx.mac(), ctx.ipv4());
        info!(interface = ctx.name(), "Sending ARP reply to {}", reply.target_ip);
        ctx.send(&reply.into_frame(msg.sender_mac))?;

        Ok(ArpOutcome::Replied {
            to: msg.sender_ip,
            mac: msg.sender_mac,
        })
    }

    // Any reply seen on a configured interface is learned, whether or not it answers one of our
    // requests: the target address is not compared with our own.
    fn on_reply(&mut self, ctx: &mut InterfaceContext, msg: &ArpMessage) -> ArpOutcome {
        if !ctx.is_configured() {
            debug!(
                interface = ctx.name(),
                "ignoring ARP reply from {} on unconfigured interface", msg.sender_ip
            );
            return ArpOutcome::Ignored;
        }

        let update = self.table.upsert(msg.sender_ip, msg.sender_mac);
        let entry = ArpEntry {
            ip: msg.sender_ip,
            mac: msg.sender_mac,
        };
        info!(
            interface = ctx.name(),
            ?update,
            "Adding ARP entry by arp reply ({})",
            entry
        );

        ArpOutcome::Learned {
            ip: msg.sender_ip,
            mac: msg.sender_mac,
            update,
        }
    }
}

impl ArpHandler for ArpEngine {
    fn on_arp_message(
        &mut self,
        ctx: &mut InterfaceContext,
        msg: &ArpMessage,
    ) -> Result<ArpOutcome, ArpError> {
        ArpEngine::validate(msg)?;

        match msg.op() {
            Some(ArpOp::Request) => self.on_request(ctx, msg),
            Some(ArpOp::Reply) => Ok(self.on_reply(ctx, msg)),
            None => {
                debug!(interface = ctx.name(), opcode = msg.opcode, "ignoring ARP opcode");
                Ok(ArpOutcome::Ignored)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test::packet_collectors::FrameCollector;
    use crate::utils::test::packet_generators::{arp_reply, arp_request};
    use arp_rs_packets::{EthernetHeader, ARP_ETHER_TYPE};

    const OWN_MAC: MacAddr = MacAddr::new([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);
    const PEER_MAC: MacAddr = MacAddr::new([0x11, 0x22, 0x33, 0x44, 0x55, 0x66]);

    fn own_ip() -> Ipv4Addr {
        Ipv4Addr::new(192, 168, 1, 10)
    }

    fn peer_ip() -> Ipv4Addr {
        Ipv4Addr::new(192, 168, 1, 20)
    }

    fn context(ipv4: Ipv4Addr) -> (InterfaceContext, FrameCollector) {
        let collector = FrameCollector::new();
        let ctx = InterfaceContext::new("eth0", OWN_MAC, ipv4, Box::new(collector.clone()));
        (ctx, collector)
    }

    #[test]
    fn request_for_us_gets_one_reply() {
        let (mut ctx, sent) = context(own_ip());
        let mut engine = ArpEngine::default();

        let outcome = engine
            .on_arp_message(&mut ctx, &arp_request(PEER_MAC, peer_ip(), own_ip()))
            .unwrap();
        assert_eq!(
            outcome,
            ArpOutcome::Replied {
                to: peer_ip(),
                mac: PEER_MAC
            }
        );

        let frames = sent.frames();
        assert_eq!(frames.len(), 1);
        let header = EthernetHeader::parse(&frames[0]).unwrap();
        assert_eq!(header.dest_mac, PEER_MAC);
        assert_eq!(header.src_mac, OWN_MAC);
        assert_eq!(header.ether_type, ARP_ETHER_TYPE);

        let reply = ArpMessage::parse(EthernetHeader::payload(&frames[0])).unwrap();
        assert_eq!(reply.op(), Some(ArpOp::Reply));
        assert_eq!(reply.sender_mac, OWN_MAC);
        assert_eq!(reply.sender_ip, own_ip());
        assert_eq!(reply.target_mac, PEER_MAC);
        assert_eq!(reply.target_ip, peer_ip());

        // answering does not teach us anything
        assert!(engine.table().is_empty());
    }

    #[test]
    fn request_for_someone_else_is_ignored() {
        let (mut ctx, sent) = context(own_ip());
        let mut engine = ArpEngine::default();

        let outcome = engine
            .on_arp_message(
                &mut ctx,
                &arp_request(PEER_MAC, peer_ip(), Ipv4Addr::new(192, 168, 1, 99)),
            )
            .unwrap();
        assert_eq!(outcome, ArpOutcome::Ignored);
        assert!(sent.frames().is_empty());
        assert!(engine.table().is_empty());
    }

    #[test]
    fn reply_is_learned() {
        let (mut ctx, sent) = context(own_ip());
        let mut engine = ArpEngine::default();

        let outcome = engine
            .on_arp_message(&mut ctx, &arp_reply(PEER_MAC, peer_ip(), OWN_MAC, own_ip()))
            .unwrap();
        assert_eq!(
            outcome,
            ArpOutcome::Learned {
                ip: peer_ip(),
                mac: PEER_MAC,
                update: Upsert::Inserted
            }
        );
        assert_eq!(engine.table().len(), 1);
        assert_eq!(engine.table().lookup(peer_ip()), Some(PEER_MAC));
        assert!(sent.frames().is_empty());
    }

    #[test]
    fn repeated_reply_keeps_latest_mac() {
        let (mut ctx, _) = context(own_ip());
        let mut engine = ArpEngine::default();
        let newer = MacAddr::new([0x11, 0x22, 0x33, 0x44, 0x55, 0x67]);

        for mac in [PEER_MAC, PEER_MAC, newer].iter() {
            engine
                .on_arp_message(&mut ctx, &arp_reply(*mac, peer_ip(), OWN_MAC, own_ip()))
                .unwrap();
        }
        assert_eq!(engine.table().len(), 1);
        assert_eq!(engine.table().lookup(peer_ip()), Some(newer));
    }

    // Unsolicited replies addressed to another host are still learned. Only the interface's own
    // address being configured is checked before learning.
    #[test]
    fn reply_for_another_target_is_still_learned() {
        let (mut ctx, _) = context(own_ip());
        let mut engine = ArpEngine::default();

        let elsewhere = Ipv4Addr::new(10, 9, 9, 9);
        let reply = arp_reply(PEER_MAC, peer_ip(), MacAddr::default(), elsewhere);
        let outcome = engine.on_arp_message(&mut ctx, &reply).unwrap();
        assert!(matches!(outcome, ArpOutcome::Learned { .. }));
        assert_eq!(engine.table().lookup(peer_ip()), Some(PEER_MAC));
    }

    #[test]
    fn reply_on_unconfigured_interface_is_ignored() {
        let (mut ctx, _) = context(Ipv4Addr::UNSPECIFIED);
        let mut engine = ArpEngine::default();

        let outcome = engine
            .on_arp_message(&mut ctx, &arp_reply(PEER_MAC, peer_ip(), OWN_MAC, own_ip()))
            .unwrap();
        assert_eq!(outcome, ArpOutcome::Ignored);
        assert!(engine.table().is_empty());
    }

    #[test]
    fn length_mismatch_is_rejected_for_any_opcode() {
        let (mut ctx, sent) = context(own_ip());
        let mut engine = ArpEngine::default();

        let mut bad_hlen = arp_reply(PEER_MAC, peer_ip(), OWN_MAC, own_ip());
        bad_hlen.hardware_addr_len = 8;
        let mut bad_plen = arp_request(PEER_MAC, peer_ip(), own_ip());
        bad_plen.protocol_addr_len = 16;

        match engine.on_arp_message(&mut ctx, &bad_hlen) {
            Err(ArpError::AddressLengthMismatch {
                field: AddressField::Hardware,
                expected: 6,
                actual: 8,
            }) => {}
            other => panic!("unexpected {:?}", other),
        }
        match engine.on_arp_message(&mut ctx, &bad_plen) {
            Err(ArpError::AddressLengthMismatch {
                field: AddressField::Protocol,
                expected: 4,
                actual: 16,
            }) => {}
            other => panic!("unexpected {:?}", other),
        }
        assert!(engine.table().is_empty());
        assert!(sent.frames().is_empty());
    }

    #[test]
    fn non_ipv4_protocol_is_rejected() {
        let (mut ctx, _) = context(own_ip());
        let mut engine = ArpEngine::default();

        let mut msg = arp_reply(PEER_MAC, peer_ip(), OWN_MAC, own_ip());
        msg.protocol_type = 0x86dd;
        assert!(matches!(
            engine.on_arp_message(&mut ctx, &msg),
            Err(ArpError::UnsupportedProtocol(0x86dd))
        ));
        assert!(engine.table().is_empty());
    }

    #[test]
    fn unknown_opcode_is_ignored() {
        let (mut ctx, sent) = context(own_ip());
        let mut engine = ArpEngine::default();

        let mut msg = arp_request(PEER_MAC, peer_ip(), own_ip());
        msg.opcode = 3;
        assert_eq!(
            engine.on_arp_message(&mut ctx, &msg).unwrap(),
            ArpOutcome::Ignored
        );
        assert!(sent.frames().is_empty());
    }

    #[test]
    fn send_failure_is_reported() {
        let mut ctx = InterfaceContext::new(
            "eth0",
            OWN_MAC,
            own_ip(),
            Box::new(|_: &[u8]| -> std::io::Result<()> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "no buffer space"))
            }),
        );
        let mut engine = ArpEngine::default();

        assert!(matches!(
            engine.on_arp_message(&mut ctx, &arp_request(PEER_MAC, peer_ip(), own_ip())),
            Err(ArpError::SendFailure { .. })
        ));
    }
}
