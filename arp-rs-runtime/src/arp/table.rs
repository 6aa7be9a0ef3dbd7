use arp_rs_packets::{codec::format_ipv4_addr, MacAddr};
use std::fmt;
use std::net::Ipv4Addr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArpEntry {
    pub ip: Ipv4Addr,
    pub mac: MacAddr,
}

impl fmt::Display for ArpEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", format_ipv4_addr(u32::from(self.ip)), self.mac)
    }
}

/// What an [`ArpTable::upsert`] did to the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    /// The IP was already present and now maps to the new MAC.
    UpdatedMac { previous: MacAddr },
    /// The IP was unknown but the MAC was not; that entry was re-keyed to the new IP.
    UpdatedIp { previous: Ipv4Addr },
    Unchanged,
}

/// IPv4 to Ethernet address translations learned from ARP replies.
///
/// Entries are kept in insertion order and never expire. The IP address is the primary key: an
/// upsert first looks for the IP across the whole table, and only falls back to matching on the
/// MAC address when the IP is unknown. That ordering is what keeps IPs unique. MAC addresses are
/// not unique, the same MAC may end up behind several IPs.
#[derive(Clone, Debug, Default)]
pub struct ArpTable {
    entries: Vec<ArpEntry>,
}

impl ArpTable {
    pub fn new() -> Self {
        ArpTable {
            entries: Vec::new(),
        }
    }

    pub fn upsert(&mut self, ip: Ipv4Addr, mac: MacAddr) -> Upsert {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.ip == ip) {
            if entry.mac == mac {
                return Upsert::Unchanged;
            }
            let previous = entry.mac;
            entry.mac = mac;
            return Upsert::UpdatedMac { previous };
        }

        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.mac == mac) {
            let previous = entry.ip;
            entry.ip = ip;
            return Upsert::UpdatedIp { previous };
        }

        self.entries.push(ArpEntry { ip, mac });
        Upsert::Inserted
    }

    pub fn lookup(&self, ip: Ipv4Addr) -> Option<MacAddr> {
        self.entries
            .iter()
            .find(|entry| entry.ip == ip)
            .map(|entry| entry.mac)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArpEntry> {
        self.entries.iter()
    }
}
