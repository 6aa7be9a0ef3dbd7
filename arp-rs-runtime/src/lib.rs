/// The ARP state logic. The engine decides what to do with a decoded ARP message and owns the
/// address table it learns into. The table is a plain owned value: whoever drives the engine
/// creates it once and hands it over, so every piece of state the engine touches is visible at
/// construction time.
pub mod arp;

/// Per-interface inbound path. A dispatcher holds the interface context, filters frames by
/// destination address, and routes ARP payloads to an `ArpHandler`. Its entry point never fails;
/// every per-frame error is logged and reported back as a `Disposition`.
pub mod dispatch;

pub mod error;

/// The identity of a managed interface and the capability to transmit on it.
pub mod interface;
