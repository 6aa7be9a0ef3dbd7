//! This crate connects `arp-rs-runtime` interfaces to `AF_PACKET` sockets from the `afpacket`
//! crate.
#![deny(missing_docs)]

mod error;
mod input;
mod output;

pub use error::DeviceError;
pub use input::{Device, MTU};
pub use output::DeviceSink;

/// Interfaces that are never managed: loopback and virtual links without a real Ethernet peer.
pub const IGNORED_INTERFACES: &[&str] = &["lo", "bond0", "dummy0", "tunl0", "sit0"];

/// Returns true if the interface with this name must not get a device.
pub fn is_ignored(name: &str) -> bool {
    IGNORED_INTERFACES.contains(&name)
}
