#![cfg(target_os = "linux")]
mod interfaces;
mod sockets;

pub use interfaces::{interfaces, Interface};
pub use sockets::{Addr, BoundSocket, Socket};
