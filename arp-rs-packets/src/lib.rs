mod error;
pub use self::error::*;

pub mod codec;

mod types;
pub use self::types::*;

mod ethernet;
pub use self::ethernet::*;

mod arp;
pub use self::arp::*;
