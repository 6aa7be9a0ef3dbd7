use std::io;
use thiserror::Error;

/// A socket-level failure. The device is unusable afterwards.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Creating, configuring or binding the socket failed.
    #[error("failed to open device {interface}: {source}")]
    Open {
        /// Interface the socket was meant for.
        interface: String,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
    /// Reading from the socket failed with a non-transient error.
    #[error("failed to receive on device {interface}: {source}")]
    Receive {
        /// Interface the socket is bound to.
        interface: String,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
    /// The socket reports an error or hangup condition but yields no frame.
    #[error("device {interface} is unusable (poll events {events:#06x})")]
    Hangup {
        /// Interface the socket is bound to.
        interface: String,
        /// The `revents` bits poll(2) returned.
        events: i16,
    },
}

impl DeviceError {
    /// Name of the interface the failing socket belongs to.
    pub fn interface(&self) -> &str {
        match self {
            DeviceError::Open { interface, .. }
            | DeviceError::Receive { interface, .. }
            | DeviceError::Hangup { interface, .. } => interface,
        }
    }
}
