use crate::{error::DeviceError, output::DeviceSink};
use afpacket::{self, BoundSocket};
use arp_rs_packets::MacAddr;
use arp_rs_runtime::interface::InterfaceContext;
use std::{
    cell::RefCell,
    io,
    net::Ipv4Addr,
    os::unix::io::{AsRawFd, RawFd},
    rc::Rc,
};
use tracing::info;

/// Largest frame handed to the dispatcher. Longer frames are truncated by the socket.
pub const MTU: usize = 1500;

/// A non-blocking `AF_PACKET` socket bound to one interface.
pub struct Device {
    name: String,
    mac: MacAddr,
    ipv4: Option<Ipv4Addr>,
    socket: Rc<RefCell<BoundSocket>>,
    in_buf: Vec<u8>,
}

impl Device {
    /// Opens a socket on `iface` and switches it to non-blocking mode.
    pub fn open(iface: &afpacket::Interface) -> Result<Self, DeviceError> {
        let open_err = |source| DeviceError::Open {
            interface: iface.name.clone(),
            source,
        };

        let mut socket = afpacket::Socket::new().map_err(open_err)?;
        socket.set_nonblocking(true).map_err(open_err)?;
        let socket = socket.bind_index(iface.index).map_err(open_err)?;

        let device = Device {
            name: iface.name.clone(),
            mac: MacAddr::new(iface.mac),
            ipv4: iface.ipv4,
            socket: Rc::new(RefCell::new(socket)),
            in_buf: vec![0; MTU],
        };
        info!(
            "Created device {} socket {} address {}",
            device.name,
            device.as_raw_fd(),
            device.mac
        );
        Ok(device)
    }

    /// Interface name, e.g. `eth0`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hardware address of the interface.
    pub fn mac(&self) -> MacAddr {
        self.mac
    }

    /// The address the host had configured on this interface when it was enumerated.
    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        self.ipv4
    }

    /// Reads one frame. `Ok(None)` means nothing could be read right now; the caller should
    /// wait for readiness again. Any other failure is a `DeviceError`.
    pub fn receive(&mut self) -> Result<Option<&[u8]>, DeviceError> {
        let result = self.socket.borrow_mut().recv(&mut self.in_buf);
        match result {
            Ok((len, _)) => Ok(Some(&self.in_buf[..len])),
            Err(err) if is_transient(&err) => Ok(None),
            Err(source) => Err(DeviceError::Receive {
                interface: self.name.clone(),
                source,
            }),
        }
    }

    /// A sender sharing this device's socket.
    pub fn sink(&self) -> DeviceSink {
        DeviceSink::new(self.name.clone(), Rc::clone(&self.socket))
    }

    /// Builds the runtime's view of this interface, sending through [`Device::sink`].
    pub fn context(&self, ipv4: Ipv4Addr) -> InterfaceContext {
        InterfaceContext::new(self.name.clone(), self.mac, ipv4, Box::new(self.sink()))
    }
}

impl AsRawFd for Device {
    fn as_raw_fd(&self) -> RawFd {
        self.socket.borrow().as_raw_fd()
    }
}

fn is_transient(err: &io::Error) -> bool {
    match err.kind() {
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => true,
        _ => false,
    }
}
