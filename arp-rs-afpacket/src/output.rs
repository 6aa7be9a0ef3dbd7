use afpacket::BoundSocket;
use arp_rs_runtime::interface::FrameSink;
use std::{cell::RefCell, io, rc::Rc};

/// Sends frames through a [`Device`](crate::Device)'s socket.
///
/// Every sink handed out by a device shares the device's socket, so the sink stays usable for as
/// long as it lives, even after the `Device` itself is dropped.
pub struct DeviceSink {
    name: String,
    socket: Rc<RefCell<BoundSocket>>,
}

impl DeviceSink {
    pub(crate) fn new(name: String, socket: Rc<RefCell<BoundSocket>>) -> Self {
        DeviceSink { name, socket }
    }

    /// Interface the frames go out on.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FrameSink for DeviceSink {
    fn send_frame(&mut self, frame: &[u8]) -> io::Result<()> {
        let sent = self.socket.borrow_mut().send(frame)?;
        if sent < frame.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("sent {} of {} bytes", sent, frame.len()),
            ));
        }
        Ok(())
    }
}
