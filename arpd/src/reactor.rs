use crate::error::Error;
use arp_rs_afpacket::{Device, DeviceError};
use arp_rs_runtime::{arp::ArpEngine, dispatch::Dispatcher};
use std::{io, os::unix::io::AsRawFd};
use tracing::debug;

/// Where the reactor reads frames from. Implemented by [`Device`].
pub trait FrameSource: AsRawFd {
    fn name(&self) -> &str;

    /// `Ok(None)` once nothing more can be read without blocking.
    fn receive(&mut self) -> Result<Option<&[u8]>, DeviceError>;
}

impl FrameSource for Device {
    fn name(&self) -> &str {
        Device::name(self)
    }

    fn receive(&mut self) -> Result<Option<&[u8]>, DeviceError> {
        Device::receive(self)
    }
}

/// Frames read from one source before the next source gets its turn. Whatever is left stays
/// readable and is picked up by the next poll.
const FRAMES_PER_TURN: usize = 32;

struct Slot<S> {
    source: S,
    dispatcher: Dispatcher,
}

/// Waits for any source to become readable and runs its frames through its dispatcher, one at a
/// time. All dispatchers share one engine, and with it one address table.
pub struct Reactor<S> {
    slots: Vec<Slot<S>>,
    engine: ArpEngine,
}

impl<S: FrameSource> Reactor<S> {
    pub fn new(engine: ArpEngine) -> Self {
        Reactor {
            slots: Vec::new(),
            engine,
        }
    }

    pub fn add(&mut self, source: S, dispatcher: Dispatcher) {
        self.slots.push(Slot { source, dispatcher });
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn engine(&self) -> &ArpEngine {
        &self.engine
    }

    /// Runs until a source fails.
    pub fn run(&mut self) -> Result<(), Error> {
        loop {
            self.turn(-1)?;
        }
    }

    /// One wait on every source, then reads up to `FRAMES_PER_TURN` frames from each readable
    /// one. Returns how many frames were dispatched. `timeout_ms` follows poll(2); negative waits
    /// forever.
    pub fn turn(&mut self, timeout_ms: libc::c_int) -> Result<usize, Error> {
        let mut fds: Vec<libc::pollfd> = self
            .slots
            .iter()
            .map(|slot| libc::pollfd {
                fd: slot.source.as_raw_fd(),
                events: libc::POLLIN,
                revents: 0,
            })
            .collect();

        if poll(&mut fds, timeout_ms)? == 0 {
            return Ok(0);
        }

        let mut frames = 0;
        for (slot, fd) in self.slots.iter_mut().zip(fds.iter()) {
            if fd.revents == 0 {
                continue;
            }
            let Slot { source, dispatcher } = slot;
            let mut drained = 0;
            // Read errors surface through receive().
            while drained < FRAMES_PER_TURN {
                match source.receive()? {
                    Some(frame) => {
                        dispatcher.on_frame_received(&mut self.engine, frame);
                        drained += 1;
                    }
                    None => break,
                }
            }
            let broken = fd.revents & (libc::POLLERR | libc::POLLHUP | libc::POLLNVAL) != 0;
            if drained == 0 && broken {
                return Err(DeviceError::Hangup {
                    interface: source.name().to_string(),
                    events: fd.revents,
                }
                .into());
            }
            debug!(interface = source.name(), "dispatched {} frames", drained);
            frames += drained;
        }
        Ok(frames)
    }
}

// Returns the number of ready descriptors; an interrupted wait counts as none ready.
fn poll(fds: &mut [libc::pollfd], timeout_ms: libc::c_int) -> Result<usize, Error> {
    // fds is a live, exclusively borrowed slice and its length is passed alongside it.
    let ready = unsafe { libc::poll(fds.as_mut_ptr(), fds.len() as libc::nfds_t, timeout_ms) };
    if ready < 0 {
        let err = io::Error::last_os_error();
        if err.kind() == io::ErrorKind::Interrupted {
            return Ok(0);
        }
        return Err(Error::Poll(err));
    }
    Ok(ready as usize)
}
