use libc;
use std::{ffi::CStr, io, net::Ipv4Addr, ptr};

/// A link-layer capable interface as reported by the kernel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interface {
    pub name: String,
    pub index: libc::c_int,
    pub mac: [u8; 6],
    /// First IPv4 address assigned to the interface, if any.
    pub ipv4: Option<Ipv4Addr>,
}

/// Lists every interface that has an `AF_PACKET` address, in the order the kernel reports them.
pub fn interfaces() -> io::Result<Vec<Interface>> {
    let mut head: *mut libc::ifaddrs = ptr::null_mut();
    // Resources:
    // man 3 getifaddrs
    if unsafe { libc::getifaddrs(&mut head) } < 0 {
        return Err(io::Error::last_os_error());
    }

    let mut found: Vec<Interface> = Vec::new();
    let mut ipv4s: Vec<(String, Ipv4Addr)> = Vec::new();

    // The list stays valid until freeifaddrs below. Each ifa_addr is checked for null and its
    // family read before it is reinterpreted as the matching sockaddr type.
    unsafe {
        let mut cursor = head;
        while !cursor.is_null() {
            let ifa = &*cursor;
            cursor = ifa.ifa_next;

            if ifa.ifa_addr.is_null() || ifa.ifa_name.is_null() {
                continue;
            }
            let name = CStr::from_ptr(ifa.ifa_name).to_string_lossy().into_owned();

            match libc::c_int::from((*ifa.ifa_addr).sa_family) {
                libc::AF_PACKET => {
                    let ll = &*(ifa.ifa_addr as *const libc::sockaddr_ll);
                    let mut mac = [0u8; 6];
                    if ll.sll_halen as usize == mac.len() {
                        mac.copy_from_slice(&ll.sll_addr[..6]);
                    }
                    found.push(Interface {
                        name,
                        index: ll.sll_ifindex,
                        mac,
                        ipv4: None,
                    });
                }
                libc::AF_INET => {
                    let sin = &*(ifa.ifa_addr as *const libc::sockaddr_in);
                    ipv4s.push((name, Ipv4Addr::from(u32::from_be(sin.sin_addr.s_addr))));
                }
                _ => {}
            }
        }
        libc::freeifaddrs(head);
    }

    for (name, addr) in ipv4s {
        if let Some(iface) = found
            .iter_mut()
            .find(|iface| iface.name == name && iface.ipv4.is_none())
        {
            iface.ipv4 = Some(addr);
        }
    }
    Ok(found)
}
