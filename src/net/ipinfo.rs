//! Local IP detection for the startup report.
//!
//! Other devices cannot reach `localhost`, so the banner needs the address
//! of the interface this machine uses for outbound traffic. A UDP socket is
//! "connected" toward a public address to learn that interface's address; no
//! packet is actually sent. Falls back to loopback when the network is down.

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

/// Detect the LAN address other devices should use to reach this machine.
///
/// Best effort and display-only; `127.0.0.1` on failure.
pub fn local_ip() -> IpAddr {
    match outbound_interface_addr() {
        Some(addr) => addr,
        None => IpAddr::V4(Ipv4Addr::LOCALHOST),
    }
}

fn outbound_interface_addr() -> Option<IpAddr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    // Google public DNS; connect() only selects a route, nothing is sent.
    socket.connect(("8.8.8.8", 80)).ok()?;
    Some(socket.local_addr().ok()?.ip())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_ip_is_ipv4() {
        // Whatever the environment, detection must return something usable.
        let ip = local_ip();
        assert!(ip.is_ipv4());
    }

    #[test]
    fn test_local_ip_never_unspecified() {
        assert_ne!(local_ip(), IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }
}
