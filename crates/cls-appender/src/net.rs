// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Local address detection for the default record source

use crate::constants::FALLBACK_SOURCE;
use std::net::{Ipv4Addr, UdpSocket};
use tracing::{debug, warn};

/// Get the local machine's network address
///
/// This function tries, in order:
/// 1. The first IPv4 address of an interface that is up and not loopback
/// 2. The address the OS would route outbound traffic from
/// 3. `127.0.0.1`
#[must_use]
pub fn local_machine_ip() -> String {
    #[cfg(unix)]
    if let Some(ip) = interface_ipv4() {
        return ip.to_string();
    }

    if let Some(ip) = routed_ipv4() {
        return ip.to_string();
    }

    warn!("Could not determine local address, using '{FALLBACK_SOURCE}' as source");
    FALLBACK_SOURCE.to_string()
}

fn is_usable(ip: &Ipv4Addr) -> bool {
    !ip.is_loopback() && !ip.is_unspecified() && !ip.is_link_local()
}

#[cfg(unix)]
fn interface_ipv4() -> Option<Ipv4Addr> {
    use nix::ifaddrs::getifaddrs;
    use nix::net::if_::InterfaceFlags;

    let addrs = match getifaddrs() {
        Ok(addrs) => addrs,
        Err(e) => {
            debug!("Failed to list network interfaces: {e}");
            return None;
        }
    };

    addrs
        .filter(|ifaddr| {
            ifaddr.flags.contains(InterfaceFlags::IFF_UP)
                && !ifaddr.flags.contains(InterfaceFlags::IFF_LOOPBACK)
        })
        .filter_map(|ifaddr| {
            ifaddr
                .address
                .as_ref()
                .and_then(|address| address.as_sockaddr_in())
                .map(|sin| Ipv4Addr::from(sin.ip()))
        })
        .find(is_usable)
}

/// Connecting a UDP socket sends nothing but makes the OS pick a route.
fn routed_ipv4() -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect((Ipv4Addr::new(8, 8, 8, 8), 80)).ok()?;
    match socket.local_addr().ok()?.ip() {
        std::net::IpAddr::V4(ip) if is_usable(&ip) => Some(ip),
        _ => None,
    }
}
