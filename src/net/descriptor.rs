//! Traffic-descriptor events delivered by the southbound interface.
//!
//! A descriptor is the already-parsed summary of one packet the switch could
//! not match against any installed rule. Header extraction happens outside
//! this crate; the descriptor only carries what classification needs plus an
//! opaque copy of the frame so it can be re-injected.

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

use crate::net::mac::MacAddr;

/// Ethernet frame types the classifier cares about.
pub mod ether_type {
    pub const IPV4: u16 = 0x0800;
    pub const ARP: u16 = 0x0806;
    pub const LLDP: u16 = 0x88cc;
}

/// Network-layer header summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkHeader {
    pub src: Ipv4Addr,
    pub dst: Ipv4Addr,
    /// IP protocol number (6 = TCP, 17 = UDP, ...).
    #[serde(default)]
    pub protocol: u8,
}

/// One "new flow" observation at the switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficDescriptor {
    /// Switch port the frame arrived on.
    pub in_port: u32,
    pub eth_src: MacAddr,
    #[serde(default = "broadcast")]
    pub eth_dst: MacAddr,
    pub ether_type: u16,
    /// Absent when the frame carries no IPv4 header.
    #[serde(default)]
    pub network: Option<NetworkHeader>,
    /// Raw frame bytes, echoed back in packet-out requests.
    #[serde(default)]
    pub payload: Vec<u8>,
}

fn broadcast() -> MacAddr {
    MacAddr::BROADCAST
}

impl TrafficDescriptor {
    /// Build an IPv4 descriptor.
    pub fn ipv4(in_port: u32, eth_src: MacAddr, src: Ipv4Addr, dst: Ipv4Addr) -> Self {
        Self {
            in_port,
            eth_src,
            eth_dst: MacAddr::BROADCAST,
            ether_type: ether_type::IPV4,
            network: Some(NetworkHeader { src, dst, protocol: 6 }),
            payload: Vec::new(),
        }
    }

    pub fn src_ip(&self) -> Option<Ipv4Addr> {
        self.network.map(|n| n.src)
    }

    pub fn dst_ip(&self) -> Option<Ipv4Addr> {
        self.network.map(|n| n.dst)
    }
}
