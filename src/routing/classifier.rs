//! Event classification.
//!
//! # Responsibilities
//! - Drop switch topology-discovery frames
//! - Drop frames without a usable network header (except address resolution)
//! - Decide between new-flow, return-flow and pass-through handling
//!
//! # Design Decisions
//! - Pure function of the descriptor and the registry
//! - Evaluation order: discovery → ARP → missing header → VIP → backend → rest

use std::net::Ipv4Addr;

use crate::load_balancer::PoolRegistry;
use crate::net::{ether_type, TrafficDescriptor};

/// How one traffic-descriptor event should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Link-layer discovery frame. No intent.
    Discovery,
    /// No network-layer header. No intent.
    Unclassifiable,
    /// Client traffic to a virtual address.
    NewFlow { virtual_ip: Ipv4Addr, client: Ipv4Addr },
    /// Traffic addressed to a backend, not originating from a virtual address.
    ReturnFlow { backend: Ipv4Addr },
    /// Anything outside the balanced domain.
    PassThrough,
}

impl Route {
    /// Label used for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Route::Discovery => "discovery",
            Route::Unclassifiable => "unclassifiable",
            Route::NewFlow { .. } => "new_flow",
            Route::ReturnFlow { .. } => "return_flow",
            Route::PassThrough => "pass_through",
        }
    }
}

/// Classify one event.
pub fn classify(event: &TrafficDescriptor, registry: &PoolRegistry) -> Route {
    match event.ether_type {
        ether_type::LLDP => return Route::Discovery,
        ether_type::ARP => return Route::PassThrough,
        _ => {}
    }

    let Some(network) = event.network else {
        return Route::Unclassifiable;
    };

    if registry.is_virtual(network.dst) {
        return Route::NewFlow {
            virtual_ip: network.dst,
            client: network.src,
        };
    }

    if registry.find_backend(network.dst).is_some() && !registry.is_virtual(network.src) {
        return Route::ReturnFlow {
            backend: network.dst,
        };
    }

    Route::PassThrough
}
