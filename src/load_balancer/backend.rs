//! Backend abstraction.
//!
//! # Responsibilities
//! - Represent a single real server behind a virtual address
//! - Carry the identity needed to rewrite and forward traffic to it
//!
//! Load and hit counters live in `accounting.rs`, not here: a backend's
//! identity is immutable for the registry's lifetime.

use serde::Serialize;
use std::fmt;
use std::net::Ipv4Addr;

use crate::config::BackendConfig;
use crate::net::MacAddr;

/// A single backend server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Backend {
    /// Name used in logs and metrics.
    pub name: String,
    /// Network address.
    pub address: Ipv4Addr,
    /// Link-layer address.
    pub mac: MacAddr,
    /// Switch port the server is attached to.
    pub port: u32,
}

impl Backend {
    /// Create a new backend.
    pub fn new(name: impl Into<String>, address: Ipv4Addr, mac: MacAddr, port: u32) -> Self {
        Self {
            name: name.into(),
            address,
            mac,
            port,
        }
    }
}

impl From<&BackendConfig> for Backend {
    fn from(config: &BackendConfig) -> Self {
        Self::new(config.name.clone(), config.address, config.mac, config.port)
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.address)
    }
}
