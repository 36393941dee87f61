//! Errors raised by the decision core.

use std::net::Ipv4Addr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LbError {
    /// Startup configuration the core refuses to serve.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("unknown virtual address {0}")]
    UnknownVirtualAddress(Ipv4Addr),

    #[error("backend pool for {0} is empty")]
    EmptyPool(Ipv4Addr),

    /// Rejected administrative input. Current algorithm is left unchanged.
    #[error("invalid algorithm request '{0}' (expected \"round-robin\" or \"least-load\")")]
    InvalidAlgorithm(String),

    /// An assignment points at a backend outside its pool; handled as a cache miss.
    #[error("stale assignment for client {client}: backend {backend} is not in the pool")]
    StaleAssignment { client: Ipv4Addr, backend: Ipv4Addr },

    /// Event without a usable network-layer header.
    #[error("unclassifiable event: {0}")]
    Unclassifiable(&'static str),
}
