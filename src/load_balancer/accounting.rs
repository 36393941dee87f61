//! Load accounting.
//!
//! # Responsibilities
//! - Per-backend decaying load estimate (feeds least-load selection)
//! - Per-backend hit counter (monotonic, reporting only)
//! - Statistics snapshot types
//!
//! Indices are positions in the owning pool, so one accounting instance is
//! bound to exactly one `ServerPool`.

use serde::Serialize;
use std::net::Ipv4Addr;

use crate::load_balancer::{pool::ServerPool, Algorithm};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadAccounting {
    loads: Vec<u64>,
    hits: Vec<u64>,
}

impl LoadAccounting {
    /// Zeroed counters for a pool of `size` backends.
    pub fn new(size: usize) -> Self {
        Self {
            loads: vec![0; size],
            hits: vec![0; size],
        }
    }

    /// Counters seeded with existing load values.
    pub fn with_loads(loads: Vec<u64>) -> Self {
        let hits = vec![0; loads.len()];
        Self { loads, hits }
    }

    pub fn increment(&mut self, index: usize) {
        if let Some(load) = self.loads.get_mut(index) {
            *load += 1;
        }
    }

    pub fn record_hit(&mut self, index: usize) {
        if let Some(hits) = self.hits.get_mut(index) {
            *hits += 1;
        }
    }

    /// Subtract one from every load counter, floored at zero.
    pub fn decay(&mut self) {
        for load in &mut self.loads {
            *load = load.saturating_sub(1);
        }
    }

    pub fn loads(&self) -> &[u64] {
        &self.loads
    }

    pub fn load(&self, index: usize) -> u64 {
        self.loads.get(index).copied().unwrap_or(0)
    }

    pub fn hits(&self, index: usize) -> u64 {
        self.hits.get(index).copied().unwrap_or(0)
    }

    /// Per-backend view of this pool's counters.
    pub fn snapshot(&self, pool: &ServerPool) -> ServiceStats {
        let backends = pool
            .backends()
            .iter()
            .enumerate()
            .map(|(i, b)| BackendStats {
                name: b.name.clone(),
                address: b.address,
                hits: self.hits(i),
                load: self.load(i),
            })
            .collect();
        ServiceStats {
            virtual_ip: pool.virtual_ip,
            backends,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendStats {
    pub name: String,
    pub address: Ipv4Addr,
    pub hits: u64,
    pub load: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceStats {
    pub virtual_ip: Ipv4Addr,
    pub backends: Vec<BackendStats>,
}

/// Aggregate statistics reported by the decay task and the admin API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatisticsSnapshot {
    pub algorithm: Algorithm,
    pub total_requests: u64,
    pub started_at_unix_secs: u64,
    pub uptime_secs: u64,
    pub services: Vec<ServiceStats>,
}

impl StatisticsSnapshot {
    /// Stats for one backend address across all services.
    pub fn backend(&self, address: Ipv4Addr) -> Option<&BackendStats> {
        self.services
            .iter()
            .flat_map(|s| s.backends.iter())
            .find(|b| b.address == address)
    }
}
