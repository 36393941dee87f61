//! Server pool registry.
//!
//! # Responsibilities
//! - Hold the ordered backend list for each virtual address
//! - Answer membership questions for classification
//! - Refuse to start with an unknown or empty pool

use std::net::Ipv4Addr;
use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::load_balancer::{backend::Backend, LbError};
use crate::net::MacAddr;

/// Ordered backends for one virtual service address.
#[derive(Debug, Clone)]
pub struct ServerPool {
    pub virtual_ip: Ipv4Addr,
    pub virtual_mac: MacAddr,
    backends: Vec<Arc<Backend>>,
}

impl ServerPool {
    /// Create a pool. An empty backend list is a configuration error.
    pub fn new(
        virtual_ip: Ipv4Addr,
        virtual_mac: MacAddr,
        backends: Vec<Backend>,
    ) -> Result<Self, LbError> {
        if backends.is_empty() {
            return Err(LbError::EmptyPool(virtual_ip));
        }
        Ok(Self {
            virtual_ip,
            virtual_mac,
            backends: backends.into_iter().map(Arc::new).collect(),
        })
    }

    pub fn backends(&self) -> &[Arc<Backend>] {
        &self.backends
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Backend>> {
        self.backends.get(index)
    }

    /// Position of the backend with this address, if it belongs to the pool.
    pub fn position(&self, address: Ipv4Addr) -> Option<usize> {
        self.backends.iter().position(|b| b.address == address)
    }
}

/// All pools known to this process, keyed by virtual address.
#[derive(Debug, Clone)]
pub struct PoolRegistry {
    pools: Vec<Arc<ServerPool>>,
}

impl PoolRegistry {
    /// Build the registry from pre-constructed pools.
    pub fn new(pools: Vec<ServerPool>) -> Result<Self, LbError> {
        if pools.is_empty() {
            return Err(LbError::Configuration("no virtual services configured".into()));
        }
        for (i, pool) in pools.iter().enumerate() {
            if pools[..i].iter().any(|p| p.virtual_ip == pool.virtual_ip) {
                return Err(LbError::Configuration(format!(
                    "virtual address {} configured twice",
                    pool.virtual_ip
                )));
            }
        }
        Ok(Self {
            pools: pools.into_iter().map(Arc::new).collect(),
        })
    }

    /// Build the registry from configuration.
    pub fn from_config(services: &[ServiceConfig]) -> Result<Self, LbError> {
        let pools = services
            .iter()
            .map(|s| {
                let backends = s.backends.iter().map(Backend::from).collect();
                ServerPool::new(s.virtual_ip, s.virtual_mac, backends)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(pools)
    }

    /// Ordered backends for a virtual address.
    pub fn list_backends(&self, virtual_ip: Ipv4Addr) -> Result<&[Arc<Backend>], LbError> {
        self.pool(virtual_ip).map(|p| p.backends())
    }

    pub fn pool(&self, virtual_ip: Ipv4Addr) -> Result<&Arc<ServerPool>, LbError> {
        self.pools
            .iter()
            .find(|p| p.virtual_ip == virtual_ip)
            .ok_or(LbError::UnknownVirtualAddress(virtual_ip))
    }

    pub fn pools(&self) -> impl Iterator<Item = &Arc<ServerPool>> {
        self.pools.iter()
    }

    pub fn is_virtual(&self, address: Ipv4Addr) -> bool {
        self.pools.iter().any(|p| p.virtual_ip == address)
    }

    /// Find the backend with this address in any pool.
    pub fn find_backend(&self, address: Ipv4Addr) -> Option<&Arc<Backend>> {
        self.pools
            .iter()
            .flat_map(|p| p.backends().iter())
            .find(|b| b.address == address)
    }
}
