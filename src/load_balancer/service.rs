//! Per-virtual-address balancing state.
//!
//! Bundles a pool with everything that mutates alongside it: the round-robin
//! rotation pointer, load accounting and the flow tracker. Not thread-safe on
//! its own; the controller serializes access.

use std::net::Ipv4Addr;
use std::sync::Arc;

use crate::load_balancer::{
    accounting::{LoadAccounting, ServiceStats},
    backend::Backend,
    flow::{Assignment, FlowTracker},
    pool::ServerPool,
    Algorithm, LbError,
};

#[derive(Debug)]
pub struct VirtualService {
    pool: Arc<ServerPool>,
    rotation: usize,
    accounting: LoadAccounting,
    flows: FlowTracker,
}

impl VirtualService {
    pub fn new(pool: Arc<ServerPool>) -> Self {
        let accounting = LoadAccounting::new(pool.len());
        Self {
            pool,
            rotation: 0,
            accounting,
            flows: FlowTracker::new(),
        }
    }

    pub fn pool(&self) -> &Arc<ServerPool> {
        &self.pool
    }

    pub fn virtual_ip(&self) -> Ipv4Addr {
        self.pool.virtual_ip
    }

    pub fn rotation(&self) -> usize {
        self.rotation
    }

    /// Resolve the client's backend and count the request against it.
    pub fn assign(&mut self, client: Ipv4Addr, algorithm: Algorithm) -> Result<Assignment, LbError> {
        let assignment = self.flows.assign(
            client,
            &self.pool,
            &mut self.accounting,
            &mut self.rotation,
            algorithm.strategy(),
        )?;
        self.accounting.record_hit(assignment.index);
        Ok(assignment)
    }

    pub fn release(&mut self, client: Ipv4Addr) -> Option<Arc<Backend>> {
        self.flows.release(client)
    }

    pub fn decay(&mut self) {
        self.accounting.decay();
    }

    pub fn accounting(&self) -> &LoadAccounting {
        &self.accounting
    }

    pub fn flows(&self) -> &FlowTracker {
        &self.flows
    }

    pub fn stats(&self) -> ServiceStats {
        self.accounting.snapshot(&self.pool)
    }
}
