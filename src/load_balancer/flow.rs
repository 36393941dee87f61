//! Flow state tracker.
//!
//! # Responsibilities
//! - Map client address → assigned backend (flow affinity)
//! - Run selection only on a miss, then charge the chosen backend one load unit
//! - Drop an entry when the switch reports its forward rule expired
//!
//! # Design Decisions
//! - Without an expiry notification an entry persists until released or
//!   superseded; affinity may outlive the switch rule in that case
//! - An entry whose backend is no longer in the pool counts as a miss

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::Arc;

use crate::load_balancer::{
    accounting::LoadAccounting, backend::Backend, pool::ServerPool, LbError, LoadBalancer,
};

/// Result of an `assign` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub backend: Arc<Backend>,
    /// Position of the backend in its pool.
    pub index: usize,
    /// False when an existing mapping was reused.
    pub fresh: bool,
}

#[derive(Debug, Default)]
pub struct FlowTracker {
    assignments: HashMap<Ipv4Addr, Arc<Backend>>,
}

impl FlowTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the client's backend, selecting and recording one if needed.
    pub fn assign(
        &mut self,
        client: Ipv4Addr,
        pool: &ServerPool,
        accounting: &mut LoadAccounting,
        rotation: &mut usize,
        strategy: &dyn LoadBalancer,
    ) -> Result<Assignment, LbError> {
        match self.lookup(client, pool) {
            Ok(Some(index)) => {
                if let Some(backend) = pool.get(index) {
                    return Ok(Assignment {
                        backend: backend.clone(),
                        index,
                        fresh: false,
                    });
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::debug!(error = %e, "Discarding stale assignment");
                self.assignments.remove(&client);
            }
        }

        let selection = strategy
            .next_server(pool.backends(), accounting.loads(), *rotation)
            .ok_or(LbError::EmptyPool(pool.virtual_ip))?;
        let backend = pool
            .get(selection.index)
            .cloned()
            .ok_or(LbError::EmptyPool(pool.virtual_ip))?;

        *rotation = selection.rotation;
        accounting.increment(selection.index);
        self.assignments.insert(client, backend.clone());

        Ok(Assignment {
            backend,
            index: selection.index,
            fresh: true,
        })
    }

    /// Pool position of the client's current backend, if any.
    pub fn lookup(&self, client: Ipv4Addr, pool: &ServerPool) -> Result<Option<usize>, LbError> {
        let Some(backend) = self.assignments.get(&client) else {
            return Ok(None);
        };
        // Identity is the whole (address, mac, port) triple, not the address alone.
        pool.backends()
            .iter()
            .position(|b| **b == **backend)
            .map(Some)
            .ok_or(LbError::StaleAssignment {
                client,
                backend: backend.address,
            })
    }

    /// Remove the client's mapping.
    pub fn release(&mut self, client: Ipv4Addr) -> Option<Arc<Backend>> {
        self.assignments.remove(&client)
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ipv4Addr, &Arc<Backend>)> {
        self.assignments.iter()
    }
}
