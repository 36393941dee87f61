//! Round-robin load balancing strategy.

use std::sync::Arc;

use crate::load_balancer::{backend::Backend, LoadBalancer, Selection};

/// Round-robin selector.
/// Stateless: the rotation counter is threaded in by the caller.
#[derive(Debug, Default, Clone, Copy)]
pub struct RoundRobin;

impl RoundRobin {
    pub fn new() -> Self {
        Self
    }
}

impl LoadBalancer for RoundRobin {
    fn next_server(
        &self,
        backends: &[Arc<Backend>],
        _loads: &[u64],
        rotation: usize,
    ) -> Option<Selection> {
        if backends.is_empty() {
            return None;
        }

        let len = backends.len();
        let index = rotation % len;
        Some(Selection {
            index,
            rotation: (index + 1) % len,
        })
    }
}
