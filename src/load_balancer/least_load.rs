//! Least-load balancing strategy.

use std::sync::Arc;

use crate::load_balancer::{backend::Backend, round_robin::RoundRobin, LoadBalancer, Selection};

/// Least-load selector.
/// Selects the first backend (in pool order) whose load equals the pool minimum.
/// When every counter is equal there is no load signal, so the pick is
/// delegated to round-robin with the same rotation state.
#[derive(Debug, Default, Clone, Copy)]
pub struct LeastLoad;

impl LeastLoad {
    pub fn new() -> Self {
        Self
    }
}

impl LoadBalancer for LeastLoad {
    fn next_server(
        &self,
        backends: &[Arc<Backend>],
        loads: &[u64],
        rotation: usize,
    ) -> Option<Selection> {
        if backends.is_empty() {
            return None;
        }
        if loads.len() != backends.len() || loads.iter().all(|&l| l == loads[0]) {
            return RoundRobin.next_server(backends, loads, rotation);
        }

        // min_by_key returns the first minimum, so ties go to pool order
        let (index, _) = loads.iter().enumerate().min_by_key(|(_, load)| **load)?;
        Some(Selection { index, rotation })
    }
}
