//! Balancing controller.
//!
//! # Responsibilities
//! - Own every piece of mutable balancing state behind one lock
//! - Turn southbound events into forwarding intents
//! - Serve the administrative operations (algorithm switch, statistics)
//! - Apply periodic load decay
//!
//! # Design Decisions
//! - Single coarse mutex: each operation is O(pool size) and never awaits
//! - Event handling never returns an error; bad input yields no intents
//! - The host owns the event loop and calls in; no framework dependency

use serde::Serialize;
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use crate::config::BalancerConfig;
use crate::load_balancer::{
    Algorithm, LbError, PoolRegistry, StatisticsSnapshot, VirtualService,
};
use crate::net::TrafficDescriptor;
use crate::observability::metrics;
use crate::routing::{classify, intents, Route, RuleSettings};
use crate::southbound::intent::{FlowMatch, Intent};

#[derive(Debug)]
struct ControllerState {
    algorithm: Algorithm,
    total_requests: u64,
    services: HashMap<Ipv4Addr, VirtualService>,
}

/// One client → backend mapping, as reported by the admin API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowView {
    pub virtual_ip: Ipv4Addr,
    pub client: Ipv4Addr,
    pub backend: String,
    pub backend_address: Ipv4Addr,
}

#[derive(Debug)]
pub struct Controller {
    registry: Arc<PoolRegistry>,
    rules: RuleSettings,
    started_at: SystemTime,
    started: Instant,
    state: Mutex<ControllerState>,
}

impl Controller {
    pub fn new(registry: Arc<PoolRegistry>, algorithm: Algorithm, rules: RuleSettings) -> Self {
        let services = registry
            .pools()
            .map(|pool| (pool.virtual_ip, VirtualService::new(pool.clone())))
            .collect();

        Self {
            registry,
            rules,
            started_at: SystemTime::now(),
            started: Instant::now(),
            state: Mutex::new(ControllerState {
                algorithm,
                total_requests: 0,
                services,
            }),
        }
    }

    /// Build a controller from validated configuration.
    pub fn from_config(config: &BalancerConfig) -> Result<Self, LbError> {
        let registry = PoolRegistry::from_config(&config.services)?;
        let algorithm = config.balancer.algorithm.parse()?;
        let rules = RuleSettings {
            priority: config.balancer.rule_priority,
            idle_timeout: config.balancer.affinity_idle_secs,
        };
        Ok(Self::new(Arc::new(registry), algorithm, rules))
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn registry(&self) -> &Arc<PoolRegistry> {
        &self.registry
    }

    /// Default rules for a newly connected switch.
    pub fn on_switch_connect(&self, datapath_id: u64) -> Vec<Intent> {
        tracing::info!(datapath_id, "Switch connected, installing table-miss rule");
        vec![intents::table_miss()]
    }

    /// Classify one event and return the intents it produces.
    pub fn handle_event(&self, event: &TrafficDescriptor) -> Vec<Intent> {
        let route = classify(event, &self.registry);
        metrics::record_event(route.label());

        match route {
            Route::Discovery => Vec::new(),
            Route::Unclassifiable => {
                tracing::trace!(
                    in_port = event.in_port,
                    ether_type = event.ether_type,
                    error = %LbError::Unclassifiable("no network-layer header"),
                    "Dropping event"
                );
                Vec::new()
            }
            Route::NewFlow { virtual_ip, client } => {
                match self.balance(event, virtual_ip, client) {
                    Ok(intents) => intents,
                    Err(e) => {
                        tracing::warn!(%client, %virtual_ip, error = %e, "Dropping new flow");
                        Vec::new()
                    }
                }
            }
            Route::ReturnFlow { backend } => {
                tracing::debug!(%backend, in_port = event.in_port, "Return traffic without reverse rule, flooding");
                vec![intents::flood(event)]
            }
            Route::PassThrough => vec![intents::flood(event)],
        }
    }

    fn balance(
        &self,
        event: &TrafficDescriptor,
        virtual_ip: Ipv4Addr,
        client: Ipv4Addr,
    ) -> Result<Vec<Intent>, LbError> {
        let (assignment, pool, total) = {
            let mut state = self.lock();
            let algorithm = state.algorithm;
            let service = state
                .services
                .get_mut(&virtual_ip)
                .ok_or(LbError::UnknownVirtualAddress(virtual_ip))?;
            let assignment = service.assign(client, algorithm)?;
            let pool = service.pool().clone();
            metrics::record_backend_load(
                virtual_ip,
                &assignment.backend.name,
                service.accounting().load(assignment.index),
            );
            state.total_requests += 1;
            (assignment, pool, state.total_requests)
        };

        metrics::record_assignment(virtual_ip, &assignment.backend.name);
        tracing::info!(
            %client,
            backend = %assignment.backend,
            %virtual_ip,
            reused = !assignment.fresh,
            total_requests = total,
            "Client assigned"
        );

        Ok(intents::balanced_flow(event, &pool, &assignment.backend, self.rules))
    }

    /// Rule-expiry notification. Releases the client when a forward rule
    /// (client → virtual address) is removed. Returns the released client.
    pub fn on_flow_removed(&self, criteria: &FlowMatch) -> Option<Ipv4Addr> {
        let (Some(client), Some(dst)) = (criteria.ipv4_src, criteria.ipv4_dst) else {
            return None;
        };

        let mut state = self.lock();
        let service = state.services.get_mut(&dst)?;
        let backend = service.release(client)?;
        drop(state);

        metrics::record_flow_released();
        tracing::debug!(%client, backend = %backend, virtual_ip = %dst, "Flow assignment released");
        Some(client)
    }

    pub fn algorithm(&self) -> Algorithm {
        self.lock().algorithm
    }

    /// Switch the active algorithm. Unknown names leave it unchanged.
    pub fn set_algorithm(&self, name: &str) -> Result<Algorithm, LbError> {
        let algorithm = match name.parse::<Algorithm>() {
            Ok(algorithm) => algorithm,
            Err(e) => {
                tracing::warn!(requested = name, "Rejected algorithm change");
                return Err(e);
            }
        };
        let previous = std::mem::replace(&mut self.lock().algorithm, algorithm);
        tracing::info!(%previous, current = %algorithm, "Algorithm changed");
        Ok(algorithm)
    }

    pub fn statistics(&self) -> StatisticsSnapshot {
        let state = self.lock();
        self.snapshot(&state)
    }

    fn snapshot(&self, state: &ControllerState) -> StatisticsSnapshot {
        let services = self
            .registry
            .pools()
            .filter_map(|pool| state.services.get(&pool.virtual_ip))
            .map(VirtualService::stats)
            .collect();

        StatisticsSnapshot {
            algorithm: state.algorithm,
            total_requests: state.total_requests,
            started_at_unix_secs: self
                .started_at
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
            uptime_secs: self.started.elapsed().as_secs(),
            services,
        }
    }

    /// Decay every load counter by one. Returns a snapshot once traffic has
    /// been seen, `None` before the first request.
    pub fn decay_tick(&self) -> Option<StatisticsSnapshot> {
        let mut state = self.lock();
        for service in state.services.values_mut() {
            service.decay();
        }
        (state.total_requests > 0).then(|| self.snapshot(&state))
    }

    /// Current flow assignments across all services.
    pub fn flows(&self) -> Vec<FlowView> {
        let state = self.lock();
        let mut views: Vec<FlowView> = state
            .services
            .values()
            .flat_map(|svc| {
                let virtual_ip = svc.virtual_ip();
                svc.flows().iter().map(move |(client, backend)| FlowView {
                    virtual_ip,
                    client: *client,
                    backend: backend.name.clone(),
                    backend_address: backend.address,
                })
            })
            .collect();
        views.sort_by_key(|v| (v.virtual_ip, v.client));
        views
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::{ether_type, MacAddr};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn ip(d: u8) -> Ipv4Addr {
        Ipv4Addr::new(10, 0, 0, d)
    }

    fn controller() -> Controller {
        Controller::from_config(&BalancerConfig::default()).unwrap()
    }

    fn to_vip(client: u8) -> TrafficDescriptor {
        TrafficDescriptor::ipv4(1, MacAddr::new([0, 0, 0, 0, 0, client]), ip(client), ip(1))
    }

    #[test]
    fn test_switch_connect_installs_table_miss() {
        let intents = controller().on_switch_connect(1);
        assert_eq!(intents, vec![intents::table_miss()]);
    }

    #[test]
    fn test_new_flow_counts_request() {
        let c = controller();
        let intents = c.handle_event(&to_vip(11));
        assert_eq!(intents.len(), 3);

        let stats = c.statistics();
        assert_eq!(stats.total_requests, 1);
        assert_eq!(stats.backend(ip(2)).unwrap().hits, 1);
        assert_eq!(stats.backend(ip(2)).unwrap().load, 1);
    }

    #[test]
    fn test_discovery_and_unclassifiable_emit_nothing() {
        let c = controller();
        let mut ev = to_vip(11);
        ev.ether_type = ether_type::LLDP;
        assert!(c.handle_event(&ev).is_empty());

        ev.ether_type = ether_type::IPV4;
        ev.network = None;
        assert!(c.handle_event(&ev).is_empty());
        assert_eq!(c.statistics().total_requests, 0);
    }

    #[test]
    fn test_flow_removed_releases_client() {
        let c = controller();
        c.handle_event(&to_vip(11));
        assert_eq!(c.flows().len(), 1);

        let reverse = FlowMatch {
            ipv4_src: Some(ip(2)),
            ipv4_dst: Some(ip(11)),
            ..FlowMatch::default()
        };
        assert_eq!(c.on_flow_removed(&reverse), None);

        let forward = FlowMatch {
            ipv4_src: Some(ip(11)),
            ipv4_dst: Some(ip(1)),
            ..FlowMatch::default()
        };
        assert_eq!(c.on_flow_removed(&forward), Some(ip(11)));
        assert!(c.flows().is_empty());
    }

    #[test]
    fn test_decay_tick_silent_before_traffic() {
        let c = controller();
        assert!(c.decay_tick().is_none());
        c.handle_event(&to_vip(11));
        let snapshot = c.decay_tick().unwrap();
        assert_eq!(snapshot.backend(ip(2)).unwrap().load, 0);
        assert_eq!(snapshot.backend(ip(2)).unwrap().hits, 1);
    }

    #[test]
    fn test_set_algorithm() {
        let c = controller();
        assert_eq!(c.set_algorithm("least-load"), Ok(Algorithm::LeastLoad));
        assert_eq!(c.algorithm(), Algorithm::LeastLoad);
        assert!(c.set_algorithm("dynamic").is_err());
        assert_eq!(c.algorithm(), Algorithm::LeastLoad);
    }

    #[test]
    fn test_concurrent_events_and_decay() {
        const WORKERS: u8 = 4;
        const PER_WORKER: u8 = 50;
        let c = controller();
        let done = AtomicBool::new(false);

        std::thread::scope(|s| {
            s.spawn(|| {
                while !done.load(Ordering::Acquire) {
                    c.decay_tick();
                    std::thread::yield_now();
                }
            });

            let workers: Vec<_> = (0..WORKERS)
                .map(|w| {
                    let c = &c;
                    s.spawn(move || {
                        for i in 0..PER_WORKER {
                            let client = Ipv4Addr::new(10, 1, w, i);
                            let event = TrafficDescriptor::ipv4(
                                1,
                                MacAddr::new([0, 0, 0, 1, w, i]),
                                client,
                                ip(1),
                            );
                            assert_eq!(c.handle_event(&event).len(), 3);
                        }
                    })
                })
                .collect();
            for worker in workers {
                worker.join().unwrap();
            }
            done.store(true, Ordering::Release);
        });

        let n = u64::from(WORKERS) * u64::from(PER_WORKER);
        let stats = c.statistics();
        assert_eq!(stats.total_requests, n);

        let backends: Vec<_> = stats.services.iter().flat_map(|s| s.backends.iter()).collect();
        assert_eq!(backends.iter().map(|b| b.hits).sum::<u64>(), n);
        assert!(backends.iter().all(|b| b.load <= b.hits));
        assert_eq!(c.flows().len(), n as usize);
    }
}
