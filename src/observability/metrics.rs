//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define balancer metrics (assignments, event routes, backend load)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `lb_requests_total` (counter): new-flow requests by virtual_ip, backend
//! - `lb_events_total` (counter): classified events by route
//! - `lb_backend_load` (gauge): current decaying load by virtual_ip, backend
//! - `lb_flows_released_total` (counter): assignments dropped on rule expiry
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed (tests, metrics disabled)

use std::net::{Ipv4Addr, SocketAddr};

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::load_balancer::StatisticsSnapshot;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_event(route: &'static str) {
    ::metrics::counter!("lb_events_total", "route" => route).increment(1);
}

pub fn record_assignment(virtual_ip: Ipv4Addr, backend: &str) {
    ::metrics::counter!(
        "lb_requests_total",
        "virtual_ip" => virtual_ip.to_string(),
        "backend" => backend.to_string()
    )
    .increment(1);
}

pub fn record_backend_load(virtual_ip: Ipv4Addr, backend: &str, load: u64) {
    ::metrics::gauge!(
        "lb_backend_load",
        "virtual_ip" => virtual_ip.to_string(),
        "backend" => backend.to_string()
    )
    .set(load as f64);
}

pub fn record_flow_released() {
    ::metrics::counter!("lb_flows_released_total").increment(1);
}

/// Publish every backend's load from a snapshot.
pub fn record_snapshot(snapshot: &StatisticsSnapshot) {
    for service in &snapshot.services {
        for backend in &service.backends {
            record_backend_load(service.virtual_ip, &backend.name, backend.load);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_balancer::{Algorithm, BackendStats, ServiceStats};

    fn service(virtual_ip: Ipv4Addr, load: u64) -> ServiceStats {
        ServiceStats {
            virtual_ip,
            backends: vec![BackendStats {
                name: "web".into(),
                address: Ipv4Addr::new(10, 0, 0, 2),
                hits: load,
                load,
            }],
        }
    }

    #[test]
    fn test_backend_load_labelled_per_service() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let snapshot = StatisticsSnapshot {
            algorithm: Algorithm::RoundRobin,
            total_requests: 5,
            started_at_unix_secs: 0,
            uptime_secs: 0,
            services: vec![
                service(Ipv4Addr::new(10, 0, 0, 1), 2),
                service(Ipv4Addr::new(10, 0, 1, 1), 3),
            ],
        };

        ::metrics::with_local_recorder(&recorder, || record_snapshot(&snapshot));

        let rendered = recorder.handle().render();
        let loads: Vec<&str> = rendered
            .lines()
            .filter(|l| l.starts_with("lb_backend_load{"))
            .collect();
        assert_eq!(loads.len(), 2, "{rendered}");
        assert!(loads.iter().any(|l| l.contains("virtual_ip=\"10.0.0.1\"") && l.ends_with(" 2")));
        assert!(loads.iter().any(|l| l.contains("virtual_ip=\"10.0.1.1\"") && l.ends_with(" 3")));
    }
}
