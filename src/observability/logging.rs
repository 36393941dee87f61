//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Configure log level from config, overridable by `RUST_LOG`
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Statistics snapshots are logged as one summary event plus one per backend

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;
use crate::load_balancer::StatisticsSnapshot;

/// Install the global subscriber.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("vip_balancer={},tower_http=info", config.log_level))
    });

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if let Err(e) = result {
        eprintln!("logging already initialized: {}", e);
    }
}

/// Emit a statistics snapshot as structured events.
pub fn log_snapshot(snapshot: &StatisticsSnapshot) {
    tracing::info!(
        total_requests = snapshot.total_requests,
        algorithm = %snapshot.algorithm,
        uptime_secs = snapshot.uptime_secs,
        "Balancer statistics"
    );
    for service in &snapshot.services {
        for backend in &service.backends {
            tracing::info!(
                virtual_ip = %service.virtual_ip,
                backend = %backend.name,
                address = %backend.address,
                hits = backend.hits,
                load = backend.load,
                "Backend statistics"
            );
        }
    }
}
