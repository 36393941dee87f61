//! SDN load balancer (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌───────────────────────────────────────────────────┐
//!                     │                  VIP BALANCER                      │
//!   Switch agent      │  ┌───────────┐   ┌────────────┐   ┌────────────┐  │
//!   ──────────────────┼─▶│southbound │──▶│ controller │──▶│  routing   │  │
//!   (JSON lines/TCP)  │  │ session   │   │  (mutex)   │   │ classifier │  │
//!                     │  └───────────┘   └─────┬──────┘   └────────────┘  │
//!                     │        ▲               │                          │
//!   intents           │        │               ▼                          │
//!   ◀─────────────────┼────────┘       ┌──────────────┐                   │
//!                     │                │load_balancer │◀── monitor        │
//!                     │                │pool/flow/acct│    (decay tick)   │
//!                     │                └──────────────┘                   │
//!                     │   admin API ── set algorithm / statistics          │
//!                     └───────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use vip_balancer::admin::{self, AdminState};
use vip_balancer::config::{load_config, BalancerConfig};
use vip_balancer::lifecycle::{signals, Shutdown};
use vip_balancer::monitor::DecayMonitor;
use vip_balancer::observability::{logging, metrics};
use vip_balancer::southbound::Listener;
use vip_balancer::Controller;

#[derive(Parser)]
#[command(name = "vip-balancer")]
#[command(about = "SDN load balancer for a virtual service address", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => BalancerConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!("vip-balancer v{} starting", env!("CARGO_PKG_VERSION"));

    let controller = Arc::new(Controller::from_config(&config)?);
    for pool in controller.registry().pools() {
        let backends: Vec<String> = pool.backends().iter().map(|b| b.to_string()).collect();
        tracing::info!(
            virtual_ip = %pool.virtual_ip,
            backends = ?backends,
            algorithm = %controller.algorithm(),
            "Virtual service configured"
        );
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));

    let monitor = DecayMonitor::new(
        controller.clone(),
        Duration::from_secs(config.balancer.decay_interval_secs),
    );
    let decay_task = tokio::spawn(monitor.run(shutdown.subscribe()));

    let admin_task = if config.admin.enabled {
        let listener = TcpListener::bind(&config.admin.bind_address).await?;
        let state = AdminState::new(controller.clone(), &config.admin.api_key);
        Some(tokio::spawn(admin::serve(listener, state, shutdown.subscribe())))
    } else {
        None
    };

    let southbound = Listener::bind(&config.southbound).await?;
    southbound.serve(controller.clone(), shutdown.subscribe()).await;

    let _ = decay_task.await;
    if let Some(task) = admin_task {
        match task.await {
            Ok(Err(e)) => tracing::error!(error = %e, "Admin API failed"),
            Err(e) => tracing::error!(error = %e, "Admin task panicked"),
            Ok(Ok(())) => {}
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
