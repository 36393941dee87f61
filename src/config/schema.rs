//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the balancer.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

use crate::net::MacAddr;

/// Root configuration for the load balancer.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BalancerConfig {
    /// Virtual services, each with its own backend pool.
    pub services: Vec<ServiceConfig>,

    /// Selection and flow-affinity settings.
    pub balancer: AlgorithmConfig,

    /// Switch-facing listener.
    pub southbound: SouthboundConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Administrative HTTP surface.
    pub admin: AdminConfig,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            services: vec![ServiceConfig::default()],
            balancer: AlgorithmConfig::default(),
            southbound: SouthboundConfig::default(),
            observability: ObservabilityConfig::default(),
            admin: AdminConfig::default(),
        }
    }
}

/// One virtual service address and the pool behind it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Address clients target. Never assigned to a real backend.
    pub virtual_ip: Ipv4Addr,

    /// Source MAC written into server → client replies.
    pub virtual_mac: MacAddr,

    /// Ordered backend list. Order drives round-robin.
    pub backends: Vec<BackendConfig>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        let backends = (2u8..=4)
            .map(|n| BackendConfig {
                name: format!("h{}", n),
                address: Ipv4Addr::new(10, 0, 0, n),
                mac: MacAddr::new([0, 0, 0, 0, 0, n]),
                port: u32::from(n),
            })
            .collect();
        Self {
            virtual_ip: Ipv4Addr::new(10, 0, 0, 1),
            virtual_mac: MacAddr::new([0, 0, 0, 0, 0, 1]),
            backends,
        }
    }
}

/// Backend server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Backend identifier for logging/metrics.
    pub name: String,

    /// Backend IPv4 address.
    pub address: Ipv4Addr,

    /// Backend link-layer address.
    pub mac: MacAddr,

    /// Switch port the backend is attached to.
    pub port: u32,
}

/// Selection and affinity settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AlgorithmConfig {
    /// Initial algorithm ("round-robin" or "least-load").
    pub algorithm: String,

    /// Seconds between load decay ticks.
    pub decay_interval_secs: u64,

    /// Idle expiry requested for installed rewrite rules.
    pub affinity_idle_secs: u16,

    /// Priority of installed rewrite rules.
    pub rule_priority: u16,
}

impl Default for AlgorithmConfig {
    fn default() -> Self {
        Self {
            algorithm: "round-robin".to_string(),
            decay_interval_secs: 10,
            affinity_idle_secs: 30,
            rule_priority: 10,
        }
    }
}

/// Switch-facing listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SouthboundConfig {
    /// Bind address for switch agent sessions.
    pub bind_address: String,

    /// Maximum concurrent switch sessions.
    pub max_connections: usize,
}

impl Default for SouthboundConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:6653".to_string(),
            max_connections: 16,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin surface configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable the admin API.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,

    /// Admin API bind address.
    pub bind_address: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            // WARNING: This is a placeholder! Change this in production.
            api_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
            bind_address: "127.0.0.1:8081".to_string(),
        }
    }
}
