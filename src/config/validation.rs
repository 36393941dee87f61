//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject pools the core cannot serve (empty, overlapping addresses)
//! - Validate value ranges (intervals > 0, ports valid)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BalancerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::Ipv4Addr;

use crate::config::schema::BalancerConfig;
use crate::load_balancer::Algorithm;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("no virtual services configured")]
    NoServices,
    #[error("virtual address {0} has an empty backend pool")]
    EmptyPool(Ipv4Addr),
    #[error("virtual address {0} is configured more than once")]
    DuplicateVirtualIp(Ipv4Addr),
    #[error("backend address {0} is listed more than once")]
    DuplicateBackend(Ipv4Addr),
    #[error("backend address {0} collides with a virtual address")]
    BackendIsVirtual(Ipv4Addr),
    #[error("backend {0} has attachment port 0")]
    InvalidPort(String),
    #[error("unknown algorithm '{0}'")]
    UnknownAlgorithm(String),
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &BalancerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.services.is_empty() {
        errors.push(ValidationError::NoServices);
    }

    let mut vips = HashSet::new();
    for service in &config.services {
        if !vips.insert(service.virtual_ip) {
            errors.push(ValidationError::DuplicateVirtualIp(service.virtual_ip));
        }
    }

    let mut backend_ips = HashSet::new();
    for service in &config.services {
        if service.backends.is_empty() {
            errors.push(ValidationError::EmptyPool(service.virtual_ip));
        }
        for backend in &service.backends {
            if !backend_ips.insert(backend.address) {
                errors.push(ValidationError::DuplicateBackend(backend.address));
            }
            if vips.contains(&backend.address) {
                errors.push(ValidationError::BackendIsVirtual(backend.address));
            }
            if backend.port == 0 {
                errors.push(ValidationError::InvalidPort(backend.name.clone()));
            }
        }
    }

    if config.balancer.algorithm.parse::<Algorithm>().is_err() {
        errors.push(ValidationError::UnknownAlgorithm(config.balancer.algorithm.clone()));
    }
    if config.balancer.decay_interval_secs == 0 {
        errors.push(ValidationError::ZeroDuration("decay_interval_secs"));
    }
    if config.balancer.affinity_idle_secs == 0 {
        errors.push(ValidationError::ZeroDuration("affinity_idle_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{BackendConfig, ServiceConfig};
    use crate::net::MacAddr;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&BalancerConfig::default()), Ok(()));
    }

    #[test]
    fn test_empty_pool_rejected() {
        let mut config = BalancerConfig::default();
        config.services[0].backends.clear();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyPool(Ipv4Addr::new(10, 0, 0, 1))]);
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = BalancerConfig::default();
        config.balancer.algorithm = "dynamic".into();
        config.balancer.decay_interval_secs = 0;
        config.services[0].backends.push(BackendConfig {
            name: "dup".into(),
            address: Ipv4Addr::new(10, 0, 0, 2),
            mac: MacAddr::new([0, 0, 0, 0, 0, 9]),
            port: 0,
        });
        config.services.push(ServiceConfig {
            virtual_ip: Ipv4Addr::new(10, 0, 0, 1),
            virtual_mac: MacAddr::new([0, 0, 0, 0, 0, 1]),
            backends: Vec::new(),
        });

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::DuplicateVirtualIp(Ipv4Addr::new(10, 0, 0, 1))));
        assert!(errors.contains(&ValidationError::DuplicateBackend(Ipv4Addr::new(10, 0, 0, 2))));
        assert!(errors.contains(&ValidationError::InvalidPort("dup".into())));
        assert!(errors.contains(&ValidationError::UnknownAlgorithm("dynamic".into())));
        assert!(errors.contains(&ValidationError::ZeroDuration("decay_interval_secs")));
    }

    #[test]
    fn test_backend_on_virtual_address_rejected() {
        let mut config = BalancerConfig::default();
        config.services[0].backends[0].address = Ipv4Addr::new(10, 0, 0, 1);
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::BackendIsVirtual(Ipv4Addr::new(10, 0, 0, 1))));
    }
}
