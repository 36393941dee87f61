//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::BalancerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<BalancerConfig, ConfigError> {
    let config: BalancerConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<BalancerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.services.len(), 1);
        assert_eq!(config.services[0].virtual_ip, Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(config.balancer.decay_interval_secs, 10);
        assert_eq!(config.balancer.affinity_idle_secs, 30);
    }

    #[test]
    fn test_full_service_definition() {
        let toml = r#"
            [balancer]
            algorithm = "least-load"

            [[services]]
            virtual_ip = "192.168.0.100"
            virtual_mac = "02:00:00:00:00:64"

            [[services.backends]]
            name = "web-a"
            address = "192.168.0.11"
            mac = "02:00:00:00:00:0b"
            port = 11

            [[services.backends]]
            name = "web-b"
            address = "192.168.0.12"
            mac = "02:00:00:00:00:0c"
            port = 12
        "#;
        let config = parse_config(toml).unwrap();
        assert_eq!(config.balancer.algorithm, "least-load");
        assert_eq!(config.services[0].backends.len(), 2);
        assert_eq!(config.services[0].backends[1].port, 12);
    }

    #[test]
    fn test_validation_errors_surface() {
        let toml = r#"
            [[services]]
            virtual_ip = "192.168.0.100"
            virtual_mac = "02:00:00:00:00:64"
            backends = []
        "#;
        let err = parse_config(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("empty backend pool"));
    }

    #[test]
    fn test_bad_mac_is_parse_error() {
        let toml = r#"
            [[services]]
            virtual_ip = "192.168.0.100"
            virtual_mac = "not-a-mac"
            backends = []
        "#;
        assert!(matches!(parse_config(toml), Err(ConfigError::Parse(_))));
    }
}
