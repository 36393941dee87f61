//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → BalancerConfig (validated, immutable)
//!     → used once at startup to build the pool registry and controller
//! ```
//!
//! # Design Decisions
//! - Config is static for the process lifetime; pools never resize
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AdminConfig, AlgorithmConfig, BackendConfig, BalancerConfig, ObservabilityConfig,
    ServiceConfig, SouthboundConfig,
};
pub use validation::ValidationError;
