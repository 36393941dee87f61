//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Controller and decay task produce:
//!     → logging.rs (structured log events, statistics snapshots)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
