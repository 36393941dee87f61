//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! New flow for a virtual address
//!     → pool.rs (ordered backends for that address)
//!     → flow.rs (existing assignment? reuse it)
//!     → otherwise apply the selected algorithm:
//!         - round_robin.rs (rotate through backends)
//!         - least_load.rs (pick backend with lowest decaying load)
//!     → accounting.rs (charge load, count hit)
//!     → Return backend
//! ```
//!
//! # Design Decisions
//! - Strategies are pure: pool, loads and rotation in; choice and next rotation out
//! - Mutable state lives in `service::VirtualService`, one per virtual address
//! - The active algorithm is a process-wide value read on every selection

pub mod accounting;
pub mod backend;
pub mod error;
pub mod flow;
pub mod least_load;
pub mod pool;
pub mod round_robin;
pub mod service;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub use accounting::{BackendStats, LoadAccounting, ServiceStats, StatisticsSnapshot};
pub use backend::Backend;
pub use error::LbError;
pub use flow::{Assignment, FlowTracker};
pub use least_load::LeastLoad;
pub use pool::{PoolRegistry, ServerPool};
pub use round_robin::RoundRobin;
pub use service::VirtualService;

/// Outcome of one selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Position of the chosen backend in the pool.
    pub index: usize,
    /// Rotation state to pass to the next call.
    pub rotation: usize,
}

/// A backend selection strategy.
pub trait LoadBalancer: Send + Sync + fmt::Debug {
    /// Choose a backend. `loads` is indexed like `backends`.
    /// Returns `None` only for an empty pool.
    fn next_server(
        &self,
        backends: &[Arc<Backend>],
        loads: &[u64],
        rotation: usize,
    ) -> Option<Selection>;
}

static ROUND_ROBIN: RoundRobin = RoundRobin;
static LEAST_LOAD: LeastLoad = LeastLoad;

/// Process-wide algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    #[default]
    RoundRobin,
    LeastLoad,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::RoundRobin => "round-robin",
            Algorithm::LeastLoad => "least-load",
        }
    }

    pub fn strategy(&self) -> &'static dyn LoadBalancer {
        match self {
            Algorithm::RoundRobin => &ROUND_ROBIN,
            Algorithm::LeastLoad => &LEAST_LOAD,
        }
    }
}

impl FromStr for Algorithm {
    type Err = LbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "round-robin" => Ok(Algorithm::RoundRobin),
            "least-load" => Ok(Algorithm::LeastLoad),
            other => Err(LbError::InvalidAlgorithm(other.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
