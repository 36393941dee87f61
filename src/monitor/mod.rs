//! Background monitoring subsystem.
//!
//! # Data Flow
//! ```text
//! Periodic timer (decay.rs)
//!     → Controller::decay_tick (all loads -1, floored at 0)
//!     → snapshot → logs, metrics gauges, watch channel
//! ```
//!
//! # Design Decisions
//! - Runs for the process lifetime; stops only on the shutdown broadcast
//! - First tick fires one full interval after start

pub mod decay;

pub use decay::DecayMonitor;
