//! Classification and dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! TrafficDescriptor
//!     → classifier.rs (Discovery | Unclassifiable | NewFlow | ReturnFlow | PassThrough)
//!     → controller (assignment + accounting for NewFlow)
//!     → intents.rs (rewrite rules both directions, packet-out, or flood)
//! ```
//!
//! # Design Decisions
//! - Classification never fails; odd traffic maps to a drop route
//! - Return traffic is flooded when it reaches the controller; the reverse
//!   rule installed on the new-flow path normally keeps it off this path

pub mod classifier;
pub mod intents;

pub use classifier::{classify, Route};
pub use intents::RuleSettings;
