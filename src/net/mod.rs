//! Packet-level types shared with the southbound interface.
//!
//! # Data Flow
//! ```text
//! Switch packet-in
//!     → southbound session decodes a TrafficDescriptor
//!     → routing::classify (uses eth type + network header)
//!     → intents reference MacAddr / Ipv4Addr for rewrites
//! ```
//!
//! # Design Decisions
//! - No raw header parsing here; descriptors arrive pre-parsed
//! - MAC addresses serialize as `aa:bb:cc:dd:ee:ff` strings

pub mod descriptor;
pub mod mac;

pub use descriptor::{ether_type, NetworkHeader, TrafficDescriptor};
pub use mac::MacAddr;
