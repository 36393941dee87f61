//! SDN load-balancer decision core.
//!
//! Decides which backend receives a client's traffic for a virtual service
//! address, tracks flow affinity and backend load, and expresses every
//! decision as forwarding intents for a switch agent to install.

pub mod admin;
pub mod config;
pub mod controller;
pub mod lifecycle;
pub mod load_balancer;
pub mod monitor;
pub mod net;
pub mod observability;
pub mod routing;
pub mod southbound;

pub use config::BalancerConfig;
pub use controller::Controller;
pub use lifecycle::Shutdown;
