//! Southbound interface subsystem.
//!
//! # Data Flow
//! ```text
//! Switch agent (TCP)
//!     → listener.rs (accept loop, connection limits)
//!     → session.rs (JSON lines → SouthboundEvent)
//!     → Controller (on_switch_connect | handle_event | on_flow_removed)
//!     → intent.rs (Intent → JSON lines back to the agent)
//! ```
//!
//! # Design Decisions
//! - The wire protocol of the switch itself lives in the agent, not here
//! - One session per agent connection; sessions share the controller

pub mod intent;
pub mod listener;
pub mod message;
pub mod session;

pub use intent::{Action, FlowMatch, FlowRule, Intent, OutputPort, PacketOut};
pub use listener::Listener;
pub use message::SouthboundEvent;
pub use session::{run_session, SessionStats};

#[derive(Debug, thiserror::Error)]
pub enum SouthboundError {
    #[error("failed to bind: {0}")]
    Bind(std::io::Error),
    #[error("failed to accept: {0}")]
    Accept(std::io::Error),
    #[error("listener closed")]
    Closed,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}
