//! Inbound messages from a switch agent.

use serde::{Deserialize, Serialize};

use crate::net::TrafficDescriptor;
use crate::southbound::intent::FlowMatch;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SouthboundEvent {
    /// A switch finished its handshake with the agent.
    SwitchConnected { datapath_id: u64 },
    /// A frame missed every installed rule.
    PacketIn(TrafficDescriptor),
    /// A rule installed with `notify_removal` expired or was deleted.
    FlowRemoved {
        datapath_id: u64,
        #[serde(rename = "match")]
        criteria: FlowMatch,
    },
}
