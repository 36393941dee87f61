//! Forwarding intents emitted by the core.
//!
//! These are protocol-neutral descriptions of flow-table entries and
//! packet-out requests. The southbound session serializes them one per line;
//! a switch agent translates them into its own control protocol.

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

use crate::net::MacAddr;

/// Match criteria. `None` fields are wildcards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowMatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_port: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eth_type: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv4_src: Option<Ipv4Addr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv4_dst: Option<Ipv4Addr>,
}

impl FlowMatch {
    /// Match everything (table-miss entry).
    pub fn any() -> Self {
        Self::default()
    }
}

/// Where a packet leaves the switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputPort {
    Physical(u32),
    /// Every port except the ingress one.
    Flood,
    /// Punt to the controller.
    Controller,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    SetEthSrc { mac: MacAddr },
    SetEthDst { mac: MacAddr },
    SetIpv4Src { ip: Ipv4Addr },
    SetIpv4Dst { ip: Ipv4Addr },
    Output { port: OutputPort },
}

/// A flow-table entry to install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRule {
    pub priority: u16,
    #[serde(rename = "match")]
    pub criteria: FlowMatch,
    pub actions: Vec<Action>,
    /// Seconds of inactivity before the switch evicts the rule. 0 = never.
    pub idle_timeout: u16,
    pub hard_timeout: u16,
    /// Ask the switch to report the rule's removal.
    #[serde(default)]
    pub notify_removal: bool,
}

/// Forward one already-received frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketOut {
    pub in_port: u32,
    pub actions: Vec<Action>,
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    FlowMod(FlowRule),
    PacketOut(PacketOut),
}

impl Intent {
    pub fn as_flow_rule(&self) -> Option<&FlowRule> {
        match self {
            Intent::FlowMod(rule) => Some(rule),
            Intent::PacketOut(_) => None,
        }
    }

    pub fn as_packet_out(&self) -> Option<&PacketOut> {
        match self {
            Intent::PacketOut(out) => Some(out),
            Intent::FlowMod(_) => None,
        }
    }
}
