//! Forwarding-intent builders.
//!
//! Rule shapes for one balanced flow:
//! ```text
//! forward:  in_port=client, ip client → VIP
//!           set eth_dst=backend mac, set ip_dst=backend, output backend port
//! reverse:  in_port=backend port, ip backend → client
//!           set eth_src=virtual mac, set ip_src=VIP, output client port
//! ```
//! Re-emitting the same pair for an existing assignment replaces identical
//! entries at the switch, so installation is idempotent.

use crate::load_balancer::{Backend, ServerPool};
use crate::net::{ether_type, TrafficDescriptor};
use crate::southbound::intent::{Action, FlowMatch, FlowRule, Intent, OutputPort, PacketOut};

/// Priority and expiry for installed rewrite rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSettings {
    pub priority: u16,
    pub idle_timeout: u16,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            priority: 10,
            idle_timeout: 30,
        }
    }
}

/// Lowest-priority catch-all that sends unmatched traffic to the controller.
pub fn table_miss() -> Intent {
    Intent::FlowMod(FlowRule {
        priority: 0,
        criteria: FlowMatch::any(),
        actions: vec![Action::Output {
            port: OutputPort::Controller,
        }],
        idle_timeout: 0,
        hard_timeout: 0,
        notify_removal: false,
    })
}

fn forward_actions(backend: &Backend) -> Vec<Action> {
    vec![
        Action::SetEthDst { mac: backend.mac },
        Action::SetIpv4Dst { ip: backend.address },
        Action::Output {
            port: OutputPort::Physical(backend.port),
        },
    ]
}

/// Rules and packet-out for a client assigned to `backend`.
pub fn balanced_flow(
    event: &TrafficDescriptor,
    pool: &ServerPool,
    backend: &Backend,
    settings: RuleSettings,
) -> Vec<Intent> {
    let Some(client) = event.src_ip() else {
        return Vec::new();
    };

    let forward = FlowRule {
        priority: settings.priority,
        criteria: FlowMatch {
            in_port: Some(event.in_port),
            eth_type: Some(ether_type::IPV4),
            ipv4_src: Some(client),
            ipv4_dst: Some(pool.virtual_ip),
            ..FlowMatch::default()
        },
        actions: forward_actions(backend),
        idle_timeout: settings.idle_timeout,
        hard_timeout: 0,
        notify_removal: true,
    };

    let reverse = FlowRule {
        priority: settings.priority,
        criteria: FlowMatch {
            in_port: Some(backend.port),
            eth_type: Some(ether_type::IPV4),
            ipv4_src: Some(backend.address),
            ipv4_dst: Some(client),
            ..FlowMatch::default()
        },
        actions: vec![
            Action::SetEthSrc {
                mac: pool.virtual_mac,
            },
            Action::SetIpv4Src {
                ip: pool.virtual_ip,
            },
            Action::Output {
                port: OutputPort::Physical(event.in_port),
            },
        ],
        idle_timeout: settings.idle_timeout,
        hard_timeout: 0,
        notify_removal: false,
    };

    let packet_out = PacketOut {
        in_port: event.in_port,
        actions: forward_actions(backend),
        payload: event.payload.clone(),
    };

    vec![
        Intent::FlowMod(forward),
        Intent::FlowMod(reverse),
        Intent::PacketOut(packet_out),
    ]
}

/// Deliver the frame on every port except its ingress port.
pub fn flood(event: &TrafficDescriptor) -> Intent {
    Intent::PacketOut(PacketOut {
        in_port: event.in_port,
        actions: vec![Action::Output {
            port: OutputPort::Flood,
        }],
        payload: event.payload.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_balancer::tests::pool;
    use crate::net::MacAddr;
    use std::net::Ipv4Addr;

    #[test]
    fn test_balanced_flow_rules() {
        let pool = pool(3);
        let backend = pool.get(1).unwrap().clone();
        let client = Ipv4Addr::new(10, 0, 0, 11);
        let mut ev = TrafficDescriptor::ipv4(1, MacAddr::default(), client, pool.virtual_ip);
        ev.payload = vec![1, 2, 3];

        let intents = balanced_flow(&ev, &pool, &backend, RuleSettings::default());
        assert_eq!(intents.len(), 3);

        let fwd = intents[0].as_flow_rule().unwrap();
        assert_eq!(fwd.priority, 10);
        assert_eq!(fwd.idle_timeout, 30);
        assert!(fwd.notify_removal);
        assert_eq!(fwd.criteria.ipv4_src, Some(client));
        assert_eq!(fwd.criteria.ipv4_dst, Some(pool.virtual_ip));
        assert_eq!(fwd.actions.last(), Some(&Action::Output { port: OutputPort::Physical(3) }));

        let rev = intents[1].as_flow_rule().unwrap();
        assert_eq!(rev.criteria.in_port, Some(3));
        assert_eq!(rev.criteria.ipv4_src, Some(backend.address));
        assert_eq!(rev.criteria.ipv4_dst, Some(client));
        assert!(rev.actions.contains(&Action::SetIpv4Src { ip: pool.virtual_ip }));
        assert!(rev.actions.contains(&Action::SetEthSrc { mac: pool.virtual_mac }));
        assert_eq!(rev.actions.last(), Some(&Action::Output { port: OutputPort::Physical(1) }));

        let out = intents[2].as_packet_out().unwrap();
        assert_eq!(out.payload, vec![1, 2, 3]);
        assert_eq!(out.actions, fwd.actions);
    }

    #[test]
    fn test_flood_keeps_ingress() {
        let ev = TrafficDescriptor::ipv4(7, MacAddr::default(), Ipv4Addr::LOCALHOST, Ipv4Addr::BROADCAST);
        let out = flood(&ev);
        let out = out.as_packet_out().unwrap();
        assert_eq!(out.in_port, 7);
        assert_eq!(out.actions, vec![Action::Output { port: OutputPort::Flood }]);
    }
}
