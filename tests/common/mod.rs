//! Shared utilities for integration tests.

use std::net::Ipv4Addr;
use std::sync::Arc;
use vip_balancer::net::{MacAddr, TrafficDescriptor};
use vip_balancer::{BalancerConfig, Controller};

pub const VIP: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 1);

#[allow(dead_code)]
pub fn ip(last: u8) -> Ipv4Addr {
    Ipv4Addr::new(10, 0, 0, last)
}

/// Controller over the default pool [10.0.0.2, 10.0.0.3, 10.0.0.4].
pub fn controller() -> Arc<Controller> {
    Arc::new(Controller::from_config(&BalancerConfig::default()).unwrap())
}

/// A client packet addressed to the virtual IP.
#[allow(dead_code)]
pub fn new_flow(client: u8) -> TrafficDescriptor {
    TrafficDescriptor::ipv4(1, MacAddr::new([0, 0, 0, 0, 1, client]), ip(client), VIP)
}

/// Backend address a new-flow event was rewritten to.
#[allow(dead_code)]
pub fn assigned_backend(controller: &Controller, client: u8) -> Ipv4Addr {
    let intents = controller.handle_event(&new_flow(client));
    let rule = intents[0].as_flow_rule().expect("forward rule first");
    rule.actions
        .iter()
        .find_map(|a| match a {
            vip_balancer::southbound::Action::SetIpv4Dst { ip } => Some(*ip),
            _ => None,
        })
        .expect("forward rule rewrites destination")
}
