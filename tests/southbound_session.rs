//! Southbound listener tests over real TCP connections.

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use vip_balancer::lifecycle::Shutdown;
use vip_balancer::southbound::{Intent, Listener};

mod common;

#[tokio::test]
async fn test_agent_session_over_tcp() {
    let controller = common::controller();
    let shutdown = Shutdown::new();

    let tcp = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let listener = Listener::from_listener(tcp, 4);
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(listener.serve(controller.clone(), shutdown.subscribe()));

    let stream = TcpStream::connect(addr).await.unwrap();
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    write_half
        .write_all(b"{\"type\":\"switch_connected\",\"datapath_id\":7}\n")
        .await
        .unwrap();
    let line = lines.next_line().await.unwrap().unwrap();
    let intent: Intent = serde_json::from_str(&line).unwrap();
    assert_eq!(intent.as_flow_rule().unwrap().priority, 0);

    let event = serde_json::json!({
        "type": "packet_in",
        "in_port": 1,
        "eth_src": "00:00:00:00:01:0b",
        "ether_type": 2048,
        "network": {"src": "10.0.0.11", "dst": "10.0.0.1", "protocol": 6},
        "payload": [1, 2, 3]
    });
    write_half
        .write_all(format!("{}\n", event).as_bytes())
        .await
        .unwrap();

    let mut received = Vec::new();
    for _ in 0..3 {
        let line = tokio::time::timeout(Duration::from_secs(2), lines.next_line())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        received.push(serde_json::from_str::<Intent>(&line).unwrap());
    }
    assert!(received[0].as_flow_rule().unwrap().notify_removal);
    assert_eq!(received[2].as_packet_out().unwrap().payload, vec![1, 2, 3]);
    assert_eq!(controller.statistics().total_requests, 1);
    assert_eq!(controller.flows().len(), 1);

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(2), server)
        .await
        .unwrap()
        .unwrap();
}
