//! OSC receive path tests
//!
//! Real UDP datagrams encoded with rosc are sent at a started service; the
//! tests assert what reaches the sink channel under the different
//! subscription modes, and that malformed datagrams do not take the
//! receiver down.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use oscquery_server::{OscQueryService, ServiceConfig};
use rosc::{OscBundle, OscMessage, OscPacket, OscTime, OscType};
use tokio::sync::mpsc;
use tokio::time::timeout;

async fn start_service() -> (OscQueryService, mpsc::Receiver<OscMessage>, u16) {
    let (tx, rx) = mpsc::channel(16);
    let config = ServiceConfig {
        bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
        advertise: false,
        discovery_prime: false,
        ..Default::default()
    };

    let service = OscQueryService::new(config, tx);
    service.start().await.expect("service start");
    let port = service.osc_port().unwrap();
    (service, rx, port)
}

fn send_message(port: u16, addr: &str, args: Vec<OscType>) {
    let packet = OscPacket::Message(OscMessage {
        addr: addr.to_string(),
        args,
    });
    send_packet(port, &packet);
}

fn send_packet(port: u16, packet: &OscPacket) {
    let bytes = rosc::encoder::encode(packet).expect("encode OSC");
    let socket = std::net::UdpSocket::bind("127.0.0.1:0").expect("bind sender");
    socket
        .send_to(&bytes, ("127.0.0.1", port))
        .expect("send datagram");
}

async fn recv(rx: &mut mpsc::Receiver<OscMessage>) -> OscMessage {
    timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for OSC message")
        .expect("sink closed")
}

async fn expect_silence(rx: &mut mpsc::Receiver<OscMessage>) {
    let result = timeout(Duration::from_millis(300), rx.recv()).await;
    assert!(result.is_err(), "expected no message, got {:?}", result);
}

#[tokio::test]
async fn test_accept_all_by_default() {
    let (service, mut rx, port) = start_service().await;

    send_message(port, "/test/fader", vec![OscType::Float(0.75)]);

    let msg = recv(&mut rx).await;
    assert_eq!(msg.addr, "/test/fader");
    assert_eq!(msg.args, vec![OscType::Float(0.75)]);

    service.stop().await.unwrap();
}

#[tokio::test]
async fn test_subscription_filtering() {
    let (service, mut rx, port) = start_service().await;
    service.subscribe("/avatar/parameters/*");

    send_message(port, "/other/address", vec![OscType::Int(1)]);
    expect_silence(&mut rx).await;

    send_message(port, "/avatar/parameters/mood", vec![OscType::Float(0.5)]);
    let msg = recv(&mut rx).await;
    assert_eq!(msg.addr, "/avatar/parameters/mood");

    // removing the last pattern re-enables accept-all
    service.unsubscribe("/avatar/parameters/*");
    send_message(port, "/other/address", vec![OscType::Int(2)]);
    let msg = recv(&mut rx).await;
    assert_eq!(msg.addr, "/other/address");

    service.stop().await.unwrap();
}

#[tokio::test]
async fn test_malformed_datagram_is_dropped() {
    let (service, mut rx, port) = start_service().await;

    let socket = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
    socket
        .send_to(b"definitely not OSC", ("127.0.0.1", port))
        .unwrap();

    // the receiver survives and keeps decoding
    send_message(port, "/still/alive", vec![]);
    let msg = recv(&mut rx).await;
    assert_eq!(msg.addr, "/still/alive");

    service.stop().await.unwrap();
}

#[tokio::test]
async fn test_bundle_is_flattened() {
    let (service, mut rx, port) = start_service().await;

    let bundle = OscPacket::Bundle(OscBundle {
        timetag: OscTime {
            seconds: 0,
            fractional: 1,
        },
        content: vec![
            OscPacket::Message(OscMessage {
                addr: "/one".to_string(),
                args: vec![OscType::Int(1)],
            }),
            OscPacket::Message(OscMessage {
                addr: "/two".to_string(),
                args: vec![OscType::Int(2)],
            }),
        ],
    });
    send_packet(port, &bundle);

    let first = recv(&mut rx).await;
    let second = recv(&mut rx).await;
    assert_eq!(first.addr, "/one");
    assert_eq!(second.addr, "/two");

    service.stop().await.unwrap();
}
