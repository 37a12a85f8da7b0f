//! Service lifecycle tests

use std::net::{IpAddr, Ipv4Addr};

use oscquery_server::{OscQueryService, ServiceConfig, ServiceState};
use tokio::sync::mpsc;

fn local_config() -> ServiceConfig {
    ServiceConfig {
        bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
        advertise: false,
        discovery_prime: false,
        ..Default::default()
    }
}

fn free_tcp_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn free_udp_port() -> u16 {
    let socket = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
    socket.local_addr().unwrap().port()
}

#[tokio::test]
async fn test_start_reports_host_info() {
    let (tx, _rx) = mpsc::channel(4);
    let service = OscQueryService::new(local_config(), tx);

    let host_info = service.start().await.unwrap();
    assert_eq!(host_info.name, "OSCQuery");
    assert_eq!(host_info.osc_transport, "UDP");
    assert_eq!(host_info.osc_port, service.osc_port().unwrap());
    assert_eq!(service.state(), ServiceState::Running);

    service.stop().await.unwrap();
    assert_eq!(service.state(), ServiceState::Stopped);
}

#[tokio::test]
async fn test_explicit_ports_are_used() {
    let (tx, _rx) = mpsc::channel(4);
    let config = ServiceConfig {
        http_port: Some(free_tcp_port()),
        osc_port: Some(free_udp_port()),
        ..local_config()
    };
    let expected_http = config.http_port.unwrap();
    let expected_osc = config.osc_port.unwrap();

    let service = OscQueryService::new(config, tx);
    let host_info = service.start().await.unwrap();
    assert_eq!(service.http_port(), Some(expected_http));
    assert_eq!(host_info.osc_port, expected_osc);

    service.stop().await.unwrap();
}

#[tokio::test]
async fn test_unset_osc_port_drawn_from_range() {
    let (tx, _rx) = mpsc::channel(4);
    let service = OscQueryService::new(local_config(), tx);

    let host_info = service.start().await.unwrap();
    assert!((22000..=50000).contains(&host_info.osc_port));

    service.stop().await.unwrap();
}

#[tokio::test]
async fn test_double_start_is_rejected() {
    let (tx, _rx) = mpsc::channel(4);
    let service = OscQueryService::new(local_config(), tx);

    service.start().await.unwrap();
    assert!(service.start().await.is_err());
    assert_eq!(service.state(), ServiceState::Running);

    service.stop().await.unwrap();
}

#[tokio::test]
async fn test_restart_after_stop() {
    let (tx, _rx) = mpsc::channel(4);
    let service = OscQueryService::new(local_config(), tx);

    service.start().await.unwrap();
    service.stop().await.unwrap();

    service.start().await.unwrap();
    assert_eq!(service.state(), ServiceState::Running);
    service.stop().await.unwrap();
}

#[tokio::test]
async fn test_stop_before_start_is_noop() {
    let (tx, _rx) = mpsc::channel(4);
    let service = OscQueryService::new(local_config(), tx);

    service.stop().await.unwrap();
    assert_eq!(service.state(), ServiceState::Init);
}

#[tokio::test]
async fn test_http_port_collision_fails_start() {
    let (tx, _rx) = mpsc::channel(4);
    let blocker = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let taken = blocker.local_addr().unwrap().port();

    let config = ServiceConfig {
        http_port: Some(taken),
        ..local_config()
    };
    let service = OscQueryService::new(config, tx);

    assert!(service.start().await.is_err());
    assert_eq!(service.state(), ServiceState::Stopped);
}
