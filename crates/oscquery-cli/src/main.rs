//! Command-line OSC Query node
//!
//! Starts a discoverable endpoint with a small demo namespace and logs
//! every OSC message accepted by the subscription filter.

use std::net::IpAddr;

use anyhow::Result;
use clap::Parser;
use oscquery_core::{Access, Argument, MethodSpec, Range, TypeCode};
use oscquery_server::{OscQueryService, ServiceConfig};
use rosc::OscType;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Discoverable OSC Query endpoint
#[derive(Parser)]
#[command(name = "oscquery")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TCP port for the query API (OS-assigned when omitted)
    #[arg(long)]
    http_port: Option<u16>,

    /// UDP port for OSC (randomly drawn when omitted)
    #[arg(long)]
    osc_port: Option<u16>,

    /// Interface for the HTTP listener
    #[arg(short, long, default_value = "0.0.0.0")]
    bind: IpAddr,

    /// Instance name advertised over mDNS
    #[arg(short, long, default_value = "OSCQuery")]
    service_name: String,

    /// Advertised HOST_INFO name (defaults to the service name)
    #[arg(long)]
    host_name: Option<String>,

    /// Skip mDNS advertisement
    #[arg(long)]
    no_advertise: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let config = ServiceConfig {
        http_port: cli.http_port,
        osc_port: cli.osc_port,
        bind_address: cli.bind,
        host_name: cli.host_name,
        service_name: cli.service_name,
        advertise: !cli.no_advertise,
        ..Default::default()
    };

    let (tx, mut rx) = mpsc::channel(256);
    let service = OscQueryService::new(config, tx);
    register_demo_namespace(&service)?;

    let host_info = service.start().await?;
    info!(
        "\"{}\" ready: http port {}, osc {}:{} ({})",
        host_info.name,
        service.http_port().unwrap_or_default(),
        host_info.osc_ip,
        host_info.osc_port,
        host_info.osc_transport,
    );

    let printer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            info!("osc {} {:?}", msg.addr, msg.args);
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    service.stop().await?;
    printer.abort();

    Ok(())
}

/// A few VRChat-flavored endpoints so browsers have something to look at
fn register_demo_namespace(service: &OscQueryService) -> Result<()> {
    service.add_method(
        "/chatbox/input",
        MethodSpec {
            description: Some("Chatbox text input".to_string()),
            access: Some(Access::WriteOnly),
            arguments: Some(vec![
                Argument::new(TypeCode::OscString),
                Argument::new(TypeCode::True),
            ]),
            ..Default::default()
        },
    );

    service.add_method(
        "/avatar/parameters/mood",
        MethodSpec {
            description: Some("Mood blend".to_string()),
            access: Some(Access::ReadWrite),
            arguments: Some(vec![Argument::new(TypeCode::Float32).with_range(Range {
                min: Some(OscType::Float(0.0)),
                max: Some(OscType::Float(1.0)),
                vals: None,
            })]),
            ..Default::default()
        },
    );
    service.set_value("/avatar/parameters/mood", 0, OscType::Float(0.5))?;

    Ok(())
}
