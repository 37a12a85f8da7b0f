//! OSC Query Server
//!
//! A discoverable OSC endpoint:
//! - Serves the address space as OSC Query JSON over HTTP ([`http`])
//! - Receives OSC messages over UDP and forwards accepted ones to an
//!   injected sink channel ([`osc`], [`filter`])
//! - Advertises `_oscjson._tcp` over mDNS and primes peer discovery with a
//!   one-shot browse ([`mdns`])
//! - Ties the pieces together with ordered startup/shutdown ([`service`])
//!
//! # Example
//!
//! ```no_run
//! use oscquery_server::{OscQueryService, ServiceConfig};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (tx, mut rx) = mpsc::channel(64);
//!     let service = OscQueryService::new(ServiceConfig::default(), tx);
//!     let host_info = service.start().await?;
//!     println!("listening for OSC on {}", host_info.osc_port);
//!     while let Some(msg) = rx.recv().await {
//!         println!("{} {:?}", msg.addr, msg.args);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod http;
pub mod mdns;
pub mod osc;
pub mod service;

pub use config::{HostInfo, ServiceConfig};
pub use error::{Result, ServerError};
pub use filter::SubscriptionFilter;
pub use osc::OscSink;
pub use service::{OscQueryService, ServiceState};
