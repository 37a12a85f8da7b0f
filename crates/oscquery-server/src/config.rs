//! Service configuration and the HOST_INFO record

use serde::Serialize;
use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr};
use std::ops::RangeInclusive;
use std::time::Duration;

/// Construction options for [`OscQueryService`](crate::OscQueryService).
///
/// Every field has a usable default; unset ports are allocated at startup
/// (the HTTP port by the OS, the OSC port drawn from `osc_port_range`).
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// TCP port for the HTTP API; OS-assigned when absent
    pub http_port: Option<u16>,
    /// UDP port for OSC; randomly drawn from `osc_port_range` when absent
    pub osc_port: Option<u16>,
    /// Interface for the HTTP listener
    pub bind_address: IpAddr,
    /// Address advertised in `HOST_INFO.OSC_IP`; defaults to `bind_address`
    pub osc_ip: Option<IpAddr>,
    /// Advertised transport string
    pub osc_transport: String,
    /// Advertised `HOST_INFO.NAME`; defaults to `service_name`
    pub host_name: Option<String>,
    /// mDNS instance name
    pub service_name: String,
    /// Description assigned to the root node
    pub root_description: String,
    /// Draw range for an unset OSC port
    pub osc_port_range: RangeInclusive<u16>,
    /// Publish the `_oscjson._tcp` record
    pub advertise: bool,
    /// Run the one-shot discovery browse after startup
    pub discovery_prime: bool,
    /// Delay before the discovery browse starts
    pub prime_delay: Duration,
    /// How long the discovery browse stays open
    pub prime_window: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            http_port: None,
            osc_port: None,
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            osc_ip: None,
            osc_transport: "UDP".to_string(),
            host_name: None,
            service_name: "OSCQuery".to_string(),
            root_description: "root node".to_string(),
            osc_port_range: 22000..=50000,
            advertise: true,
            discovery_prime: true,
            prime_delay: Duration::from_secs(2),
            prime_window: Duration::from_secs(1),
        }
    }
}

/// The `HOST_INFO` side-channel record, also returned from service start.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct HostInfo {
    pub name: String,
    pub extensions: BTreeMap<String, bool>,
    pub osc_ip: String,
    pub osc_port: u16,
    pub osc_transport: String,
}

impl HostInfo {
    /// The attribute set this server implements; all advertised as supported
    pub fn supported_extensions() -> BTreeMap<String, bool> {
        [
            "ACCESS",
            "VALUE",
            "RANGE",
            "DESCRIPTION",
            "TAGS",
            "CRITICAL",
            "CLIPMODE",
        ]
        .into_iter()
        .map(|name| (name.to_string(), true))
        .collect()
    }
}
