//! Service lifecycle orchestration
//!
//! Startup order: tree exists from construction, then HTTP listener, UDP
//! receiver, mDNS publication, discovery prime. Shutdown runs in reverse:
//! UDP socket closed, mDNS unpublished and destroyed, HTTP server drained.

use oscquery_core::{AddressSpace, MethodSpec};
use parking_lot::{Mutex, RwLock};
use rand::Rng;
use rosc::OscType;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::{HostInfo, ServiceConfig};
use crate::error::{Result, ServerError};
use crate::filter::SubscriptionFilter;
use crate::http::{build_router, AppState};
use crate::mdns::{prime_discovery, QueryAdvertiser};
use crate::osc::{run_receiver, OscSink};

/// Lifecycle states; `start` is accepted from `Init` and `Stopped` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Init,
    Starting,
    Running,
    Stopping,
    Stopped,
}

/// How long `stop` waits for the receiver to finish a blocked sink send
/// before aborting it
const RECEIVER_GRACE: Duration = Duration::from_secs(2);

struct RuntimeHandles {
    http_task: JoinHandle<()>,
    osc_task: JoinHandle<()>,
    advertiser: Option<QueryAdvertiser>,
    http_port: u16,
    osc_port: u16,
}

/// A discoverable OSC Query endpoint.
///
/// Owns the address-space tree and the subscription filter behind
/// reader-writer locks: mutators here take the write side, while the HTTP
/// handlers and the UDP receive path take the read side.
pub struct OscQueryService {
    config: ServiceConfig,
    tree: Arc<RwLock<AddressSpace>>,
    filter: Arc<RwLock<SubscriptionFilter>>,
    sink: OscSink,
    state: watch::Sender<ServiceState>,
    shutdown: watch::Sender<bool>,
    runtime: Mutex<Option<RuntimeHandles>>,
}

impl OscQueryService {
    /// Create a stopped service; accepted OSC messages will be forwarded
    /// to `sink`.
    pub fn new(config: ServiceConfig, sink: OscSink) -> Self {
        let tree = AddressSpace::with_root_description(config.root_description.clone());
        let (state, _) = watch::channel(ServiceState::Init);
        let (shutdown, _) = watch::channel(false);

        Self {
            config,
            tree: Arc::new(RwLock::new(tree)),
            filter: Arc::new(RwLock::new(SubscriptionFilter::new())),
            sink,
            state,
            shutdown,
            runtime: Mutex::new(None),
        }
    }

    pub fn state(&self) -> ServiceState {
        *self.state.borrow()
    }

    /// Bind the listeners, publish the mDNS record, and return the
    /// `HOST_INFO` record describing the endpoint pair.
    pub async fn start(&self) -> Result<HostInfo> {
        let mut claimed = false;
        self.state.send_if_modified(|state| {
            if matches!(*state, ServiceState::Init | ServiceState::Stopped) {
                *state = ServiceState::Starting;
                claimed = true;
                true
            } else {
                false
            }
        });
        if !claimed {
            return Err(ServerError::InvalidState(format!(
                "cannot start from {:?}",
                self.state()
            )));
        }

        self.shutdown.send_replace(false);

        match self.start_inner().await {
            Ok(host_info) => {
                self.state.send_replace(ServiceState::Running);
                Ok(host_info)
            }
            Err(e) => {
                self.state.send_replace(ServiceState::Stopped);
                Err(e)
            }
        }
    }

    async fn start_inner(&self) -> Result<HostInfo> {
        let cfg = &self.config;

        let http_addr = SocketAddr::new(cfg.bind_address, cfg.http_port.unwrap_or(0));
        let listener = TcpListener::bind(http_addr)
            .await
            .map_err(|e| ServerError::Bind(format!("http {}: {}", http_addr, e)))?;
        let http_port = listener
            .local_addr()
            .map_err(|e| ServerError::Bind(format!("http {}: {}", http_addr, e)))?
            .port();

        let osc_port = cfg.osc_port.unwrap_or_else(|| {
            rand::thread_rng().gen_range(cfg.osc_port_range.clone())
        });
        let osc_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, osc_port));
        let udp = UdpSocket::bind(osc_addr)
            .await
            .map_err(|e| ServerError::Bind(format!("osc {}: {}", osc_addr, e)))?;

        let host_info = HostInfo {
            name: cfg
                .host_name
                .clone()
                .unwrap_or_else(|| cfg.service_name.clone()),
            extensions: HostInfo::supported_extensions(),
            osc_ip: cfg.osc_ip.unwrap_or(cfg.bind_address).to_string(),
            osc_port,
            osc_transport: cfg.osc_transport.clone(),
        };

        let router = build_router(AppState {
            tree: Arc::clone(&self.tree),
            host_info: Arc::new(host_info.clone()),
        });
        let mut http_shutdown = self.shutdown.subscribe();
        let http_task = tokio::spawn(async move {
            let drained = async move {
                let _ = http_shutdown.wait_for(|stop| *stop).await;
            };
            if let Err(e) = axum::serve(listener, router)
                .with_graceful_shutdown(drained)
                .await
            {
                warn!("http server error: {}", e);
            }
        });
        info!("OSC Query endpoint listening on http port {}", http_port);

        let osc_task = tokio::spawn(run_receiver(
            udp,
            Arc::clone(&self.filter),
            self.sink.clone(),
            self.shutdown.subscribe(),
        ));
        info!("OSC receiver listening on udp port {}", osc_port);

        let mut advertiser = None;
        if cfg.advertise {
            match QueryAdvertiser::new() {
                Ok(mut adv) => {
                    if let Err(e) = adv.advertise(&cfg.service_name, http_port) {
                        warn!("mDNS advertise failed: {}", e);
                    }
                    if cfg.discovery_prime {
                        tokio::spawn(prime_discovery(
                            adv.daemon(),
                            cfg.prime_delay,
                            cfg.prime_window,
                        ));
                    }
                    advertiser = Some(adv);
                }
                Err(e) => warn!("mDNS daemon unavailable: {}", e),
            }
        }

        *self.runtime.lock() = Some(RuntimeHandles {
            http_task,
            osc_task,
            advertiser,
            http_port,
            osc_port,
        });

        Ok(host_info)
    }

    /// Stop listeners and discovery. A stop issued while a start is in
    /// flight waits for the start to settle first; stopping an already
    /// stopped service is a no-op.
    pub async fn stop(&self) -> Result<()> {
        let mut rx = self.state.subscribe();
        loop {
            let mut claimed = false;
            self.state.send_if_modified(|state| {
                if *state == ServiceState::Running {
                    *state = ServiceState::Stopping;
                    claimed = true;
                    true
                } else {
                    false
                }
            });
            if claimed {
                break;
            }

            let current = *rx.borrow_and_update();
            match current {
                ServiceState::Init | ServiceState::Stopped => return Ok(()),
                ServiceState::Starting => {
                    let _ = rx.changed().await;
                }
                ServiceState::Stopping => {
                    let _ = rx.wait_for(|state| *state == ServiceState::Stopped).await;
                    return Ok(());
                }
                ServiceState::Running => {}
            }
        }

        let handles = self.runtime.lock().take();
        if let Some(mut handles) = handles {
            // UDP first: the receiver selects on the shutdown channel and
            // drops the socket on return
            self.shutdown.send_replace(true);
            if tokio::time::timeout(RECEIVER_GRACE, &mut handles.osc_task)
                .await
                .is_err()
            {
                handles.osc_task.abort();
            }

            if let Some(mut advertiser) = handles.advertiser.take() {
                advertiser.stop();
                advertiser.shutdown();
            }

            // HTTP last, awaiting the graceful drain
            let _ = handles.http_task.await;
        }

        self.state.send_replace(ServiceState::Stopped);
        info!("OSC Query service stopped");
        Ok(())
    }

    /// Actual HTTP port, once running
    pub fn http_port(&self) -> Option<u16> {
        self.runtime.lock().as_ref().map(|h| h.http_port)
    }

    /// Actual OSC UDP port, once running
    pub fn osc_port(&self) -> Option<u16> {
        self.runtime.lock().as_ref().map(|h| h.osc_port)
    }

    // Tree operations; write-locked so HTTP readers see whole mutations

    pub fn add_method(&self, path: &str, spec: MethodSpec) {
        self.tree.write().add_method(path, spec);
    }

    pub fn remove_method(&self, path: &str) {
        self.tree.write().remove_method(path);
    }

    pub fn set_value(
        &self,
        path: &str,
        index: usize,
        value: OscType,
    ) -> oscquery_core::Result<()> {
        self.tree.write().set_value(path, index, value)
    }

    pub fn unset_value(&self, path: &str, index: usize) -> oscquery_core::Result<()> {
        self.tree.write().unset_value(path, index)
    }

    pub fn get_value(&self, path: &str, index: usize) -> Option<OscType> {
        self.tree.read().get_value(path, index).cloned()
    }

    // Subscription filter operations

    pub fn subscribe(&self, pattern: &str) {
        self.filter.write().subscribe(pattern);
    }

    pub fn unsubscribe(&self, pattern: &str) {
        self.filter.write().unsubscribe(pattern);
    }

    pub fn subscribe_all(&self) {
        self.filter.write().subscribe_all();
    }
}
