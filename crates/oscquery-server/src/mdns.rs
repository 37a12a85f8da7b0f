//! mDNS advertisement and discovery priming

use mdns_sd::{ServiceDaemon, ServiceEvent, ServiceInfo};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{Result, ServerError};

/// mDNS service type for OSC Query endpoints
pub const SERVICE_TYPE: &str = "_oscjson._tcp.local.";

/// Publishes the `_oscjson._tcp` record pairing the instance name with the
/// HTTP port. TXT records are empty.
pub struct QueryAdvertiser {
    mdns: ServiceDaemon,
    fullname: Option<String>,
}

impl QueryAdvertiser {
    pub fn new() -> Result<Self> {
        let mdns = ServiceDaemon::new().map_err(|e| ServerError::Mdns(e.to_string()))?;
        Ok(Self {
            mdns,
            fullname: None,
        })
    }

    pub fn advertise(&mut self, instance: &str, port: u16) -> Result<()> {
        let host = hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "localhost".to_string());

        let properties: &[(&str, &str)] = &[];
        let service_info = ServiceInfo::new(
            SERVICE_TYPE,
            instance,
            &format!("{}.local.", host),
            "",
            port,
            properties,
        )
        .map_err(|e| ServerError::Mdns(e.to_string()))?
        .enable_addr_auto();

        self.fullname = Some(service_info.get_fullname().to_string());

        self.mdns
            .register(service_info)
            .map_err(|e| ServerError::Mdns(e.to_string()))?;

        info!("advertising {} \"{}\" on port {}", SERVICE_TYPE, instance, port);
        Ok(())
    }

    /// Clone of the daemon handle, for the discovery prime task
    pub(crate) fn daemon(&self) -> ServiceDaemon {
        self.mdns.clone()
    }

    /// Unpublish the record; shutdown must complete regardless of errors
    pub fn stop(&mut self) {
        if let Some(fullname) = self.fullname.take() {
            if let Err(e) = self.mdns.unregister(&fullname) {
                debug!("mDNS unregister failed: {}", e);
            }
        }
    }

    /// Tear down the daemon itself
    pub fn shutdown(&self) {
        if let Err(e) = self.mdns.shutdown() {
            debug!("mDNS shutdown failed: {}", e);
        }
    }
}

impl Drop for QueryAdvertiser {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One-shot browse for `_oscjson._tcp` peers.
///
/// On some hosts an outbound browse is what makes the platform mDNS stack
/// notice freshly published services, so this runs once shortly after
/// startup. Results are only logged and every failure is swallowed.
pub(crate) async fn prime_discovery(mdns: ServiceDaemon, delay: Duration, window: Duration) {
    tokio::time::sleep(delay).await;

    let receiver = match mdns.browse(SERVICE_TYPE) {
        Ok(receiver) => receiver,
        Err(e) => {
            debug!("discovery prime browse failed: {}", e);
            return;
        }
    };

    let deadline = tokio::time::Instant::now() + window;
    loop {
        tokio::select! {
            event = receiver.recv_async() => match event {
                Ok(ServiceEvent::ServiceResolved(peer)) => {
                    debug!(
                        "oscjson peer visible: {} on port {}",
                        peer.get_fullname(),
                        peer.get_port()
                    );
                }
                Ok(_) => {}
                Err(_) => break,
            },
            _ = tokio::time::sleep_until(deadline) => break,
        }
    }

    if let Err(e) = mdns.stop_browse(SERVICE_TYPE) {
        debug!("discovery prime stop failed: {}", e);
    }
}
