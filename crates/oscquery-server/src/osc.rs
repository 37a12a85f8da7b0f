//! UDP OSC receiver
//!
//! Decodes each datagram with the `rosc` codec, flattens bundles, runs the
//! address through the subscription filter, and forwards accepted messages
//! to the injected sink. Malformed datagrams are logged and dropped; the
//! socket stays open.

use parking_lot::RwLock;
use rosc::{OscMessage, OscPacket};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::filter::SubscriptionFilter;

/// Channel receiving accepted OSC messages as `(address, args)` records
pub type OscSink = mpsc::Sender<OscMessage>;

pub(crate) async fn run_receiver(
    socket: UdpSocket,
    filter: Arc<RwLock<SubscriptionFilter>>,
    sink: OscSink,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut buf = vec![0u8; 65536];

    loop {
        tokio::select! {
            received = socket.recv_from(&mut buf) => match received {
                Ok((len, from)) => {
                    match rosc::decoder::decode_udp(&buf[..len]) {
                        Ok((_, packet)) => deliver(packet, &filter, &sink).await,
                        Err(e) => debug!("OSC decode error from {}: {:?}", from, e),
                    }
                }
                Err(e) => {
                    warn!("OSC recv error: {}", e);
                }
            },
            _ = shutdown.changed() => break,
        }
    }

    debug!("OSC receiver stopped");
}

async fn deliver(packet: OscPacket, filter: &Arc<RwLock<SubscriptionFilter>>, sink: &OscSink) {
    match packet {
        OscPacket::Message(msg) => {
            let accepted = filter.read().accepts(&msg.addr);
            if accepted {
                if sink.send(msg).await.is_err() {
                    debug!("OSC sink closed, dropping message");
                }
            } else {
                debug!("filtered out {}", msg.addr);
            }
        }
        OscPacket::Bundle(bundle) => {
            for inner in bundle.content {
                Box::pin(deliver(inner, filter, sink)).await;
            }
        }
    }
}
