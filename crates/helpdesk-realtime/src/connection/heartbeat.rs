//! Ping/pong heartbeat loop with dead-connection reaping.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info};

use helpdesk_core::config::RealtimeConfig;

use super::manager::ConnectionManager;

/// Run the heartbeat loop until shutdown is signalled.
///
/// Each tick pings every live connection and reaps connections that have
/// been silent past the pong timeout.
pub async fn run_heartbeat(
    connections: Arc<ConnectionManager>,
    config: RealtimeConfig,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    let mut interval = tokio::time::interval(config.ping_interval());
    let timeout = config.ping_timeout();

    loop {
        tokio::select! {
            _ = interval.tick() => {
                connections.ping_all();
                let reaped = connections.reap_dead(timeout);
                if reaped > 0 {
                    debug!(reaped = reaped, "Heartbeat reaped dead connections");
                }
            }
            _ = shutdown_rx.recv() => {
                info!("Heartbeat loop stopping");
                break;
            }
        }
    }
}
