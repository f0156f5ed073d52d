//! Top-level realtime hub tying the registry and connections together.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info};

use helpdesk_core::config::RealtimeConfig;
use helpdesk_core::traits::ChannelTransport;

use crate::channel::ChannelRegistry;
use crate::connection::heartbeat::run_heartbeat;
use crate::connection::ConnectionManager;
use crate::message::OutboundFrame;

/// Central realtime hub.
///
/// Owns the channel registry and connection manager, runs the heartbeat,
/// and implements the [`ChannelTransport`] contract the notification
/// service emits through.
pub struct RealtimeHub {
    /// Connection manager.
    connections: Arc<ConnectionManager>,
    /// Channel registry.
    channels: Arc<ChannelRegistry>,
    /// Configuration.
    config: RealtimeConfig,
    /// Shutdown signal sender.
    shutdown_tx: broadcast::Sender<()>,
}

impl std::fmt::Debug for RealtimeHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeHub")
            .field("connections", &self.connections.connection_count())
            .field("channels", &self.channels.channel_count())
            .finish()
    }
}

/// Snapshot of hub counters for the health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubStats {
    /// Active WebSocket connections.
    pub connections: usize,
    /// Distinct connected users.
    pub users: usize,
    /// Channels with at least one subscriber.
    pub channels: usize,
}

impl RealtimeHub {
    /// Creates a new realtime hub.
    pub fn new(config: RealtimeConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        let channels = Arc::new(ChannelRegistry::new());
        let connections = Arc::new(ConnectionManager::new(config.clone(), channels.clone()));

        info!("Realtime hub initialized");

        Self {
            connections,
            channels,
            config,
            shutdown_tx,
        }
    }

    /// Spawns the heartbeat loop.
    pub fn start_heartbeat(&self) {
        tokio::spawn(run_heartbeat(
            self.connections.clone(),
            self.config.clone(),
            self.shutdown_tx.subscribe(),
        ));
    }

    /// Returns the connection manager.
    pub fn connections(&self) -> &Arc<ConnectionManager> {
        &self.connections
    }

    /// Returns the channel registry.
    pub fn channels(&self) -> &Arc<ChannelRegistry> {
        &self.channels
    }

    /// Returns counters for the health endpoint.
    pub fn stats(&self) -> HubStats {
        HubStats {
            connections: self.connections.connection_count(),
            users: self.connections.user_count(),
            channels: self.channels.channel_count(),
        }
    }

    /// Stops the heartbeat and closes every connection.
    pub fn shutdown(&self) {
        info!("Shutting down realtime hub");
        let _ = self.shutdown_tx.send(());
        self.connections.close_all();
    }
}

impl ChannelTransport for RealtimeHub {
    fn has_subscribers(&self, channel: &str) -> bool {
        self.channels.has_subscribers(channel)
    }

    fn emit(&self, channel: &str, event: &str, payload: &serde_json::Value) -> usize {
        let mut delivered = 0;
        for conn_id in self.channels.subscribers(channel) {
            if let Some(handle) = self.connections.get(conn_id) {
                let accepted = handle.try_send(OutboundFrame::Event {
                    channel: channel.to_string(),
                    event: event.to_string(),
                    payload: payload.clone(),
                });
                if accepted {
                    delivered += 1;
                }
            }
        }
        debug!(
            channel = %channel,
            event = %event,
            delivered = delivered,
            "Emitted channel event"
        );
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdesk_core::types::user_channel;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_emit_reaches_personal_channel() {
        let hub = RealtimeHub::new(RealtimeConfig::default());
        let user_id = Uuid::new_v4();
        let (_handle, mut rx) = hub.connections().register(user_id, false);

        let channel = user_channel(user_id);
        assert!(hub.has_subscribers(&channel));

        let delivered = hub.emit(&channel, "new_notification", &serde_json::json!({"id": 1}));
        assert_eq!(delivered, 1);

        let frame = rx.recv().await.unwrap();
        match frame {
            OutboundFrame::Event { event, payload, .. } => {
                assert_eq!(event, "new_notification");
                assert_eq!(payload["id"], 1);
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_emit_to_empty_channel_delivers_nothing() {
        let hub = RealtimeHub::new(RealtimeConfig::default());
        let channel = user_channel(Uuid::new_v4());

        assert!(!hub.has_subscribers(&channel));
        assert_eq!(hub.emit(&channel, "new_notification", &serde_json::json!({})), 0);
    }

    #[tokio::test]
    async fn test_emit_counts_each_connection() {
        let hub = RealtimeHub::new(RealtimeConfig::default());
        let user_id = Uuid::new_v4();
        let (_h1, mut rx1) = hub.connections().register(user_id, false);
        let (_h2, mut rx2) = hub.connections().register(user_id, false);

        let delivered = hub.emit(
            &user_channel(user_id),
            "notification",
            &serde_json::json!({"title": "hi"}),
        );
        assert_eq!(delivered, 2);
        assert!(rx1.recv().await.is_some());
        assert!(rx2.recv().await.is_some());
    }
}
