//! Connection manager handling lifecycle, channel policy, and inbound frames.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use helpdesk_core::config::RealtimeConfig;
use helpdesk_core::types::{user_channel, ChannelKind, ConnectionId, ADMIN_BROADCAST_CHANNEL};

use crate::channel::ChannelRegistry;
use crate::message::{InboundFrame, OutboundFrame};

use super::handle::ConnectionHandle;
use super::pool::ConnectionPool;

/// Manages all active WebSocket connections.
#[derive(Debug)]
pub struct ConnectionManager {
    /// Connection pool.
    pool: ConnectionPool,
    /// Channel registry.
    channels: Arc<ChannelRegistry>,
    /// Configuration.
    config: RealtimeConfig,
}

impl ConnectionManager {
    /// Creates a new connection manager.
    pub fn new(config: RealtimeConfig, channels: Arc<ChannelRegistry>) -> Self {
        Self {
            pool: ConnectionPool::new(),
            channels,
            config,
        }
    }

    /// Registers a new connection for an already-authenticated user.
    ///
    /// The connection auto-joins the user's personal channel, and admin
    /// connections additionally join the admin broadcast channel. When the
    /// user is at the connection cap the oldest connection is evicted.
    /// Returns the handle and the receiver half of the outbound buffer.
    pub fn register(
        &self,
        user_id: Uuid,
        is_admin: bool,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<OutboundFrame>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size);
        let handle = Arc::new(ConnectionHandle::new(user_id, is_admin, tx));

        let existing = self.pool.user_connections(user_id);
        if existing.len() >= self.config.max_connections_per_user {
            if let Some(oldest) = existing.first() {
                warn!(
                    user_id = %user_id,
                    evicted = %oldest.id,
                    max = self.config.max_connections_per_user,
                    "User at connection cap, evicting oldest connection"
                );
                self.unregister(oldest.id);
            }
        }

        self.pool.add(handle.clone());
        self.channels.join(user_channel(user_id), handle.id);
        if is_admin {
            self.channels
                .join(ADMIN_BROADCAST_CHANNEL.to_string(), handle.id);
        }

        info!(
            conn_id = %handle.id,
            user_id = %user_id,
            is_admin = is_admin,
            "WebSocket connection registered"
        );

        (handle, rx)
    }

    /// Unregisters a connection and cleans up its subscriptions.
    pub fn unregister(&self, conn_id: ConnectionId) {
        if let Some(handle) = self.pool.remove(conn_id) {
            handle.mark_dead();
            self.channels.leave_all(conn_id);
            info!(
                conn_id = %conn_id,
                user_id = %handle.user_id,
                "WebSocket connection unregistered"
            );
        }
    }

    /// Processes a raw inbound frame from a client.
    pub fn handle_frame(&self, conn_id: ConnectionId, raw: &str) {
        let Some(handle) = self.pool.get(conn_id) else {
            warn!(conn_id = %conn_id, "Frame from unknown connection");
            return;
        };

        let frame: InboundFrame = match serde_json::from_str(raw) {
            Ok(frame) => frame,
            Err(e) => {
                handle.try_send(OutboundFrame::Error {
                    code: "INVALID_FRAME".to_string(),
                    message: format!("Failed to parse frame: {e}"),
                });
                return;
            }
        };

        match frame {
            InboundFrame::Subscribe { channel } => self.handle_subscribe(&handle, &channel),
            InboundFrame::Unsubscribe { channel } => {
                self.channels.leave(&channel, handle.id);
                handle.try_send(OutboundFrame::Unsubscribed { channel });
            }
            InboundFrame::Pong => handle.record_pong(),
        }
    }

    /// Handles a subscribe request with policy and limit checks.
    fn handle_subscribe(&self, handle: &ConnectionHandle, channel: &str) {
        if self.channels.subscription_count(handle.id) >= self.config.max_subscriptions_per_connection
        {
            handle.try_send(OutboundFrame::Error {
                code: "MAX_SUBSCRIPTIONS".to_string(),
                message: format!(
                    "Maximum subscriptions ({}) reached",
                    self.config.max_subscriptions_per_connection
                ),
            });
            return;
        }

        if !can_join(handle, channel) {
            handle.try_send(OutboundFrame::Error {
                code: "FORBIDDEN".to_string(),
                message: format!("Not authorized to join channel: {channel}"),
            });
            return;
        }

        self.channels.join(channel.to_string(), handle.id);
        handle.try_send(OutboundFrame::Subscribed {
            channel: channel.to_string(),
        });
        debug!(conn_id = %handle.id, channel = %channel, "Joined channel");
    }

    /// Sends a ping to every live connection.
    pub fn ping_all(&self) {
        for handle in self.pool.all_connections() {
            if handle.is_alive() {
                handle.try_send(OutboundFrame::Ping);
            }
        }
    }

    /// Unregisters connections that died or missed their pong deadline.
    ///
    /// Returns the number of connections reaped.
    pub fn reap_dead(&self, timeout: std::time::Duration) -> usize {
        let now = chrono::Utc::now();
        let mut reaped = 0;
        for handle in self.pool.all_connections() {
            let silent = (now - handle.last_pong())
                .to_std()
                .map(|elapsed| elapsed > timeout)
                .unwrap_or(false);
            if !handle.is_alive() || silent {
                if silent {
                    warn!(conn_id = %handle.id, "Heartbeat timeout, reaping connection");
                    handle.mark_dead();
                }
                self.unregister(handle.id);
                reaped += 1;
            }
        }
        reaped
    }

    /// Closes all connections.
    pub fn close_all(&self) {
        let all = self.pool.all_connections();
        for handle in &all {
            handle.mark_dead();
            self.pool.remove(handle.id);
            self.channels.leave_all(handle.id);
        }
        info!(count = all.len(), "All connections closed");
    }

    /// Gets a connection by id.
    pub fn get(&self, conn_id: ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.pool.get(conn_id)
    }

    /// Returns the total connection count.
    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }

    /// Returns the number of distinct connected users.
    pub fn user_count(&self) -> usize {
        self.pool.user_count()
    }
}

/// Channel join policy.
///
/// Ticket channels are open to every authenticated staff member; whether
/// the ticket itself is visible is enforced when its data is fetched.
fn can_join(handle: &ConnectionHandle, channel: &str) -> bool {
    match ChannelKind::parse(channel) {
        Some(ChannelKind::User(id)) => id == handle.user_id,
        Some(ChannelKind::AdminBroadcast) => handle.is_admin,
        Some(ChannelKind::Ticket(_)) => true,
        None => false,
    }
}
