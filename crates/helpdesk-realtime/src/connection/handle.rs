//! Individual WebSocket connection handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use uuid::Uuid;

use helpdesk_core::types::ConnectionId;

use crate::message::OutboundFrame;

/// A handle to a single WebSocket connection.
///
/// Holds the sender half of the connection's bounded outbound buffer plus
/// identity metadata. The socket task owns the receiver half and writes
/// frames to the wire.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection id.
    pub id: ConnectionId,
    /// User who owns this connection.
    pub user_id: Uuid,
    /// Whether the user holds the admin role.
    pub is_admin: bool,
    /// Sender half of the outbound frame buffer.
    sender: mpsc::Sender<OutboundFrame>,
    /// When the connection was established.
    pub connected_at: DateTime<Utc>,
    /// Last pong received.
    last_pong: RwLock<DateTime<Utc>>,
    /// Whether the connection is still alive.
    alive: AtomicBool,
}

impl ConnectionHandle {
    /// Create a new connection handle.
    pub fn new(user_id: Uuid, is_admin: bool, sender: mpsc::Sender<OutboundFrame>) -> Self {
        Self {
            id: ConnectionId::new(),
            user_id,
            is_admin,
            sender,
            connected_at: Utc::now(),
            last_pong: RwLock::new(Utc::now()),
            alive: AtomicBool::new(true),
        }
    }

    /// Hand a frame to this connection's outbound buffer without blocking.
    ///
    /// A full buffer drops the frame (slow consumers must not stall
    /// producers); a closed buffer marks the connection dead. Returns
    /// whether the frame was accepted.
    pub fn try_send(&self, frame: OutboundFrame) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(frame) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %self.id, "Outbound buffer full, dropping frame");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_dead();
                false
            }
        }
    }

    /// Check if the connection is alive.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark the connection as dead.
    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    /// Record a pong response.
    pub fn record_pong(&self) {
        let mut guard = self
            .last_pong
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Utc::now();
    }

    /// Timestamp of the last pong received.
    pub fn last_pong(&self) -> DateTime<Utc> {
        *self
            .last_pong
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_full_buffer_drops_frame() {
        let (tx, mut rx) = mpsc::channel(1);
        let handle = ConnectionHandle::new(Uuid::new_v4(), false, tx);

        assert!(handle.try_send(OutboundFrame::Ping));
        assert!(!handle.try_send(OutboundFrame::Ping));
        assert!(handle.is_alive());

        rx.recv().await.unwrap();
        assert!(handle.try_send(OutboundFrame::Ping));
    }

    #[tokio::test]
    async fn test_closed_buffer_marks_dead() {
        let (tx, rx) = mpsc::channel(1);
        let handle = ConnectionHandle::new(Uuid::new_v4(), false, tx);
        drop(rx);

        assert!(!handle.try_send(OutboundFrame::Ping));
        assert!(!handle.is_alive());
    }
}
