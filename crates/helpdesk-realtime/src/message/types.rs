//! Inbound and outbound WebSocket frame definitions.

use serde::{Deserialize, Serialize};

/// Frames sent by the client to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundFrame {
    /// Subscribe to a channel.
    Subscribe {
        /// Channel name.
        channel: String,
    },
    /// Unsubscribe from a channel.
    Unsubscribe {
        /// Channel name.
        channel: String,
    },
    /// Pong response to a server ping.
    Pong,
}

/// Frames sent by the server to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundFrame {
    /// Subscription confirmed.
    Subscribed {
        /// Channel name.
        channel: String,
    },
    /// Unsubscription confirmed.
    Unsubscribed {
        /// Channel name.
        channel: String,
    },
    /// A channel event. One frame is sent per event-name alias.
    Event {
        /// Channel the event was published on.
        channel: String,
        /// Event name.
        event: String,
        /// Event payload.
        payload: serde_json::Value,
    },
    /// Server keepalive ping; the client answers with `pong`.
    Ping,
    /// Error report.
    Error {
        /// Machine-readable error code.
        code: String,
        /// Human-readable description.
        message: String,
    },
}
