//! # helpdesk-realtime
//!
//! Room-based WebSocket fan-out: the channel registry, per-connection
//! handles with bounded outbound buffers, the connection manager with
//! auto-join and per-user caps, and the [`RealtimeHub`] that implements
//! the transport contract consumed by the notification service.

pub mod channel;
pub mod connection;
pub mod hub;
pub mod message;

pub use hub::{HubStats, RealtimeHub};
