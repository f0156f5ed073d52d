//! Core type definitions used across the helpdesk workspace.

pub mod channel;
pub mod id;
pub mod pagination;

pub use channel::{ADMIN_BROADCAST_CHANNEL, ChannelKind, ticket_channel, user_channel};
pub use id::ConnectionId;
pub use pagination::{Page, PageRequest};
