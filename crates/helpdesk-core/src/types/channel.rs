//! Channel naming for the realtime layer.
//!
//! Three channel families exist: a per-user channel that carries that
//! user's notifications, the admin broadcast channel carrying the live
//! ticket feed, and per-ticket channels carrying thread events.

use std::fmt;

use uuid::Uuid;

/// Name of the admin broadcast channel.
pub const ADMIN_BROADCAST_CHANNEL: &str = "admin-broadcast";

/// Parsed form of a channel name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// `user:<id>`: a single user's notification channel.
    User(Uuid),
    /// `ticket:<id>`: live events for one ticket thread.
    Ticket(Uuid),
    /// `admin-broadcast`: the live feed for admin dashboards.
    AdminBroadcast,
}

impl ChannelKind {
    /// Parse a channel name. Returns `None` for unknown shapes.
    pub fn parse(name: &str) -> Option<Self> {
        if name == ADMIN_BROADCAST_CHANNEL {
            return Some(Self::AdminBroadcast);
        }
        let mut parts = name.splitn(2, ':');
        match (parts.next(), parts.next()) {
            (Some("user"), Some(id)) => Uuid::parse_str(id).ok().map(Self::User),
            (Some("ticket"), Some(id)) => Uuid::parse_str(id).ok().map(Self::Ticket),
            _ => None,
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(id) => write!(f, "user:{id}"),
            Self::Ticket(id) => write!(f, "ticket:{id}"),
            Self::AdminBroadcast => write!(f, "{ADMIN_BROADCAST_CHANNEL}"),
        }
    }
}

/// Channel name for a user's notification channel.
pub fn user_channel(user_id: Uuid) -> String {
    format!("user:{user_id}")
}

/// Channel name for a ticket's live thread events.
pub fn ticket_channel(ticket_id: Uuid) -> String {
    format!("ticket:{ticket_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let id = Uuid::new_v4();
        assert_eq!(
            ChannelKind::parse(&user_channel(id)),
            Some(ChannelKind::User(id))
        );
        assert_eq!(
            ChannelKind::parse(&ticket_channel(id)),
            Some(ChannelKind::Ticket(id))
        );
        assert_eq!(
            ChannelKind::parse("admin-broadcast"),
            Some(ChannelKind::AdminBroadcast)
        );
    }

    #[test]
    fn test_rejects_unknown_shapes() {
        assert_eq!(ChannelKind::parse("user:"), None);
        assert_eq!(ChannelKind::parse("user:not-a-uuid"), None);
        assert_eq!(ChannelKind::parse("presence:global"), None);
        assert_eq!(ChannelKind::parse(""), None);
    }
}
