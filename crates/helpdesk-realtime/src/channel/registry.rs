//! Channel registry managing all channels and subscriptions.

use std::collections::HashSet;

use dashmap::DashMap;

use helpdesk_core::types::ConnectionId;

/// Registry of all active pub/sub channels.
///
/// Channels exist only while they have subscribers; dropping the last
/// subscriber removes the entry, so `has_subscribers` doubles as an
/// existence check. A reverse index per connection makes disconnect
/// cleanup a single lookup.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    /// Channel name → subscribed connection ids.
    channels: DashMap<String, HashSet<ConnectionId>>,
    /// Connection id → joined channel names.
    memberships: DashMap<ConnectionId, HashSet<String>>,
}

impl ChannelRegistry {
    /// Creates a new channel registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins a connection to a channel.
    pub fn join(&self, channel_name: String, conn_id: ConnectionId) {
        self.memberships
            .entry(conn_id)
            .or_default()
            .insert(channel_name.clone());
        self.channels.entry(channel_name).or_default().insert(conn_id);
    }

    /// Removes a connection from a channel.
    pub fn leave(&self, channel_name: &str, conn_id: ConnectionId) {
        if let Some(mut subscribers) = self.channels.get_mut(channel_name) {
            subscribers.remove(&conn_id);
        }
        self.channels.remove_if(channel_name, |_, s| s.is_empty());

        if let Some(mut joined) = self.memberships.get_mut(&conn_id) {
            joined.remove(channel_name);
        }
    }

    /// Removes a connection from every channel it joined.
    pub fn leave_all(&self, conn_id: ConnectionId) {
        let Some((_, joined)) = self.memberships.remove(&conn_id) else {
            return;
        };
        for channel_name in &joined {
            if let Some(mut subscribers) = self.channels.get_mut(channel_name) {
                subscribers.remove(&conn_id);
            }
            self.channels.remove_if(channel_name, |_, s| s.is_empty());
        }
    }

    /// Whether a channel currently has at least one subscriber.
    pub fn has_subscribers(&self, channel_name: &str) -> bool {
        self.channels.contains_key(channel_name)
    }

    /// Returns all subscriber connection ids for a channel.
    pub fn subscribers(&self, channel_name: &str) -> Vec<ConnectionId> {
        self.channels
            .get(channel_name)
            .map(|subscribers| subscribers.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Returns subscriber count for a channel.
    pub fn subscriber_count(&self, channel_name: &str) -> usize {
        self.channels
            .get(channel_name)
            .map(|subscribers| subscribers.len())
            .unwrap_or(0)
    }

    /// Returns the subscription count for a connection.
    pub fn subscription_count(&self, conn_id: ConnectionId) -> usize {
        self.memberships
            .get(&conn_id)
            .map(|joined| joined.len())
            .unwrap_or(0)
    }

    /// Returns total number of active channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}
