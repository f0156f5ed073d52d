//! The realtime transport contract consumed by the service layer.

use serde_json::Value;

/// Channel-based fan-out as seen by notification producers.
///
/// Implemented by the realtime hub; the service layer only ever checks
/// membership and emits. Emission is non-blocking: slow consumers drop
/// frames rather than stalling the producer, so `emit` reports how many
/// connections accepted the frame instead of returning an error.
pub trait ChannelTransport: Send + Sync {
    /// Whether the channel currently has at least one live subscriber.
    fn has_subscribers(&self, channel: &str) -> bool;

    /// Emit `payload` on `channel` under the given event name.
    ///
    /// Returns the number of connections the frame was handed to.
    fn emit(&self, channel: &str, event: &str, payload: &Value) -> usize;
}
