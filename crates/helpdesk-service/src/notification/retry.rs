//! Bounded in-memory retry queue for transiently failed deliveries.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use tokio::time::Instant;

use super::request::NotificationRequest;

/// A single-recipient delivery awaiting another attempt.
#[derive(Debug, Clone)]
pub struct RetryItem {
    /// The narrowed send request to replay.
    pub request: NotificationRequest,
    /// Failed sweep attempts so far. The initial enqueue counts as zero.
    pub attempts: u32,
    /// When the item first entered the queue.
    pub enqueued_at: Instant,
}

impl RetryItem {
    /// Wraps a request for its first retry.
    pub fn new(request: NotificationRequest) -> Self {
        Self {
            request,
            attempts: 0,
            enqueued_at: Instant::now(),
        }
    }
}

/// FIFO queue drained in batches by the background sweep.
///
/// Queue state lives only in memory; a restart loses pending retries.
#[derive(Debug, Default)]
pub struct RetryQueue {
    items: Mutex<VecDeque<RetryItem>>,
}

impl RetryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an item to the back of the queue.
    pub fn enqueue(&self, item: RetryItem) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(item);
    }

    /// Pops up to `max` items from the front, oldest first.
    pub fn take_batch(&self, max: usize) -> Vec<RetryItem> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        let take = max.min(items.len());
        items.drain(..take).collect()
    }

    /// Puts a still-retriable item back at the end of the queue.
    pub fn requeue(&self, item: RetryItem) {
        self.enqueue(item);
    }

    /// Current queue depth.
    pub fn len(&self) -> usize {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::request::Recipients;
    use helpdesk_entity::notification::{NotificationKind, NotificationMeta};
    use uuid::Uuid;

    fn item(title: &str) -> RetryItem {
        RetryItem::new(NotificationRequest {
            recipients: Recipients::One(Uuid::new_v4()),
            kind: NotificationKind::System,
            title: Some(title.to_string()),
            message: None,
            link: None,
            meta: NotificationMeta::default(),
        })
    }

    #[tokio::test]
    async fn test_take_batch_pops_oldest_first_up_to_max() {
        let queue = RetryQueue::new();
        for title in ["a", "b", "c"] {
            queue.enqueue(item(title));
        }

        let batch = queue.take_batch(2);
        let titles: Vec<_> = batch
            .iter()
            .filter_map(|i| i.request.title.as_deref())
            .collect();
        assert_eq!(titles, ["a", "b"]);
        assert_eq!(queue.len(), 1);

        // Requeued items go to the back.
        queue.requeue(batch.into_iter().next().unwrap());
        let rest = queue.take_batch(10);
        let titles: Vec<_> = rest
            .iter()
            .filter_map(|i| i.request.title.as_deref())
            .collect();
        assert_eq!(titles, ["c", "a"]);
    }
}
