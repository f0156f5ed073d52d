//! In-memory message store.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use helpdesk_core::result::AppResult;
use helpdesk_entity::message::{Message, NewMessage};

use crate::stores::MessageStore;

/// [`MessageStore`] backed by a vector.
#[derive(Debug, Default)]
pub struct MemoryMessageStore {
    rows: RwLock<Vec<Message>>,
}

impl MemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn create(&self, message: &NewMessage) -> AppResult<Message> {
        let row = Message {
            id: Uuid::new_v4(),
            ticket_id: message.ticket_id,
            sender_id: message.sender_id,
            content: message.content.clone(),
            attachments: message.attachments.clone(),
            is_admin_reply: message.is_admin_reply,
            parent_message_id: message.parent_message_id,
            created_at: Utc::now(),
        };
        self.rows
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Message>> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        Ok(rows.iter().find(|m| m.id == id).cloned())
    }

    async fn find_by_ticket(&self, ticket_id: Uuid) -> AppResult<Vec<Message>> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        Ok(rows
            .iter()
            .filter(|m| m.ticket_id == ticket_id)
            .cloned()
            .collect())
    }

    async fn find_replies(&self, parent_id: Uuid) -> AppResult<Vec<Message>> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        Ok(rows
            .iter()
            .filter(|m| m.parent_message_id == Some(parent_id))
            .cloned()
            .collect())
    }
}
