//! Message repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use helpdesk_core::result::AppResult;
use helpdesk_entity::message::{Message, NewMessage};

use super::db_error;
use crate::stores::MessageStore;

/// sqlx-backed [`MessageStore`].
#[derive(Debug, Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    /// Create a new message repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for MessageRepository {
    async fn create(&self, message: &NewMessage) -> AppResult<Message> {
        sqlx::query_as::<_, Message>(
            "INSERT INTO messages \
             (ticket_id, sender_id, content, attachments, is_admin_reply, parent_message_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(message.ticket_id)
        .bind(message.sender_id)
        .bind(&message.content)
        .bind(sqlx::types::Json(&message.attachments))
        .bind(message.is_admin_reply)
        .bind(message.parent_message_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to create message", e))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Message>> {
        sqlx::query_as::<_, Message>("SELECT * FROM messages WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find message by id", e))
    }

    async fn find_by_ticket(&self, ticket_id: Uuid) -> AppResult<Vec<Message>> {
        sqlx::query_as::<_, Message>(
            "SELECT * FROM messages WHERE ticket_id = $1 ORDER BY created_at ASC",
        )
        .bind(ticket_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list messages for ticket", e))
    }

    async fn find_replies(&self, parent_id: Uuid) -> AppResult<Vec<Message>> {
        sqlx::query_as::<_, Message>(
            "SELECT * FROM messages WHERE parent_message_id = $1 ORDER BY created_at ASC",
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list replies", e))
    }
}
