//! Message store contract.

use async_trait::async_trait;
use uuid::Uuid;

use helpdesk_core::result::AppResult;
use helpdesk_entity::message::{Message, NewMessage};

/// Message persistence for ticket threads.
#[async_trait]
pub trait MessageStore: Send + Sync + 'static {
    /// Create a message.
    async fn create(&self, message: &NewMessage) -> AppResult<Message>;

    /// Find a message by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Message>>;

    /// All messages of a ticket, oldest first, replies included.
    async fn find_by_ticket(&self, ticket_id: Uuid) -> AppResult<Vec<Message>>;

    /// Direct replies to a parent message, oldest first.
    async fn find_replies(&self, parent_id: Uuid) -> AppResult<Vec<Message>>;
}
