//! Ticket store contract.

use async_trait::async_trait;
use uuid::Uuid;

use helpdesk_core::result::AppResult;
use helpdesk_core::types::{Page, PageRequest};
use helpdesk_entity::ticket::{NewTicket, Ticket, TicketPriority, TicketStatus};

/// Ticket persistence, including the ordered top-level message-id list.
#[async_trait]
pub trait TicketStore: Send + Sync + 'static {
    /// Create a ticket in `open` status with no participants or messages.
    async fn create(&self, ticket: &NewTicket) -> AppResult<Ticket>;

    /// Find a ticket by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Ticket>>;

    /// List every ticket, newest first.
    async fn list_all(&self, page: &PageRequest) -> AppResult<Page<Ticket>>;

    /// List tickets the user created, is assigned to, or participates in.
    async fn list_for_user(&self, user_id: Uuid, page: &PageRequest) -> AppResult<Page<Ticket>>;

    /// Set the ticket status, returning the updated row.
    async fn update_status(&self, id: Uuid, status: TicketStatus) -> AppResult<Option<Ticket>>;

    /// Set the ticket priority, returning the updated row.
    async fn update_priority(
        &self,
        id: Uuid,
        priority: TicketPriority,
    ) -> AppResult<Option<Ticket>>;

    /// Set or clear the assignee, returning the updated row.
    async fn assign(&self, id: Uuid, assignee: Option<Uuid>) -> AppResult<Option<Ticket>>;

    /// Add a participant if not already present, returning the updated row.
    async fn add_participant(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Ticket>>;

    /// Append a message id to the ticket's ordered top-level list.
    ///
    /// Only top-level messages go through here; replies are reachable
    /// solely through their parent and are never appended.
    async fn append_message(&self, id: Uuid, message_id: Uuid) -> AppResult<Option<Ticket>>;
}
