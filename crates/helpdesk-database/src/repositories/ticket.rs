//! Ticket repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use helpdesk_core::result::AppResult;
use helpdesk_core::types::{Page, PageRequest};
use helpdesk_entity::ticket::{NewTicket, Ticket, TicketPriority, TicketStatus};

use super::db_error;
use crate::stores::TicketStore;

/// sqlx-backed [`TicketStore`].
#[derive(Debug, Clone)]
pub struct TicketRepository {
    pool: PgPool,
}

impl TicketRepository {
    /// Create a new ticket repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketStore for TicketRepository {
    async fn create(&self, ticket: &NewTicket) -> AppResult<Ticket> {
        sqlx::query_as::<_, Ticket>(
            "INSERT INTO tickets (subject, priority, created_by) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&ticket.subject)
        .bind(ticket.priority)
        .bind(ticket.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to create ticket", e))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Ticket>> {
        sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find ticket by id", e))
    }

    async fn list_all(&self, page: &PageRequest) -> AppResult<Page<Ticket>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tickets")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count tickets", e))?;

        let tickets = sqlx::query_as::<_, Ticket>(
            "SELECT * FROM tickets ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list tickets", e))?;

        Ok(Page::new(tickets, page, total as u64))
    }

    async fn list_for_user(&self, user_id: Uuid, page: &PageRequest) -> AppResult<Page<Ticket>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tickets \
             WHERE created_by = $1 OR assigned_to = $1 OR $1 = ANY(participants)",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to count tickets for user", e))?;

        let tickets = sqlx::query_as::<_, Ticket>(
            "SELECT * FROM tickets \
             WHERE created_by = $1 OR assigned_to = $1 OR $1 = ANY(participants) \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list tickets for user", e))?;

        Ok(Page::new(tickets, page, total as u64))
    }

    async fn update_status(&self, id: Uuid, status: TicketStatus) -> AppResult<Option<Ticket>> {
        sqlx::query_as::<_, Ticket>(
            "UPDATE tickets SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update ticket status", e))
    }

    async fn update_priority(
        &self,
        id: Uuid,
        priority: TicketPriority,
    ) -> AppResult<Option<Ticket>> {
        sqlx::query_as::<_, Ticket>(
            "UPDATE tickets SET priority = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(priority)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update ticket priority", e))
    }

    async fn assign(&self, id: Uuid, assignee: Option<Uuid>) -> AppResult<Option<Ticket>> {
        sqlx::query_as::<_, Ticket>(
            "UPDATE tickets SET assigned_to = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(assignee)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to assign ticket", e))
    }

    async fn add_participant(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Ticket>> {
        // The guard keeps a concurrent duplicate from ever landing in the
        // array; callers treat the resulting None as a conflict once the
        // ticket is known to exist.
        sqlx::query_as::<_, Ticket>(
            "UPDATE tickets SET participants = array_append(participants, $2), \
             updated_at = NOW() \
             WHERE id = $1 AND NOT ($2 = ANY(participants)) RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to add participant", e))
    }

    async fn append_message(&self, id: Uuid, message_id: Uuid) -> AppResult<Option<Ticket>> {
        sqlx::query_as::<_, Ticket>(
            "UPDATE tickets SET message_ids = array_append(message_ids, $2), \
             updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(message_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to append message to ticket", e))
    }
}
