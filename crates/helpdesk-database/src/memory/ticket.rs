//! In-memory ticket store.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use helpdesk_core::result::AppResult;
use helpdesk_core::types::{Page, PageRequest};
use helpdesk_entity::ticket::{NewTicket, Ticket, TicketPriority, TicketStatus};

use super::paginate;
use crate::stores::TicketStore;

/// [`TicketStore`] backed by a vector.
#[derive(Debug, Default)]
pub struct MemoryTicketStore {
    rows: RwLock<Vec<Ticket>>,
}

impl MemoryTicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn update<F>(&self, id: Uuid, apply: F) -> Option<Ticket>
    where
        F: FnOnce(&mut Ticket),
    {
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        rows.iter_mut().find(|t| t.id == id).map(|ticket| {
            apply(ticket);
            ticket.updated_at = Utc::now();
            ticket.clone()
        })
    }
}

#[async_trait]
impl TicketStore for MemoryTicketStore {
    async fn create(&self, ticket: &NewTicket) -> AppResult<Ticket> {
        let now = Utc::now();
        let row = Ticket {
            id: Uuid::new_v4(),
            subject: ticket.subject.clone(),
            status: TicketStatus::Open,
            priority: ticket.priority,
            created_by: ticket.created_by,
            assigned_to: None,
            participants: Vec::new(),
            message_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.rows
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Ticket>> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        Ok(rows.iter().find(|t| t.id == id).cloned())
    }

    async fn list_all(&self, page: &PageRequest) -> AppResult<Page<Ticket>> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        let tickets: Vec<Ticket> = rows.iter().rev().cloned().collect();
        Ok(paginate(tickets, page))
    }

    async fn list_for_user(&self, user_id: Uuid, page: &PageRequest) -> AppResult<Page<Ticket>> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        let tickets: Vec<Ticket> = rows
            .iter()
            .rev()
            .filter(|t| {
                t.created_by == user_id
                    || t.assigned_to == Some(user_id)
                    || t.participants.contains(&user_id)
            })
            .cloned()
            .collect();
        Ok(paginate(tickets, page))
    }

    async fn update_status(&self, id: Uuid, status: TicketStatus) -> AppResult<Option<Ticket>> {
        Ok(self.update(id, |t| t.status = status))
    }

    async fn update_priority(
        &self,
        id: Uuid,
        priority: TicketPriority,
    ) -> AppResult<Option<Ticket>> {
        Ok(self.update(id, |t| t.priority = priority))
    }

    async fn assign(&self, id: Uuid, assignee: Option<Uuid>) -> AppResult<Option<Ticket>> {
        Ok(self.update(id, |t| t.assigned_to = assignee))
    }

    async fn add_participant(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Ticket>> {
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        let Some(ticket) = rows.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        if ticket.participants.contains(&user_id) {
            return Ok(None);
        }
        ticket.participants.push(user_id);
        ticket.updated_at = Utc::now();
        Ok(Some(ticket.clone()))
    }

    async fn append_message(&self, id: Uuid, message_id: Uuid) -> AppResult<Option<Ticket>> {
        Ok(self.update(id, |t| t.message_ids.push(message_id)))
    }
}
