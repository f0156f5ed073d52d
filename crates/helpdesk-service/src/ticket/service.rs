//! Ticket operations: creation, threaded replies, status, priority,
//! assignment, and participants.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use helpdesk_core::error::AppError;
use helpdesk_core::result::AppResult;
use helpdesk_core::traits::ChannelTransport;
use helpdesk_core::types::channel::{ticket_channel, ADMIN_BROADCAST_CHANNEL};
use helpdesk_core::types::{Page, PageRequest};
use helpdesk_database::stores::{MessageStore, TicketStore};
use helpdesk_entity::message::{Attachment, Message, NewMessage};
use helpdesk_entity::ticket::{NewTicket, Ticket, TicketPriority, TicketStatus};

use crate::context::RequestContext;
use crate::directory::UserDirectory;
use crate::notification::NotificationService;

/// A top-level message with its direct replies, oldest first.
///
/// Replies are reachable only through their parent here; a reply to a
/// reply never surfaces as its own thread entry.
#[derive(Debug, Clone, Serialize)]
pub struct ThreadedMessage {
    #[serde(flatten)]
    pub message: Message,
    pub replies: Vec<Message>,
}

/// Orchestrates ticket persistence, live events, and notification
/// fan-out.
///
/// Notification dispatch is fire-and-forget: it runs on a detached task
/// after the business action has persisted, so a notification problem
/// can never fail the action that triggered it.
pub struct TicketService {
    tickets: Arc<dyn TicketStore>,
    messages: Arc<dyn MessageStore>,
    notifier: Arc<NotificationService>,
    directory: Arc<UserDirectory>,
    transport: Arc<dyn ChannelTransport>,
}

impl TicketService {
    /// Creates a new ticket service.
    pub fn new(
        tickets: Arc<dyn TicketStore>,
        messages: Arc<dyn MessageStore>,
        notifier: Arc<NotificationService>,
        directory: Arc<UserDirectory>,
        transport: Arc<dyn ChannelTransport>,
    ) -> Self {
        Self {
            tickets,
            messages,
            notifier,
            directory,
            transport,
        }
    }

    /// Creates a ticket with its opening message and tells the support
    /// team.
    pub async fn create_ticket(
        &self,
        ctx: &RequestContext,
        subject: String,
        content: String,
        priority: TicketPriority,
    ) -> AppResult<Ticket> {
        if subject.trim().is_empty() {
            return Err(AppError::validation("Subject must not be empty"));
        }
        if content.trim().is_empty() {
            return Err(AppError::validation("An opening message is required"));
        }

        let ticket = self
            .tickets
            .create(&NewTicket {
                subject,
                priority,
                created_by: ctx.user_id,
            })
            .await?;
        let message = self
            .messages
            .create(&NewMessage {
                ticket_id: ticket.id,
                sender_id: ctx.user_id,
                content: Some(content),
                attachments: Vec::new(),
                is_admin_reply: ctx.is_admin(),
                parent_message_id: None,
            })
            .await?;
        let ticket = self
            .tickets
            .append_message(ticket.id, message.id)
            .await?
            .ok_or_else(|| AppError::internal("Ticket vanished while appending its first message"))?;

        info!(ticket_id = %ticket.id, user_id = %ctx.user_id, "Created ticket");
        self.emit_event(ADMIN_BROADCAST_CHANNEL, "ticket_created", &ticket);

        let notifier = self.notifier.clone();
        let created = ticket.clone();
        tokio::spawn(async move {
            notifier.notify_new_ticket(&created).await;
        });

        Ok(ticket)
    }

    /// Adds a message to a ticket, threaded under a parent when one is
    /// given.
    pub async fn add_reply(
        &self,
        ctx: &RequestContext,
        ticket_id: Uuid,
        content: Option<String>,
        attachments: Vec<Attachment>,
        parent_message_id: Option<Uuid>,
    ) -> AppResult<Message> {
        let ticket = self
            .tickets
            .find_by_id(ticket_id)
            .await?
            .ok_or_else(|| AppError::not_found("Ticket not found"))?;
        if !ticket.can_view(ctx.user_id, ctx.is_admin()) {
            return Err(AppError::authorization("No access to this ticket"));
        }

        let new_message = NewMessage {
            ticket_id,
            sender_id: ctx.user_id,
            content,
            attachments,
            is_admin_reply: ctx.is_admin(),
            parent_message_id,
        };
        if !new_message.has_body() {
            return Err(AppError::validation("A reply needs text or an attachment"));
        }

        if let Some(parent_id) = parent_message_id {
            let parent = self
                .messages
                .find_by_id(parent_id)
                .await?
                .ok_or_else(|| AppError::not_found("Parent message not found"))?;
            if parent.ticket_id != ticket_id {
                return Err(AppError::validation(
                    "Parent message belongs to a different ticket",
                ));
            }
        }

        let message = self.messages.create(&new_message).await?;

        // Replies stay out of the top-level list; they are reachable
        // only through their parent.
        if message.parent_message_id.is_none()
            && self
                .tickets
                .append_message(ticket_id, message.id)
                .await?
                .is_none()
        {
            warn!(ticket_id = %ticket_id, "Ticket disappeared while appending message");
        }

        self.emit_event(&ticket_channel(ticket_id), "message_added", &message);

        let notifier = self.notifier.clone();
        let posted = message.clone();
        tokio::spawn(async move {
            notifier.notify_ticket_reply(&ticket, &posted).await;
        });

        Ok(message)
    }

    /// Returns the ticket's top-level messages in their stored order,
    /// each with its replies.
    pub async fn thread(
        &self,
        ctx: &RequestContext,
        ticket_id: Uuid,
    ) -> AppResult<Vec<ThreadedMessage>> {
        let ticket = self
            .tickets
            .find_by_id(ticket_id)
            .await?
            .ok_or_else(|| AppError::not_found("Ticket not found"))?;
        if !ticket.can_view(ctx.user_id, ctx.is_admin()) {
            return Err(AppError::authorization("No access to this ticket"));
        }

        let mut top_level: HashMap<Uuid, Message> = HashMap::new();
        let mut replies_by_parent: HashMap<Uuid, Vec<Message>> = HashMap::new();
        for message in self.messages.find_by_ticket(ticket_id).await? {
            match message.parent_message_id {
                Some(parent_id) => replies_by_parent
                    .entry(parent_id)
                    .or_default()
                    .push(message),
                None => {
                    top_level.insert(message.id, message);
                }
            }
        }

        let mut thread = Vec::with_capacity(ticket.message_ids.len());
        for message_id in &ticket.message_ids {
            if let Some(message) = top_level.remove(message_id) {
                let replies = replies_by_parent.remove(message_id).unwrap_or_default();
                thread.push(ThreadedMessage { message, replies });
            }
        }
        Ok(thread)
    }

    /// Moves a ticket between the settable statuses.
    ///
    /// Admins may update any ticket; a non-admin only one they created.
    pub async fn update_status(
        &self,
        ctx: &RequestContext,
        ticket_id: Uuid,
        status: TicketStatus,
    ) -> AppResult<Ticket> {
        if !status.is_settable() {
            return Err(AppError::validation("Tickets cannot be moved to 'closed'"));
        }

        let ticket = self
            .tickets
            .find_by_id(ticket_id)
            .await?
            .ok_or_else(|| AppError::not_found("Ticket not found"))?;
        if !ctx.is_admin() && ticket.created_by != ctx.user_id {
            return Err(AppError::authorization(
                "Only admins may update another user's ticket",
            ));
        }

        let updated = self
            .tickets
            .update_status(ticket_id, status)
            .await?
            .ok_or_else(|| AppError::not_found("Ticket not found"))?;

        info!(ticket_id = %ticket_id, status = %status, user_id = %ctx.user_id, "Updated ticket status");
        self.emit_event(
            &ticket_channel(ticket_id),
            "status_changed",
            &json!({ "ticket_id": updated.id, "status": updated.status }),
        );

        let notifier = self.notifier.clone();
        let changed = updated.clone();
        let actor_id = ctx.user_id;
        tokio::spawn(async move {
            notifier.notify_status_change(&changed, actor_id).await;
        });

        Ok(updated)
    }

    /// Changes a ticket's priority. Admin only.
    pub async fn update_priority(
        &self,
        ctx: &RequestContext,
        ticket_id: Uuid,
        priority: TicketPriority,
    ) -> AppResult<Ticket> {
        if !ctx.is_admin() {
            return Err(AppError::authorization("Only admins may change priority"));
        }

        let updated = self
            .tickets
            .update_priority(ticket_id, priority)
            .await?
            .ok_or_else(|| AppError::not_found("Ticket not found"))?;

        info!(ticket_id = %ticket_id, priority = %priority, user_id = %ctx.user_id, "Updated ticket priority");
        self.emit_event(
            &ticket_channel(ticket_id),
            "priority_changed",
            &json!({ "ticket_id": updated.id, "priority": updated.priority }),
        );

        let notifier = self.notifier.clone();
        let changed = updated.clone();
        let actor_id = ctx.user_id;
        tokio::spawn(async move {
            notifier.notify_priority_change(&changed, actor_id).await;
        });

        Ok(updated)
    }

    /// Assigns a ticket to an admin. Admin only.
    pub async fn assign(
        &self,
        ctx: &RequestContext,
        ticket_id: Uuid,
        assignee_id: Uuid,
    ) -> AppResult<Ticket> {
        if !ctx.is_admin() {
            return Err(AppError::authorization("Only admins may assign tickets"));
        }

        let assignee = self
            .directory
            .resolve(assignee_id)
            .await
            .ok_or_else(|| AppError::not_found("Assignee not found"))?;
        if !assignee.is_admin {
            return Err(AppError::validation(
                "Tickets can only be assigned to admins",
            ));
        }

        let updated = self
            .tickets
            .assign(ticket_id, Some(assignee_id))
            .await?
            .ok_or_else(|| AppError::not_found("Ticket not found"))?;

        info!(ticket_id = %ticket_id, assignee_id = %assignee_id, user_id = %ctx.user_id, "Assigned ticket");
        self.emit_event(
            &ticket_channel(ticket_id),
            "assigned",
            &json!({ "ticket_id": updated.id, "assigned_to": assignee_id }),
        );

        let notifier = self.notifier.clone();
        let changed = updated.clone();
        let actor_id = ctx.user_id;
        tokio::spawn(async move {
            notifier
                .notify_assignment(&changed, assignee_id, actor_id)
                .await;
        });

        Ok(updated)
    }

    /// Adds a participant to a ticket. Admin or the ticket's creator.
    pub async fn add_participant(
        &self,
        ctx: &RequestContext,
        ticket_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Ticket> {
        let ticket = self
            .tickets
            .find_by_id(ticket_id)
            .await?
            .ok_or_else(|| AppError::not_found("Ticket not found"))?;
        if !ctx.is_admin() && ticket.created_by != ctx.user_id {
            return Err(AppError::authorization(
                "Only admins or the creator may add participants",
            ));
        }
        if ticket.is_participant(user_id) {
            return Err(AppError::conflict("User is already a participant"));
        }
        if self.directory.resolve(user_id).await.is_none() {
            return Err(AppError::not_found("User not found"));
        }

        // The store re-checks membership, so a concurrent add surfaces
        // here as None.
        let updated = self
            .tickets
            .add_participant(ticket_id, user_id)
            .await?
            .ok_or_else(|| AppError::conflict("User is already a participant"))?;

        info!(ticket_id = %ticket_id, participant_id = %user_id, user_id = %ctx.user_id, "Added ticket participant");
        self.emit_event(
            &ticket_channel(ticket_id),
            "participant_added",
            &json!({ "ticket_id": updated.id, "user_id": user_id }),
        );

        let notifier = self.notifier.clone();
        let changed = updated.clone();
        let actor_id = ctx.user_id;
        tokio::spawn(async move {
            notifier
                .notify_participant_added(&changed, user_id, actor_id)
                .await;
        });

        Ok(updated)
    }

    /// Fetches one ticket, access-checked.
    pub async fn get_ticket(&self, ctx: &RequestContext, ticket_id: Uuid) -> AppResult<Ticket> {
        let ticket = self
            .tickets
            .find_by_id(ticket_id)
            .await?
            .ok_or_else(|| AppError::not_found("Ticket not found"))?;
        if !ticket.can_view(ctx.user_id, ctx.is_admin()) {
            return Err(AppError::authorization("No access to this ticket"));
        }
        Ok(ticket)
    }

    /// Lists tickets: everything for admins, the user's own otherwise.
    pub async fn list_tickets(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<Page<Ticket>> {
        if ctx.is_admin() {
            self.tickets.list_all(page).await
        } else {
            self.tickets.list_for_user(ctx.user_id, page).await
        }
    }

    /// Serializes and emits a live event, logging serialization problems
    /// instead of surfacing them.
    fn emit_event<T: Serialize>(&self, channel: &str, event: &str, payload: &T) {
        match serde_json::to_value(payload) {
            Ok(value) => {
                self.transport.emit(channel, event, &value);
            }
            Err(error) => {
                warn!(%error, channel, event, "Failed to serialize live event payload");
            }
        }
    }
}

impl std::fmt::Debug for TicketService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketService").finish_non_exhaustive()
    }
}
