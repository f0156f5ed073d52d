//! Fan-out rules: who gets notified about which business event.
//!
//! Every helper here is called fire-and-forget by a business action. A
//! helper builds the recipient set and the request, then delegates to
//! [`NotificationService::send`] or
//! [`NotificationService::broadcast`]; it never returns an error.

use tracing::{debug, info, warn};
use uuid::Uuid;

use helpdesk_entity::announcement::Announcement;
use helpdesk_entity::message::Message;
use helpdesk_entity::notification::{NotificationKind, NotificationMeta};
use helpdesk_entity::ticket::Ticket;

use super::request::{NotificationRequest, Recipients};
use super::service::NotificationService;

impl NotificationService {
    /// A new ticket was filed: tell every active admin whose preferences
    /// allow ticket notifications.
    pub async fn notify_new_ticket(&self, ticket: &Ticket) {
        let recipients = self.active_admins_allowing(NotificationKind::Ticket).await;
        if recipients.is_empty() {
            debug!(ticket_id = %ticket.id, "No admins to notify about new ticket");
            return;
        }

        let creator = self.display_name(ticket.created_by).await;
        let delivered = self
            .broadcast(NotificationRequest {
                recipients: Recipients::Many(recipients),
                kind: NotificationKind::Ticket,
                title: Some("New support ticket".to_string()),
                message: Some(format!("{creator} opened '{}'", ticket.subject)),
                link: Some(format!("/tickets/{}", ticket.id)),
                meta: NotificationMeta {
                    sender_id: Some(ticket.created_by),
                    ..NotificationMeta::for_ticket(ticket.id)
                },
            })
            .await;
        debug!(
            ticket_id = %ticket.id,
            delivered = delivered.len(),
            "Notified admins about new ticket"
        );
    }

    /// A reply was posted. An admin reply goes to the ticket's creator
    /// (unless they wrote it themselves); a staff reply goes to the
    /// support team, not to the ticket's participants.
    pub async fn notify_ticket_reply(&self, ticket: &Ticket, message: &Message) {
        let sender = self.display_name(message.sender_id).await;
        let meta = NotificationMeta {
            sender_id: Some(message.sender_id),
            ..NotificationMeta::for_ticket(ticket.id)
        };

        if message.is_admin_reply {
            if message.sender_id == ticket.created_by {
                return;
            }
            self.broadcast(NotificationRequest {
                recipients: Recipients::Many(vec![ticket.created_by]),
                kind: NotificationKind::Message,
                title: Some("New reply on your ticket".to_string()),
                message: Some(format!("{sender} replied to '{}'", ticket.subject)),
                link: Some(format!("/tickets/{}", ticket.id)),
                meta,
            })
            .await;
        } else {
            let recipients = self.active_admins_allowing(NotificationKind::Ticket).await;
            if recipients.is_empty() {
                return;
            }
            self.broadcast(NotificationRequest {
                recipients: Recipients::Many(recipients),
                kind: NotificationKind::Ticket,
                title: Some("New reply on ticket".to_string()),
                message: Some(format!("{sender} replied to '{}'", ticket.subject)),
                link: Some(format!("/tickets/{}", ticket.id)),
                meta,
            })
            .await;
        }
    }

    /// An announcement was published: tell its explicit recipients, or
    /// every active user when it has none.
    pub async fn notify_announcement(&self, announcement: &Announcement) {
        let recipients = if announcement.is_targeted() {
            announcement.recipient_ids.clone()
        } else {
            match self.users.find_active().await {
                Ok(users) => users
                    .iter()
                    .filter(|u| {
                        u.notification_preferences
                            .allows(NotificationKind::Announcement)
                    })
                    .map(|u| u.id)
                    .collect(),
                Err(error) => {
                    warn!(%error, "Failed to list active users for announcement fan-out");
                    return;
                }
            }
        };
        if recipients.is_empty() {
            return;
        }

        let delivered = self
            .broadcast(NotificationRequest {
                recipients: Recipients::Many(recipients),
                kind: NotificationKind::Announcement,
                title: Some(announcement.title.clone()),
                message: Some(announcement.content.clone()),
                link: Some("/announcements".to_string()),
                meta: NotificationMeta {
                    sender_id: Some(announcement.created_by),
                    ..NotificationMeta::for_announcement(announcement.id)
                },
            })
            .await;
        info!(
            announcement_id = %announcement.id,
            delivered = delivered.len(),
            "Announcement fan-out complete"
        );
    }

    /// A ticket's status changed: tell the creator, unless they changed
    /// it themselves.
    pub async fn notify_status_change(&self, ticket: &Ticket, actor_id: Uuid) {
        if actor_id == ticket.created_by {
            return;
        }
        self.send(NotificationRequest {
            recipients: Recipients::One(ticket.created_by),
            kind: NotificationKind::Ticket,
            title: Some("Ticket status updated".to_string()),
            message: Some(format!("'{}' is now {}", ticket.subject, ticket.status)),
            link: Some(format!("/tickets/{}", ticket.id)),
            meta: NotificationMeta {
                sender_id: Some(actor_id),
                ..NotificationMeta::for_ticket(ticket.id)
            },
        })
        .await;
    }

    /// A ticket's priority changed: tell the creator, unless they
    /// changed it themselves.
    pub async fn notify_priority_change(&self, ticket: &Ticket, actor_id: Uuid) {
        if actor_id == ticket.created_by {
            return;
        }
        self.send(NotificationRequest {
            recipients: Recipients::One(ticket.created_by),
            kind: NotificationKind::Ticket,
            title: Some("Ticket priority updated".to_string()),
            message: Some(format!(
                "'{}' is now {} priority",
                ticket.subject, ticket.priority
            )),
            link: Some(format!("/tickets/{}", ticket.id)),
            meta: NotificationMeta {
                sender_id: Some(actor_id),
                ..NotificationMeta::for_ticket(ticket.id)
            },
        })
        .await;
    }

    /// A ticket was assigned: tell the assignee, unless they assigned
    /// it to themselves.
    pub async fn notify_assignment(&self, ticket: &Ticket, assignee_id: Uuid, actor_id: Uuid) {
        if assignee_id == actor_id {
            return;
        }
        self.send(NotificationRequest {
            recipients: Recipients::One(assignee_id),
            kind: NotificationKind::Ticket,
            title: Some("Ticket assigned to you".to_string()),
            message: Some(format!("'{}' was assigned to you", ticket.subject)),
            link: Some(format!("/tickets/{}", ticket.id)),
            meta: NotificationMeta {
                sender_id: Some(actor_id),
                ..NotificationMeta::for_ticket(ticket.id)
            },
        })
        .await;
    }

    /// A user was added to a ticket: tell them.
    pub async fn notify_participant_added(&self, ticket: &Ticket, user_id: Uuid, actor_id: Uuid) {
        self.send(NotificationRequest {
            recipients: Recipients::One(user_id),
            kind: NotificationKind::Ticket,
            title: Some("Added to ticket".to_string()),
            message: Some(format!("You were added to '{}'", ticket.subject)),
            link: Some(format!("/tickets/{}", ticket.id)),
            meta: NotificationMeta {
                sender_id: Some(actor_id),
                ..NotificationMeta::for_ticket(ticket.id)
            },
        })
        .await;
    }

    /// Active admins whose preferences allow the given kind.
    async fn active_admins_allowing(&self, kind: NotificationKind) -> Vec<Uuid> {
        match self.users.find_active_admins().await {
            Ok(admins) => admins
                .iter()
                .filter(|a| a.notification_preferences.allows(kind))
                .map(|a| a.id)
                .collect(),
            Err(error) => {
                warn!(%error, "Failed to list active admins for fan-out");
                Vec::new()
            }
        }
    }

    /// Username for message text, with a neutral fallback when the user
    /// cannot be resolved.
    async fn display_name(&self, user_id: Uuid) -> String {
        match self.directory.resolve(user_id).await {
            Some(user) => user.username,
            None => "A teammate".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use chrono::Utc;

    use helpdesk_core::config::NotificationsConfig;
    use helpdesk_database::memory::MemoryUserStore;
    use helpdesk_entity::ticket::{TicketPriority, TicketStatus};
    use helpdesk_entity::user::{
        NotificationPreferences, User, UserRole, UserStatus,
    };

    use super::*;
    use crate::directory::UserDirectory;
    use crate::test_support::{FlakyNotificationStore, RecordingTransport};

    struct Harness {
        service: NotificationService,
        users: Arc<MemoryUserStore>,
        store: Arc<FlakyNotificationStore>,
    }

    fn harness() -> Harness {
        let config = NotificationsConfig::default();
        let users = Arc::new(MemoryUserStore::new());
        let store = Arc::new(FlakyNotificationStore::new());
        let transport = Arc::new(RecordingTransport::new());
        let directory = Arc::new(UserDirectory::new(users.clone(), &config));
        let service = NotificationService::new(
            store.clone(),
            users.clone(),
            directory,
            transport,
            config,
        );
        Harness {
            service,
            users,
            store,
        }
    }

    fn ticket(created_by: Uuid) -> Ticket {
        let now = Utc::now();
        Ticket {
            id: Uuid::new_v4(),
            subject: "VPN keeps dropping".to_string(),
            status: TicketStatus::Open,
            priority: TicketPriority::Medium,
            created_by,
            assigned_to: None,
            participants: Vec::new(),
            message_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn reply(ticket_id: Uuid, sender_id: Uuid, is_admin_reply: bool) -> Message {
        Message {
            id: Uuid::new_v4(),
            ticket_id,
            sender_id,
            content: Some("Have you tried the new gateway?".to_string()),
            attachments: Vec::new(),
            is_admin_reply,
            parent_message_id: None,
            created_at: Utc::now(),
        }
    }

    fn recipient_set(store: &FlakyNotificationStore) -> HashSet<Uuid> {
        store.stored().iter().map(|n| n.recipient_id).collect()
    }

    #[tokio::test]
    async fn test_new_ticket_notifies_admins_allowing_ticket_kind() {
        let h = harness();
        let a1 = h.users.seed("a1", UserRole::Admin);
        let muted = User {
            id: Uuid::new_v4(),
            username: "a2".to_string(),
            email: "a2@helpdesk.local".to_string(),
            role: UserRole::Admin,
            status: UserStatus::Active,
            notification_preferences: NotificationPreferences {
                tickets: Some(false),
                ..NotificationPreferences::default()
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        h.users.insert(muted);
        let creator = h.users.seed("reporter", UserRole::Staff);

        h.service.notify_new_ticket(&ticket(creator)).await;

        assert_eq!(recipient_set(&h.store), HashSet::from([a1]));
        let stored = h.store.stored();
        assert_eq!(stored[0].kind, NotificationKind::Ticket);
        assert_eq!(stored[0].meta.sender_id, Some(creator));
    }

    #[tokio::test]
    async fn test_admin_reply_notifies_creator_only() {
        let h = harness();
        let admin = h.users.seed("a1", UserRole::Admin);
        h.users.seed("a2", UserRole::Admin);
        let creator = h.users.seed("p1", UserRole::Staff);

        let ticket = ticket(creator);
        let message = reply(ticket.id, admin, true);
        h.service.notify_ticket_reply(&ticket, &message).await;

        assert_eq!(recipient_set(&h.store), HashSet::from([creator]));
        assert_eq!(h.store.stored()[0].kind, NotificationKind::Message);
    }

    #[tokio::test]
    async fn test_admin_replying_to_own_ticket_notifies_nobody() {
        let h = harness();
        let admin = h.users.seed("a1", UserRole::Admin);

        let ticket = ticket(admin);
        let message = reply(ticket.id, admin, true);
        h.service.notify_ticket_reply(&ticket, &message).await;

        assert_eq!(h.store.stored_count(), 0);
    }

    #[tokio::test]
    async fn test_non_admin_reply_notifies_admins_not_participants() {
        let h = harness();
        let a1 = h.users.seed("a1", UserRole::Admin);
        let a2 = h.users.seed("a2", UserRole::Admin);
        let creator = h.users.seed("p1", UserRole::Staff);
        let participant = h.users.seed("p2", UserRole::Staff);

        let mut ticket = ticket(creator);
        ticket.participants.push(participant);
        let message = reply(ticket.id, creator, false);
        h.service.notify_ticket_reply(&ticket, &message).await;

        let recipients = recipient_set(&h.store);
        assert_eq!(recipients, HashSet::from([a1, a2]));
        assert!(!recipients.contains(&participant));
        for stored in h.store.stored() {
            assert_eq!(stored.kind, NotificationKind::Ticket);
        }
    }

    #[tokio::test]
    async fn test_status_change_notifies_creator_unless_self() {
        let h = harness();
        let admin = h.users.seed("a1", UserRole::Admin);
        let creator = h.users.seed("p1", UserRole::Staff);
        let mut ticket = ticket(creator);
        ticket.status = TicketStatus::InProgress;

        h.service.notify_status_change(&ticket, creator).await;
        assert_eq!(h.store.stored_count(), 0);

        h.service.notify_status_change(&ticket, admin).await;
        assert_eq!(recipient_set(&h.store), HashSet::from([creator]));
        let stored = h.store.stored();
        assert!(stored[0]
            .message
            .as_deref()
            .is_some_and(|m| m.contains("in-progress")));
    }

    #[tokio::test]
    async fn test_self_assignment_notifies_nobody() {
        let h = harness();
        let admin = h.users.seed("a1", UserRole::Admin);
        let creator = h.users.seed("p1", UserRole::Staff);
        let ticket = ticket(creator);

        h.service.notify_assignment(&ticket, admin, admin).await;
        assert_eq!(h.store.stored_count(), 0);

        let other = h.users.seed("a2", UserRole::Admin);
        h.service.notify_assignment(&ticket, other, admin).await;
        assert_eq!(recipient_set(&h.store), HashSet::from([other]));
    }

    #[tokio::test]
    async fn test_participant_added_notifies_added_user() {
        let h = harness();
        let admin = h.users.seed("a1", UserRole::Admin);
        let creator = h.users.seed("p1", UserRole::Staff);
        let added = h.users.seed("p2", UserRole::Staff);
        let ticket = ticket(creator);

        h.service.notify_participant_added(&ticket, added, admin).await;

        assert_eq!(recipient_set(&h.store), HashSet::from([added]));
        assert_eq!(h.store.stored()[0].meta.ticket_id, Some(ticket.id));
    }

    #[tokio::test]
    async fn test_announcement_targets_explicit_list_or_all_active() {
        let h = harness();
        let author = h.users.seed("a1", UserRole::Admin);
        let u1 = h.users.seed("u1", UserRole::Staff);
        let u2 = h.users.seed("u2", UserRole::Staff);

        let targeted = Announcement {
            id: Uuid::new_v4(),
            title: "Parking closed".to_string(),
            content: "Use the north lot this week".to_string(),
            created_by: author,
            recipient_ids: vec![u1],
            is_active: true,
            created_at: Utc::now(),
        };
        h.service.notify_announcement(&targeted).await;
        assert_eq!(recipient_set(&h.store), HashSet::from([u1]));

        let broadcast = Announcement {
            recipient_ids: Vec::new(),
            ..targeted
        };
        h.service.notify_announcement(&broadcast).await;
        let recipients = recipient_set(&h.store);
        assert_eq!(recipients, HashSet::from([author, u1, u2]));
    }
}
