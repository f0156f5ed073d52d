//! Notification send requests and the typed delivery receipt.

use serde::Serialize;
use uuid::Uuid;

use helpdesk_core::error::AppError;
use helpdesk_core::result::AppResult;
use helpdesk_entity::notification::{
    NewNotification, Notification, NotificationKind, NotificationMeta,
};

/// Who a request is addressed to.
#[derive(Debug, Clone)]
pub enum Recipients {
    /// A single recipient.
    One(Uuid),
    /// An explicit recipient list.
    Many(Vec<Uuid>),
}

impl Recipients {
    /// The recipient ids in order.
    pub fn as_slice(&self) -> &[Uuid] {
        match self {
            Recipients::One(id) => std::slice::from_ref(id),
            Recipients::Many(ids) => ids,
        }
    }

    /// Number of recipients.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Whether the request addresses nobody.
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

/// A request to deliver one notification to one or more recipients.
#[derive(Debug, Clone)]
pub struct NotificationRequest {
    /// Recipient set.
    pub recipients: Recipients,
    /// Notification type, which also selects the emission aliases.
    pub kind: NotificationKind,
    /// Short headline.
    pub title: Option<String>,
    /// Body text.
    pub message: Option<String>,
    /// Optional in-app link target.
    pub link: Option<String>,
    /// Related entity references.
    pub meta: NotificationMeta,
}

impl NotificationRequest {
    /// A request must carry a title or a message.
    pub fn validate(&self) -> AppResult<()> {
        let has_title = self.title.as_deref().is_some_and(|t| !t.trim().is_empty());
        let has_message = self
            .message
            .as_deref()
            .is_some_and(|m| !m.trim().is_empty());
        if !has_title && !has_message {
            return Err(AppError::validation(
                "Notification requires a title or a message",
            ));
        }
        Ok(())
    }

    /// The same request narrowed to a single recipient, as stored on a
    /// retry item.
    pub fn for_recipient(&self, recipient_id: Uuid) -> Self {
        Self {
            recipients: Recipients::One(recipient_id),
            ..self.clone()
        }
    }

    /// The persistence record for one recipient.
    pub fn to_new_notification(&self, recipient_id: Uuid) -> NewNotification {
        NewNotification {
            recipient_id,
            kind: self.kind,
            title: self.title.clone(),
            message: self.message.clone(),
            link: self.link.clone(),
            meta: self.meta.clone(),
        }
    }
}

/// What a send produced.
///
/// The shape is part of the service contract: callers receive nothing
/// when no recipient succeeded, the bare notification when exactly one
/// did, and the list when several did.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SendReceipt {
    /// Exactly one recipient succeeded.
    One(Box<Notification>),
    /// More than one recipient succeeded.
    Many(Vec<Notification>),
}

impl SendReceipt {
    /// Shapes a result list, returning `None` when it is empty.
    pub fn from_results(mut results: Vec<Notification>) -> Option<Self> {
        match results.len() {
            0 => None,
            1 => results.pop().map(|n| SendReceipt::One(Box::new(n))),
            _ => Some(SendReceipt::Many(results)),
        }
    }

    /// Number of notifications in the receipt.
    pub fn count(&self) -> usize {
        match self {
            SendReceipt::One(_) => 1,
            SendReceipt::Many(list) => list.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: Option<&str>, message: Option<&str>) -> NotificationRequest {
        NotificationRequest {
            recipients: Recipients::One(Uuid::new_v4()),
            kind: NotificationKind::System,
            title: title.map(str::to_string),
            message: message.map(str::to_string),
            link: None,
            meta: NotificationMeta::default(),
        }
    }

    #[test]
    fn test_validate_requires_title_or_message() {
        assert!(request(None, None).validate().is_err());
        assert!(request(Some("   "), None).validate().is_err());
        assert!(request(Some("Maintenance window"), None).validate().is_ok());
        assert!(request(None, Some("Back at 9pm")).validate().is_ok());
    }

    fn stored(title: &str) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            recipient_id: Uuid::new_v4(),
            kind: NotificationKind::System,
            title: Some(title.to_string()),
            message: None,
            link: None,
            is_read: false,
            meta: NotificationMeta::default(),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_receipt_shape_follows_success_count() {
        assert!(SendReceipt::from_results(Vec::new()).is_none());

        let one = SendReceipt::from_results(vec![stored("a")]);
        assert!(matches!(one, Some(SendReceipt::One(_))));

        let many = SendReceipt::from_results(vec![stored("a"), stored("b")]);
        match many {
            Some(SendReceipt::Many(list)) => assert_eq!(list.len(), 2),
            other => panic!("expected list shape, got {other:?}"),
        }
    }
}
