//! Notification kind enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The type of a notification.
///
/// The first four are lifecycle types with preference keys. The UI
/// severities (success/error/warning/info) are accepted through the same
/// pipeline for toast-style messages; they have no preference key and no
/// distinct lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Ticket activity: filed, status, priority, assignment.
    Ticket,
    /// A published announcement.
    Announcement,
    /// A reply on a ticket the recipient created.
    Message,
    /// System-originated notices.
    System,
    /// UI severity: success toast.
    Success,
    /// UI severity: error toast.
    Error,
    /// UI severity: warning toast.
    Warning,
    /// UI severity: info toast.
    Info,
}

impl NotificationKind {
    /// Whether this kind is a UI severity rather than a lifecycle type.
    pub fn is_severity(&self) -> bool {
        matches!(
            self,
            Self::Success | Self::Error | Self::Warning | Self::Info
        )
    }

    /// The event names this kind is emitted under.
    ///
    /// Older clients still listen on the legacy names, so each emission
    /// goes out once per alias with an identical payload.
    pub fn event_aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Announcement => &["notification", "new_announcement"],
            Self::Ticket | Self::Message | Self::System => &["notification", "new_notification"],
            Self::Success | Self::Error | Self::Warning | Self::Info => &["notification"],
        }
    }

    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ticket => "ticket",
            Self::Announcement => "announcement",
            Self::Message => "message",
            Self::System => "system",
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = helpdesk_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ticket" => Ok(Self::Ticket),
            "announcement" => Ok(Self::Announcement),
            "message" => Ok(Self::Message),
            "system" => Ok(Self::System),
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            "warning" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            _ => Err(helpdesk_core::AppError::validation(format!(
                "Invalid notification type: '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_and_severity_strings_parse() {
        assert_eq!(
            "ticket".parse::<NotificationKind>().unwrap(),
            NotificationKind::Ticket
        );
        assert_eq!(
            "warning".parse::<NotificationKind>().unwrap(),
            NotificationKind::Warning
        );
        assert!("reminder".parse::<NotificationKind>().is_err());
    }

    #[test]
    fn test_severity_split() {
        assert!(!NotificationKind::Ticket.is_severity());
        assert!(!NotificationKind::System.is_severity());
        assert!(NotificationKind::Success.is_severity());
    }

    #[test]
    fn test_every_alias_list_contains_current_name() {
        for kind in [
            NotificationKind::Ticket,
            NotificationKind::Announcement,
            NotificationKind::Message,
            NotificationKind::System,
            NotificationKind::Info,
        ] {
            assert!(kind.event_aliases().contains(&"notification"));
        }
        assert!(
            NotificationKind::Announcement
                .event_aliases()
                .contains(&"new_announcement")
        );
    }
}
