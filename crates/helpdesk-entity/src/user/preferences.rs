//! Per-user notification preferences.

use serde::{Deserialize, Serialize};

use crate::notification::NotificationKind;

/// Per-type notification opt-outs stored on the user record.
///
/// A key only disables delivery when it is explicitly `false`; an absent
/// key allows delivery. UI severities (success/error/warning/info) have
/// no preference key and are always allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPreferences {
    /// Ticket lifecycle notifications (new tickets, status, assignment).
    pub tickets: Option<bool>,
    /// Reply notifications on own tickets.
    pub messages: Option<bool>,
    /// Announcement notifications.
    pub announcements: Option<bool>,
    /// System notifications.
    pub system: Option<bool>,
}

impl NotificationPreferences {
    /// Whether this preference set allows delivery of the given kind.
    pub fn allows(&self, kind: NotificationKind) -> bool {
        let setting = match kind {
            NotificationKind::Ticket => self.tickets,
            NotificationKind::Message => self.messages,
            NotificationKind::Announcement => self.announcements,
            NotificationKind::System => self.system,
            _ => None,
        };
        setting != Some(false)
    }
}
