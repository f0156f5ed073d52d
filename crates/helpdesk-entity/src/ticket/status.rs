//! Ticket status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a ticket.
///
/// The update path moves tickets between `open`, `in-progress`, and
/// `resolved` in any direction. `closed` remains in the schema so legacy
/// rows keep deserializing, but no update reaches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "ticket_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TicketStatus {
    /// Awaiting a first response.
    Open,
    /// Being worked by the support team.
    InProgress,
    /// Answered; the creator can reopen by replying.
    Resolved,
    /// Legacy terminal state. Not settable.
    Closed,
}

impl TicketStatus {
    /// Whether a status update may target this status.
    pub fn is_settable(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Return the status as its kebab-case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in-progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = helpdesk_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "in-progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            _ => Err(helpdesk_core::AppError::validation(format!(
                "Invalid ticket status: '{s}'. Expected one of: open, in-progress, resolved, closed"
            ))),
        }
    }
}
