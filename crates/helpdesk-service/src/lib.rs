//! # helpdesk-service
//!
//! Business logic service layer for the helpdesk backend. Each service
//! orchestrates stores and the realtime transport to implement
//! application-level use cases: notification delivery with rate limiting
//! and bounded retry, ticket threading, and announcements.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod announcement;
pub mod context;
pub mod directory;
pub mod notification;
pub mod ticket;

#[cfg(test)]
mod test_support;

pub use announcement::AnnouncementService;
pub use context::RequestContext;
pub use directory::{DirectoryUser, UserDirectory};
pub use notification::{
    NotificationRequest, NotificationService, Recipients, SendReceipt,
};
pub use ticket::{ThreadedMessage, TicketService};
