//! In-memory store implementations.
//!
//! Same contracts as the sqlx repositories, backed by `RwLock<Vec<_>>`.
//! Tests run against these, and the server falls back to them when
//! configured without a Postgres URL.

pub mod announcement;
pub mod message;
pub mod notification;
pub mod ticket;
pub mod user;

pub use announcement::MemoryAnnouncementStore;
pub use message::MemoryMessageStore;
pub use notification::MemoryNotificationStore;
pub use ticket::MemoryTicketStore;
pub use user::MemoryUserStore;

use helpdesk_core::types::{Page, PageRequest};

/// Slice an already-ordered result set into the requested page.
pub(crate) fn paginate<T>(items: Vec<T>, page: &PageRequest) -> Page<T> {
    let total = items.len() as u64;
    let page_items = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    Page::new(page_items, page, total)
}
