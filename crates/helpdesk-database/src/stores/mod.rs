//! Store traits consumed by the service layer.
//!
//! Each trait is a behavioral contract with two implementations: the sqlx
//! repositories in [`crate::repositories`] and the in-memory stores in
//! [`crate::memory`].

pub mod announcement;
pub mod message;
pub mod notification;
pub mod ticket;
pub mod user;

pub use announcement::AnnouncementStore;
pub use message::MessageStore;
pub use notification::NotificationStore;
pub use ticket::TicketStore;
pub use user::UserStore;
