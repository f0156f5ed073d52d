//! Ticket message entity.

pub mod model;

pub use model::{Attachment, Message, NewMessage};
