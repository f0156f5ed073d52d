//! Ticket lifecycle and message threading.

pub mod service;

pub use service::{ThreadedMessage, TicketService};
