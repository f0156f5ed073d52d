//! Ticket entity and related enums.

pub mod model;
pub mod priority;
pub mod status;

pub use model::{NewTicket, Ticket};
pub use priority::TicketPriority;
pub use status::TicketStatus;
