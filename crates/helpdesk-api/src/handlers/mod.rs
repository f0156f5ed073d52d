//! Request handlers, one module per domain.

pub mod announcement;
pub mod health;
pub mod notification;
pub mod ticket;
pub mod user;
pub mod ws;
