//! # helpdesk-entity
//!
//! Domain entity models for the staff helpdesk. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod announcement;
pub mod message;
pub mod notification;
pub mod ticket;
pub mod user;
