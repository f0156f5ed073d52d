//! # helpdesk-database
//!
//! PostgreSQL connection management, the store traits consumed by the
//! service layer, concrete sqlx repositories, and in-memory store
//! implementations used by tests and Postgres-free local runs.

pub mod connection;
pub mod memory;
pub mod repositories;
pub mod stores;

pub use connection::DatabasePool;
