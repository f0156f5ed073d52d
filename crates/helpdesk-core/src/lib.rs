//! # helpdesk-core
//!
//! Core crate for the staff helpdesk backend. Contains configuration
//! schemas, channel naming, pagination types, the realtime transport
//! contract, and the unified error system.
//!
//! This crate has **no** internal dependencies on other helpdesk crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
