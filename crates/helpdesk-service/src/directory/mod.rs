//! Cached user directory consulted during notification delivery.

pub mod cache;

pub use cache::{DirectoryUser, UserDirectory};
