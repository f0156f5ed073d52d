//! Pub/sub channels and subscription tracking.

pub mod registry;

pub use registry::ChannelRegistry;
