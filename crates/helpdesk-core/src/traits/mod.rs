//! Core traits defined here and implemented by other crates.

pub mod transport;

pub use transport::ChannelTransport;
