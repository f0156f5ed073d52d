//! Notification delivery pipeline: rate limiting, user resolution,
//! preference checks, persistence, and realtime emission with bounded
//! retry for transient persistence failures.

pub mod fanout;
pub mod limiter;
pub mod request;
pub mod retry;
pub mod service;

pub use limiter::RateLimiter;
pub use request::{NotificationRequest, Recipients, SendReceipt};
pub use retry::{RetryItem, RetryQueue};
pub use service::NotificationService;
