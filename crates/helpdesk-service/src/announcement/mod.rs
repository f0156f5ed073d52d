//! Announcement publishing and listing.

pub mod service;

pub use service::AnnouncementService;
