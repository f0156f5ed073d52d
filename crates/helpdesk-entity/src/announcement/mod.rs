//! Announcement entity.

mod model;

pub use model::{Announcement, NewAnnouncement};
