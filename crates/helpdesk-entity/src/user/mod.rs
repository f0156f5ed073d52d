//! User entity and related enums.

pub mod model;
pub mod preferences;
pub mod role;
pub mod status;

pub use model::User;
pub use preferences::NotificationPreferences;
pub use role::UserRole;
pub use status::UserStatus;
