//! sqlx repository implementations of the store traits.

pub mod announcement;
pub mod message;
pub mod notification;
pub mod ticket;
pub mod user;

pub use announcement::AnnouncementRepository;
pub use message::MessageRepository;
pub use notification::NotificationRepository;
pub use ticket::TicketRepository;
pub use user::UserRepository;

use helpdesk_core::error::{AppError, ErrorKind};

/// Map a sqlx error into an [`AppError`], keeping the transient class apart.
///
/// Connection-level failures are `Network` so the retry queue picks them up;
/// everything else (constraint violations, bad SQL, decode errors) is
/// `Database` and permanent.
pub(crate) fn db_error(context: &str, error: sqlx::Error) -> AppError {
    let kind = match error {
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            ErrorKind::Network
        }
        _ => ErrorKind::Database,
    };
    AppError::with_source(kind, context, error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_failures_are_retriable() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = db_error("Failed to create notification", sqlx::Error::Io(io));
        assert!(err.is_retriable());

        let err = db_error("Failed to create notification", sqlx::Error::PoolTimedOut);
        assert!(err.is_retriable());

        let err = db_error("Failed to create notification", sqlx::Error::RowNotFound);
        assert!(!err.is_retriable());
    }
}
