//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use helpdesk_core::config::AppConfig;
use helpdesk_realtime::RealtimeHub;
use helpdesk_service::{AnnouncementService, NotificationService, TicketService, UserDirectory};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// User directory cache
    pub directory: Arc<UserDirectory>,
    /// WebSocket realtime hub
    pub hub: Arc<RealtimeHub>,
    /// Notification pipeline and inbox service
    pub notification_service: Arc<NotificationService>,
    /// Ticket and threading service
    pub ticket_service: Arc<TicketService>,
    /// Announcement service
    pub announcement_service: Arc<AnnouncementService>,
    /// Process start time, reported by the health endpoint
    pub started_at: Instant,
}
