//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use helpdesk_api::{build_router, AppState};
use helpdesk_core::config::AppConfig;
use helpdesk_database::memory::{
    MemoryAnnouncementStore, MemoryMessageStore, MemoryNotificationStore, MemoryTicketStore,
    MemoryUserStore,
};
use helpdesk_entity::user::UserRole;
use helpdesk_realtime::RealtimeHub;
use helpdesk_service::{
    AnnouncementService, NotificationService, TicketService, UserDirectory,
};

/// Test application wired over in-memory stores.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// User store for seeding identities
    pub users: Arc<MemoryUserStore>,
    /// Notification store for direct inspection
    pub notifications: Arc<MemoryNotificationStore>,
    /// Realtime hub backing the `/ws` endpoint
    pub hub: Arc<RealtimeHub>,
}

/// Response captured from a test request.
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body (`Null` when empty)
    pub body: Value,
}

impl TestApp {
    /// Builds the full application over in-memory stores.
    pub fn new() -> Self {
        let config = AppConfig::default();

        let users = Arc::new(MemoryUserStore::new());
        let tickets = Arc::new(MemoryTicketStore::new());
        let messages = Arc::new(MemoryMessageStore::new());
        let notifications = Arc::new(MemoryNotificationStore::new());
        let announcements = Arc::new(MemoryAnnouncementStore::new());

        let hub = Arc::new(RealtimeHub::new(config.realtime.clone()));
        let directory = Arc::new(UserDirectory::new(users.clone(), &config.notifications));
        let notification_service = Arc::new(NotificationService::new(
            notifications.clone(),
            users.clone(),
            directory.clone(),
            hub.clone(),
            config.notifications.clone(),
        ));
        let ticket_service = Arc::new(TicketService::new(
            tickets,
            messages,
            notification_service.clone(),
            directory.clone(),
            hub.clone(),
        ));
        let announcement_service = Arc::new(AnnouncementService::new(
            announcements,
            notification_service.clone(),
        ));

        let state = AppState {
            config: Arc::new(config),
            directory,
            hub: hub.clone(),
            notification_service,
            ticket_service,
            announcement_service,
            started_at: Instant::now(),
        };

        Self {
            router: build_router(state),
            users,
            notifications,
            hub,
        }
    }

    /// Seeds an active user and returns its id.
    pub fn seed_user(&self, username: &str, role: UserRole) -> Uuid {
        self.users.seed(username, role)
    }

    /// Sends a request and captures status plus parsed JSON body.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        identity: Option<(Uuid, UserRole)>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some((user_id, role)) = identity {
            builder = builder
                .header("x-user-id", user_id.to_string())
                .header("x-user-role", role.as_str());
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}
