//! End-to-end HTTP tests over the full router with in-memory stores.

mod common;

use std::time::Duration;

use serde_json::{json, Value};
use uuid::Uuid;

use common::TestApp;
use helpdesk_entity::user::UserRole;

#[tokio::test]
async fn test_health_reports_ok() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, 200);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["status"], "ok");

    let detailed = app.request("GET", "/api/health/detailed", None, None).await;
    assert_eq!(detailed.status, 200);
    assert_eq!(detailed.body["data"]["realtime"]["connections"], 0);
    assert_eq!(detailed.body["data"]["retry_queue_depth"], 0);
}

#[tokio::test]
async fn test_missing_identity_is_rejected() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/notifications", None, None).await;
    assert_eq!(response.status, 401);
    assert_eq!(response.body["error"], "AUTHENTICATION");

    let listing = app.request("GET", "/api/tickets", None, None).await;
    assert_eq!(listing.status, 401);
}

#[tokio::test]
async fn test_ticket_create_and_role_scoped_listing() {
    let app = TestApp::new();
    let admin = app.seed_user("a1", UserRole::Admin);
    let creator = app.seed_user("reporter", UserRole::Staff);
    let outsider = app.seed_user("outsider", UserRole::Staff);

    let created = app
        .request(
            "POST",
            "/api/tickets",
            Some((creator, UserRole::Staff)),
            Some(json!({
                "subject": "Badge reader offline",
                "content": "Nobody can get into the east wing",
                "priority": "high"
            })),
        )
        .await;
    assert_eq!(created.status, 200);
    assert_eq!(created.body["data"]["subject"], "Badge reader offline");
    assert_eq!(created.body["data"]["status"], "open");
    assert_eq!(created.body["data"]["priority"], "high");
    assert_eq!(created.body["data"]["created_by"], json!(creator));
    let ticket_id = created.body["data"]["id"]
        .as_str()
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap();

    let own = app
        .request("GET", "/api/tickets", Some((creator, UserRole::Staff)), None)
        .await;
    assert_eq!(own.status, 200);
    assert_eq!(own.body["total"], 1);

    let all = app
        .request("GET", "/api/tickets", Some((admin, UserRole::Admin)), None)
        .await;
    assert_eq!(all.body["total"], 1);

    let none = app
        .request("GET", "/api/tickets", Some((outsider, UserRole::Staff)), None)
        .await;
    assert_eq!(none.body["total"], 0);

    let denied = app
        .request(
            "GET",
            &format!("/api/tickets/{ticket_id}"),
            Some((outsider, UserRole::Staff)),
            None,
        )
        .await;
    assert_eq!(denied.status, 403);
    assert_eq!(denied.body["error"], "AUTHORIZATION");
}

#[tokio::test]
async fn test_blank_subject_is_rejected() {
    let app = TestApp::new();
    let creator = app.seed_user("reporter", UserRole::Staff);

    let response = app
        .request(
            "POST",
            "/api/tickets",
            Some((creator, UserRole::Staff)),
            Some(json!({ "subject": "   ", "content": "body" })),
        )
        .await;
    assert_eq!(response.status, 400);
    assert_eq!(response.body["error"], "VALIDATION");
}

#[tokio::test]
async fn test_thread_endpoint_groups_replies() {
    let app = TestApp::new();
    let admin = app.seed_user("a1", UserRole::Admin);
    let creator = app.seed_user("reporter", UserRole::Staff);

    let created = app
        .request(
            "POST",
            "/api/tickets",
            Some((creator, UserRole::Staff)),
            Some(json!({ "subject": "Printer jam", "content": "Third floor printer again" })),
        )
        .await;
    let ticket_id = created.body["data"]["id"].as_str().unwrap().to_string();
    let opening_id = created.body["data"]["message_ids"][0]
        .as_str()
        .unwrap()
        .to_string();

    let top_level = app
        .request(
            "POST",
            &format!("/api/tickets/{ticket_id}/messages"),
            Some((admin, UserRole::Admin)),
            Some(json!({ "content": "Taking a look now" })),
        )
        .await;
    assert_eq!(top_level.status, 200);
    assert_eq!(top_level.body["data"]["is_admin_reply"], true);

    let threaded = app
        .request(
            "POST",
            &format!("/api/tickets/{ticket_id}/messages"),
            Some((creator, UserRole::Staff)),
            Some(json!({
                "content": "It also shows error E5",
                "parent_message_id": opening_id
            })),
        )
        .await;
    assert_eq!(threaded.status, 200);

    let thread = app
        .request(
            "GET",
            &format!("/api/tickets/{ticket_id}/messages"),
            Some((creator, UserRole::Staff)),
            None,
        )
        .await;
    assert_eq!(thread.status, 200);
    let entries = thread.body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["id"], json!(opening_id));
    assert_eq!(entries[0]["replies"].as_array().unwrap().len(), 1);
    assert_eq!(entries[0]["replies"][0]["content"], "It also shows error E5");
    assert_eq!(entries[1]["replies"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_status_update_rules() {
    let app = TestApp::new();
    let creator = app.seed_user("reporter", UserRole::Staff);
    let outsider = app.seed_user("outsider", UserRole::Staff);

    let created = app
        .request(
            "POST",
            "/api/tickets",
            Some((creator, UserRole::Staff)),
            Some(json!({ "subject": "Laptop battery", "content": "Dies in an hour" })),
        )
        .await;
    let ticket_id = created.body["data"]["id"].as_str().unwrap().to_string();

    let moved = app
        .request(
            "PUT",
            &format!("/api/tickets/{ticket_id}/status"),
            Some((creator, UserRole::Staff)),
            Some(json!({ "status": "in-progress" })),
        )
        .await;
    assert_eq!(moved.status, 200);
    assert_eq!(moved.body["data"]["status"], "in-progress");

    let closed = app
        .request(
            "PUT",
            &format!("/api/tickets/{ticket_id}/status"),
            Some((creator, UserRole::Staff)),
            Some(json!({ "status": "closed" })),
        )
        .await;
    assert_eq!(closed.status, 400);

    let foreign = app
        .request(
            "PUT",
            &format!("/api/tickets/{ticket_id}/status"),
            Some((outsider, UserRole::Staff)),
            Some(json!({ "status": "resolved" })),
        )
        .await;
    assert_eq!(foreign.status, 403);
}

#[tokio::test]
async fn test_priority_change_is_admin_only() {
    let app = TestApp::new();
    let admin = app.seed_user("a1", UserRole::Admin);
    let creator = app.seed_user("reporter", UserRole::Staff);

    let created = app
        .request(
            "POST",
            "/api/tickets",
            Some((creator, UserRole::Staff)),
            Some(json!({ "subject": "Phones down", "content": "Whole floor offline" })),
        )
        .await;
    let ticket_id = created.body["data"]["id"].as_str().unwrap().to_string();

    let denied = app
        .request(
            "PUT",
            &format!("/api/tickets/{ticket_id}/priority"),
            Some((creator, UserRole::Staff)),
            Some(json!({ "priority": "urgent" })),
        )
        .await;
    assert_eq!(denied.status, 403);

    let updated = app
        .request(
            "PUT",
            &format!("/api/tickets/{ticket_id}/priority"),
            Some((admin, UserRole::Admin)),
            Some(json!({ "priority": "urgent" })),
        )
        .await;
    assert_eq!(updated.status, 200);
    assert_eq!(updated.body["data"]["priority"], "urgent");
}

#[tokio::test]
async fn test_announcement_publishing_and_listing() {
    let app = TestApp::new();
    let admin = app.seed_user("a1", UserRole::Admin);
    let staff = app.seed_user("reader", UserRole::Staff);

    let denied = app
        .request(
            "POST",
            "/api/announcements",
            Some((staff, UserRole::Staff)),
            Some(json!({ "title": "Nope", "content": "Not allowed" })),
        )
        .await;
    assert_eq!(denied.status, 403);

    let published = app
        .request(
            "POST",
            "/api/announcements",
            Some((admin, UserRole::Admin)),
            Some(json!({ "title": "Maintenance window", "content": "Saturday 02:00-04:00" })),
        )
        .await;
    assert_eq!(published.status, 200);
    assert_eq!(published.body["data"]["title"], "Maintenance window");

    let listed = app
        .request(
            "GET",
            "/api/announcements",
            Some((staff, UserRole::Staff)),
            None,
        )
        .await;
    assert_eq!(listed.status, 200);
    assert_eq!(listed.body["total"], 1);
    assert_eq!(listed.body["items"][0]["title"], "Maintenance window");

    let anonymous = app.request("GET", "/api/announcements", None, None).await;
    assert_eq!(anonymous.status, 401);
}

#[tokio::test]
async fn test_preferences_roundtrip() {
    let app = TestApp::new();
    let user = app.seed_user("reader", UserRole::Staff);
    let identity = Some((user, UserRole::Staff));

    let initial = app
        .request("GET", "/api/notifications/preferences", identity, None)
        .await;
    assert_eq!(initial.status, 200);
    assert_eq!(initial.body["data"]["announcements"], Value::Null);

    let updated = app
        .request(
            "PUT",
            "/api/notifications/preferences",
            identity,
            Some(json!({ "preferences": { "announcements": false } })),
        )
        .await;
    assert_eq!(updated.status, 200);
    assert_eq!(updated.body["data"]["announcements"], false);

    let fetched = app
        .request("GET", "/api/notifications/preferences", identity, None)
        .await;
    assert_eq!(fetched.body["data"]["announcements"], false);
    assert_eq!(fetched.body["data"]["tickets"], Value::Null);
}

#[tokio::test]
async fn test_admin_reply_lands_in_creator_inbox() {
    let app = TestApp::new();
    let admin = app.seed_user("a1", UserRole::Admin);
    let creator = app.seed_user("reporter", UserRole::Staff);
    let identity = Some((creator, UserRole::Staff));

    let created = app
        .request(
            "POST",
            "/api/tickets",
            identity,
            Some(json!({ "subject": "Monitor flicker", "content": "Started this morning" })),
        )
        .await;
    let ticket_id = created.body["data"]["id"].as_str().unwrap().to_string();

    let reply = app
        .request(
            "POST",
            &format!("/api/tickets/{ticket_id}/messages"),
            Some((admin, UserRole::Admin)),
            Some(json!({ "content": "Swap cables and report back" })),
        )
        .await;
    assert_eq!(reply.status, 200);

    // Fan-out runs on a detached task, so give it a moment to land.
    let mut count = 0;
    for _ in 0..200 {
        let response = app
            .request("GET", "/api/notifications/unread-count", identity, None)
            .await;
        count = response.body["data"]["count"].as_u64().unwrap_or(0);
        if count >= 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(count, 1);

    let inbox = app
        .request("GET", "/api/notifications", identity, None)
        .await;
    assert_eq!(inbox.body["total"], 1);
    assert_eq!(inbox.body["items"][0]["kind"], "message");
    assert_eq!(inbox.body["items"][0]["is_read"], false);
    assert_eq!(inbox.body["items"][0]["ticket_id"], json!(ticket_id));

    let marked = app
        .request("PUT", "/api/notifications/read-all", identity, None)
        .await;
    assert_eq!(marked.body["data"]["count"], 1);

    let drained = app
        .request("GET", "/api/notifications/unread-count", identity, None)
        .await;
    assert_eq!(drained.body["data"]["count"], 0);
}

#[tokio::test]
async fn test_mark_read_and_delete_are_scoped_to_owner() {
    let app = TestApp::new();
    let admin = app.seed_user("a1", UserRole::Admin);
    let creator = app.seed_user("reporter", UserRole::Staff);

    // Creating a ticket notifies the admin team.
    app.request(
        "POST",
        "/api/tickets",
        Some((creator, UserRole::Staff)),
        Some(json!({ "subject": "Mouse missing", "content": "Desk 14" })),
    )
    .await;

    let mut notification_id = String::new();
    for _ in 0..200 {
        let inbox = app
            .request(
                "GET",
                "/api/notifications",
                Some((admin, UserRole::Admin)),
                None,
            )
            .await;
        if inbox.body["total"] == json!(1) {
            notification_id = inbox.body["items"][0]["id"].as_str().unwrap().to_string();
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(!notification_id.is_empty());

    // Another user cannot touch it.
    let foreign_read = app
        .request(
            "PUT",
            &format!("/api/notifications/{notification_id}/read"),
            Some((creator, UserRole::Staff)),
            None,
        )
        .await;
    assert_eq!(foreign_read.status, 404);

    let read = app
        .request(
            "PUT",
            &format!("/api/notifications/{notification_id}/read"),
            Some((admin, UserRole::Admin)),
            None,
        )
        .await;
    assert_eq!(read.status, 200);

    let deleted = app
        .request(
            "DELETE",
            &format!("/api/notifications/{notification_id}"),
            Some((admin, UserRole::Admin)),
            None,
        )
        .await;
    assert_eq!(deleted.status, 200);

    let empty = app
        .request(
            "GET",
            "/api/notifications",
            Some((admin, UserRole::Admin)),
            None,
        )
        .await;
    assert_eq!(empty.body["total"], 0);
}
