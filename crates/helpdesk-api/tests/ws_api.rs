//! Live WebSocket tests against a served router.

mod common;

use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use uuid::Uuid;

use common::TestApp;
use helpdesk_core::traits::ChannelTransport;
use helpdesk_core::types::channel::{ticket_channel, user_channel};
use helpdesk_entity::user::UserRole;

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Serves the app on an ephemeral port and returns its address.
async fn spawn_server(app: &TestApp) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = app.router.clone();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn connect(addr: SocketAddr, user_id: Uuid, role: &'static str) -> WsClient {
    let mut request = format!("ws://{addr}/ws").into_client_request().unwrap();
    request
        .headers_mut()
        .insert("x-user-id", user_id.to_string().parse().unwrap());
    request
        .headers_mut()
        .insert("x-user-role", HeaderValue::from_static(role));

    let (socket, response) = connect_async(request).await.unwrap();
    assert_eq!(response.status().as_u16(), 101);
    socket
}

/// Reads frames until a text frame arrives, parsed as JSON.
async fn next_json(socket: &mut WsClient) -> Value {
    loop {
        let message = timeout(Duration::from_secs(2), socket.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("stream ended")
            .expect("websocket error");
        if let WsMessage::Text(text) = message {
            return serde_json::from_str(&text).expect("frame is JSON");
        }
    }
}

/// Polls `condition` for up to two seconds.
async fn wait_until<F: Fn() -> bool>(condition: F) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached within 2s");
}

#[tokio::test]
async fn test_connect_receive_subscribe_and_clean_up() {
    let app = TestApp::new();
    let user = app.seed_user("wsuser", UserRole::Staff);
    let addr = spawn_server(&app).await;

    let mut socket = connect(addr, user, "staff").await;
    let hub = app.hub.clone();
    wait_until(|| hub.stats().connections == 1).await;

    // Every connection joins its own user channel at registration.
    let delivered = app.hub.emit(
        &user_channel(user),
        "new_notification",
        &json!({ "title": "Ping" }),
    );
    assert_eq!(delivered, 1);

    let frame = next_json(&mut socket).await;
    assert_eq!(frame["type"], "event");
    assert_eq!(frame["channel"], json!(user_channel(user)));
    assert_eq!(frame["event"], "new_notification");
    assert_eq!(frame["payload"]["title"], "Ping");

    // Explicit channel subscriptions are acknowledged.
    let ticket = ticket_channel(Uuid::new_v4());
    let subscribe = json!({ "type": "subscribe", "channel": ticket }).to_string();
    socket.send(WsMessage::Text(subscribe.into())).await.unwrap();

    let ack = next_json(&mut socket).await;
    assert_eq!(ack["type"], "subscribed");
    assert_eq!(ack["channel"], json!(ticket.clone()));

    let on_ticket = app.hub.emit(&ticket, "message_added", &json!({ "id": 1 }));
    assert_eq!(on_ticket, 1);
    let event = next_json(&mut socket).await;
    assert_eq!(event["channel"], json!(ticket.clone()));

    // Unsubscribing stops delivery on that channel.
    let unsubscribe = json!({ "type": "unsubscribe", "channel": ticket }).to_string();
    socket
        .send(WsMessage::Text(unsubscribe.into()))
        .await
        .unwrap();
    let gone = next_json(&mut socket).await;
    assert_eq!(gone["type"], "unsubscribed");
    assert_eq!(app.hub.emit(&ticket, "message_added", &json!({ "id": 2 })), 0);

    // Closing the socket releases the registration.
    socket.close(None).await.unwrap();
    let hub = app.hub.clone();
    wait_until(|| hub.stats().connections == 0).await;
    assert_eq!(
        app.hub
            .emit(&user_channel(user), "new_notification", &json!({})),
        0
    );
}

#[tokio::test]
async fn test_malformed_frame_gets_an_error_reply() {
    let app = TestApp::new();
    let user = app.seed_user("wsuser", UserRole::Staff);
    let addr = spawn_server(&app).await;

    let mut socket = connect(addr, user, "staff").await;
    socket
        .send(WsMessage::Text("not json".to_string().into()))
        .await
        .unwrap();

    let frame = next_json(&mut socket).await;
    assert_eq!(frame["type"], "error");
    assert_eq!(frame["code"], "INVALID_FRAME");
}

#[tokio::test]
async fn test_handshake_without_identity_is_rejected() {
    let app = TestApp::new();
    let addr = spawn_server(&app).await;

    let error = connect_async(format!("ws://{addr}/ws")).await.unwrap_err();
    match error {
        WsError::Http(response) => assert_eq!(response.status().as_u16(), 401),
        other => panic!("expected an HTTP rejection, got: {other:?}"),
    }
}
