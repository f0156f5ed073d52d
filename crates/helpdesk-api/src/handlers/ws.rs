//! WebSocket upgrade handler.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::http::HeaderMap;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{info, warn};

use helpdesk_service::RequestContext;

use crate::error::ApiError;
use crate::extractors::auth::context_from_headers;
use crate::state::AppState;

/// GET /ws, the WebSocket upgrade.
///
/// Identity comes from the same gateway headers the REST endpoints use,
/// checked before the upgrade completes.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    let ctx = context_from_headers(&headers)?;
    Ok(ws.on_upgrade(move |socket| handle_connection(state, ctx, socket)))
}

/// Drives an established WebSocket connection.
async fn handle_connection(state: AppState, ctx: RequestContext, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (handle, mut outbound_rx) = state
        .hub
        .connections()
        .register(ctx.user_id, ctx.is_admin());
    let conn_id = handle.id;

    info!(
        conn_id = %conn_id,
        user_id = %ctx.user_id,
        "WebSocket connection established"
    );

    // Forward hub frames to the socket until the buffer closes.
    let writer = tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            let text = match serde_json::to_string(&frame) {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "Failed to serialize outbound frame");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => {
                state.hub.connections().handle_frame(conn_id, &text);
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    writer.abort();
    state.hub.connections().unregister(conn_id);

    info!(
        conn_id = %conn_id,
        user_id = %ctx.user_id,
        "WebSocket connection closed"
    );
}
