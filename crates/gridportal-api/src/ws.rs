//! `WebSocket` handler for real-time session and notification streaming.
//!
//! Clients connect to `GET /ws/session` and first receive the current
//! session snapshot. After that they receive every published session
//! state and every notification event as JSON text frames of the form
//! `{"type": "session" | "notification", "data": ...}`.
//!
//! If a client falls behind, lagged messages are silently skipped and
//! the client resumes from the most recent message.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use gridportal_types::{NotificationEvent, SessionState};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::state::AppState;

/// A frame pushed to `WebSocket` clients.
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum StreamMessage<'a> {
    /// A published session state.
    Session(&'a SessionState),
    /// A notification queue change.
    Notification(&'a NotificationEvent),
}

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming session states and notification events.
///
/// # Route
///
/// `GET /ws/session`
pub async fn ws_session(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Serialize and send one frame. Returns `false` once the client is gone.
async fn send_frame(socket: &mut WebSocket, frame: &StreamMessage<'_>) -> bool {
    let json = match serde_json::to_string(frame) {
        Ok(j) => j,
        Err(e) => {
            warn!("Failed to serialize stream frame: {e}");
            return true;
        }
    };
    socket.send(Message::Text(json.into())).await.is_ok()
}

/// Handle the `WebSocket` lifecycle: subscribe to both broadcast
/// channels and forward each message as a text frame.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    debug!("WebSocket client connected");

    let mut sessions = state.session.subscribe();
    let mut notifications = state.notifications.subscribe();

    let current = state.session.snapshot().await;
    if !send_frame(&mut socket, &StreamMessage::Session(&current)).await {
        debug!("WebSocket client disconnected (initial send failed)");
        return;
    }

    loop {
        tokio::select! {
            result = sessions.recv() => {
                match result {
                    Ok(session) => {
                        if !send_frame(&mut socket, &StreamMessage::Session(&session)).await {
                            debug!("WebSocket client disconnected (send failed)");
                            return;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        debug!(skipped = n, "WebSocket client lagged on session stream");
                    }
                    Err(RecvError::Closed) => {
                        debug!("Session channel closed, shutting down WebSocket");
                        return;
                    }
                }
            }
            result = notifications.recv() => {
                match result {
                    Ok(event) => {
                        if !send_frame(&mut socket, &StreamMessage::Notification(&event)).await {
                            debug!("WebSocket client disconnected (send failed)");
                            return;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        debug!(skipped = n, "WebSocket client lagged on notification stream");
                    }
                    Err(RecvError::Closed) => {
                        debug!("Notification channel closed, shutting down WebSocket");
                        return;
                    }
                }
            }
            // Check if the client sent a close frame or disconnected.
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!("WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("WebSocket error: {e}");
                        return;
                    }
                    _ => {
                        // Ignore other message types (text, binary from client).
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use gridportal_types::{NotificationId, RemovalReason};

    use super::*;

    #[test]
    fn frames_are_tagged() {
        let state = SessionState::empty(Utc::now());
        let json = serde_json::to_value(StreamMessage::Session(&state)).unwrap();
        assert_eq!(json["type"], "session");
        assert_eq!(json["data"]["loading"], false);

        let event = NotificationEvent::Removed {
            id: NotificationId::new(),
            reason: RemovalReason::Expired,
        };
        let json = serde_json::to_value(StreamMessage::Notification(&event)).unwrap();
        assert_eq!(json["type"], "notification");
        assert_eq!(json["data"]["type"], "removed");
        assert_eq!(json["data"]["reason"], "expired");
    }
}
