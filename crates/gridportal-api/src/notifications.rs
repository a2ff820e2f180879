//! Notification queue endpoints.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/notifications` | Live notifications in insertion order |
//! | `POST` | `/api/notifications` | Add a notification |
//! | `DELETE` | `/api/notifications/{id}` | Dismiss a notification |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use gridportal_types::{NotificationId, NotificationKind};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for `POST /api/notifications`.
#[derive(Debug, Deserialize)]
pub struct NewNotification {
    /// Visual intent.
    pub kind: NotificationKind,
    /// Headline; must not be blank.
    pub title: String,
    /// Optional detail text.
    pub message: Option<String>,
}

/// Parse a UUID string, returning an [`ApiError::InvalidUuid`] on failure.
fn parse_uuid(s: &str) -> Result<Uuid, ApiError> {
    s.parse::<Uuid>()
        .map_err(|e| ApiError::InvalidUuid(format!("{s}: {e}")))
}

/// List live notifications.
pub async fn list_notifications(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.notifications.list().await)
}

/// Add a notification. Responds `201 Created` with its id.
pub async fn create_notification(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewNotification>,
) -> Result<impl IntoResponse, ApiError> {
    if body.title.trim().is_empty() {
        return Err(ApiError::Validation(String::from("title must not be empty")));
    }
    let id = state
        .notifications
        .add(body.kind, body.title, body.message)
        .await;
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}

/// Dismiss a notification. Responds `204 No Content` whether or not it
/// was still present.
pub async fn dismiss_notification(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = NotificationId::from(parse_uuid(&id)?);
    let removed = state.notifications.remove(id).await;
    tracing::debug!(%id, removed, "dismiss requested");
    Ok(StatusCode::NO_CONTENT)
}
