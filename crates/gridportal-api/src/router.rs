//! Axum router construction for the portal API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled for the browser frontend.

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, notifications, portal, ws};

/// Build the complete Axum router for the portal server.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /ws/session` -- `WebSocket` session and notification stream
/// - `GET /api/session`, `POST /api/session/refresh` -- session snapshot and manual refresh
/// - `GET /api/outages`, `/api/news`, `/api/tariffs`, `/api/tariffs/estimate` -- catalog
/// - `GET /api/status` -- system status summary
/// - `GET /api/customer/{account_number}` -- customer lookup
/// - `GET|POST /api/notifications`, `DELETE /api/notifications/{id}` -- notification queue
/// - `POST /api/portal/login`, `/api/portal/payments`, `/api/contact` -- portal flows
///
/// Unknown paths get a JSON 404. CORS allows any origin.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws/session", get(ws::ws_session))
        // Session
        .route("/api/session", get(handlers::get_session))
        .route("/api/session/refresh", post(handlers::refresh_session))
        .route("/api/status", get(handlers::get_status))
        // Catalog
        .route("/api/outages", get(handlers::list_outages))
        .route("/api/news", get(handlers::list_news))
        .route("/api/tariffs", get(handlers::list_tariffs))
        .route("/api/tariffs/estimate", get(handlers::estimate_bill))
        .route("/api/customer/{account_number}", get(handlers::get_customer))
        // Notifications
        .route(
            "/api/notifications",
            get(notifications::list_notifications).post(notifications::create_notification),
        )
        .route(
            "/api/notifications/{id}",
            delete(notifications::dismiss_notification),
        )
        // Portal flows
        .route("/api/portal/login", post(portal::login))
        .route("/api/portal/payments", post(portal::pay))
        .route("/api/contact", post(portal::contact))
        .fallback(handlers::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
