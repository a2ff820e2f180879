//! Shared application state for the API server.
//!
//! [`AppState`] bundles the handles the handlers need: the aggregation
//! session for catalog reads and refreshes, the notification queue every
//! portal flow reports into, and the data source for customer lookups.

use std::sync::Arc;

use gridportal_core::notifications::NotificationQueue;
use gridportal_core::session::AggregationSession;
use gridportal_core::source::DataSource;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// The application's single aggregation session.
    pub session: Arc<AggregationSession>,
    /// Transient notifications shown to the user.
    pub notifications: NotificationQueue,
    /// Backend used for customer lookups.
    pub source: Arc<dyn DataSource>,
}

impl AppState {
    /// Bundle the running components into application state.
    pub fn new(
        session: Arc<AggregationSession>,
        notifications: NotificationQueue,
        source: Arc<dyn DataSource>,
    ) -> Self {
        Self {
            session,
            notifications,
            source,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("session", &self.session)
            .field("notifications", &self.notifications)
            .finish_non_exhaustive()
    }
}
