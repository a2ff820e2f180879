//! HTTP API server for the utility information portal.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **REST endpoints** for the session snapshot, filtered outages, news
//!   and tariffs, bill estimates and customer lookups
//! - **Notification endpoints** to list, add and dismiss transient
//!   notifications
//! - **Portal endpoints** for login, payments and the contact form
//! - **`WebSocket` endpoint** (`/ws/session`) streaming session states and
//!   notification events via [`tokio::sync::broadcast`]
//! - **Minimal HTML status page** (`GET /`)
//!
//! # Architecture
//!
//! Catalog reads are served from the [`AggregationSession`] snapshot, so
//! no request waits on the data source except the customer lookup and
//! login. Errors map to JSON bodies of the form
//! `{"error": ..., "status": ...}`.
//!
//! [`AggregationSession`]: gridportal_core::session::AggregationSession

pub mod error;
pub mod handlers;
pub mod notifications;
pub mod portal;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError};
pub use startup::{StartupError, spawn_api};
pub use state::AppState;
