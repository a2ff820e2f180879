//! REST API endpoint handlers for the session and catalog.
//!
//! Catalog reads are served from the aggregation session's snapshot, so
//! they never wait on the data source. Customer lookups go to the source.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | HTML status page |
//! | `GET` | `/api/session` | Full session snapshot |
//! | `POST` | `/api/session/refresh` | Manual refresh |
//! | `GET` | `/api/outages` | Outages (`?search=&status=`) |
//! | `GET` | `/api/news` | News (`?search=&category=`) |
//! | `GET` | `/api/tariffs` | Tariffs (`?category=`) |
//! | `GET` | `/api/tariffs/estimate` | Bill estimate (`?category=&usage=`) |
//! | `GET` | `/api/status` | System status summary |
//! | `GET` | `/api/customer/{account_number}` | Customer lookup |

use std::str::FromStr;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::Uri;
use axum::response::{Html, IntoResponse};
use chrono::{DateTime, Utc};
use gridportal_core::billing;
use gridportal_core::filters::{self, NewsQuery, OutageQuery};
use gridportal_types::{
    NewsCategory, OutageStatus, RefreshOutcome, SessionState, SystemStatus, TariffCategory,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

/// Query parameters for the `GET /api/outages` endpoint.
#[derive(Debug, Deserialize)]
pub struct OutagesParams {
    /// Substring matched against area and district.
    pub search: Option<String>,
    /// Status filter: `scheduled`, `ongoing`, `resolved` or `all`.
    pub status: Option<String>,
}

/// Query parameters for the `GET /api/news` endpoint.
#[derive(Debug, Deserialize)]
pub struct NewsParams {
    /// Substring matched against title and excerpt.
    pub search: Option<String>,
    /// Category filter, or `all`.
    pub category: Option<String>,
}

/// Query parameters for the `GET /api/tariffs` endpoint.
#[derive(Debug, Deserialize)]
pub struct TariffsParams {
    /// Category filter, or `all`.
    pub category: Option<String>,
}

/// Query parameters for the `GET /api/tariffs/estimate` endpoint.
#[derive(Debug, Deserialize)]
pub struct EstimateParams {
    /// Customer class (default: `residential`).
    pub category: Option<String>,
    /// Monthly consumption in kWh.
    pub usage: Option<String>,
}

/// Body of the `GET /api/status` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Reported system availability.
    pub system_status: SystemStatus,
    /// When the data was last committed.
    pub last_updated: DateTime<Utc>,
    /// Whether a refresh is in flight.
    pub loading: bool,
    /// Failure message of the last refresh, if it failed.
    pub error: Option<String>,
    /// Number of outages in progress.
    pub active_outages: usize,
}

/// Parse an optional filter value. Empty and `all` mean no filter.
fn parse_filter<T>(
    raw: Option<&str>,
    name: &str,
    parse: fn(&str) -> Option<T>,
) -> Result<Option<T>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) if value.eq_ignore_ascii_case("all") => Ok(None),
        Some(value) => parse(value)
            .map(Some)
            .ok_or_else(|| ApiError::InvalidQuery(format!("unknown {name}: {value}"))),
    }
}

// ---------------------------------------------------------------------------
// GET / -- HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing system status and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.session.snapshot().await;
    let status = if snapshot.system_status.is_online() {
        "ONLINE"
    } else {
        "OFFLINE"
    };
    let outage_count = snapshot.outages.len();
    let active_outages = snapshot.active_outage_count();
    let news_count = snapshot.news.len();
    let tariff_count = snapshot.tariffs.len();
    let last_updated = snapshot.last_updated.format("%Y-%m-%d %H:%M:%S UTC");
    let refresh = if snapshot.loading {
        String::from("refreshing")
    } else {
        snapshot
            .error
            .as_deref()
            .map_or_else(|| String::from("idle"), |e| format!("last refresh failed: {e}"))
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Grid Portal</title>
    <style>
        body {{
            background: #f8fafc;
            color: #1e293b;
            font-family: system-ui, -apple-system, 'Segoe UI', sans-serif;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #c2410c; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #64748b; margin-top: 0; }}
        .metric {{
            display: inline-block;
            background: #ffffff;
            border: 1px solid #e2e8f0;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #64748b; font-size: 0.85rem; }}
        .metric .value {{ color: #c2410c; font-size: 1.5rem; font-weight: bold; }}
        a {{ color: #1d4ed8; text-decoration: none; }}
        a:hover {{ text-decoration: underline; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        .status {{ color: #15803d; font-weight: bold; }}
        hr {{ border: none; border-top: 1px solid #e2e8f0; margin: 1.5rem 0; }}
    </style>
</head>
<body>
    <h1>Grid Portal</h1>
    <p class="subtitle">Outages, tariffs and news for electricity customers</p>

    <p>System: <span class="status">{status}</span> &middot; Session: {refresh}</p>
    <p>Last updated: {last_updated}</p>

    <div>
        <div class="metric">
            <div class="label">Outages</div>
            <div class="value">{outage_count}</div>
        </div>
        <div class="metric">
            <div class="label">Active outages</div>
            <div class="value">{active_outages}</div>
        </div>
        <div class="metric">
            <div class="label">News</div>
            <div class="value">{news_count}</div>
        </div>
        <div class="metric">
            <div class="label">Tariffs</div>
            <div class="value">{tariff_count}</div>
        </div>
    </div>

    <hr>

    <h2>API Endpoints</h2>
    <ul>
        <li><a href="/api/session">/api/session</a> -- Full session snapshot</li>
        <li><a href="/api/status">/api/status</a> -- System status summary</li>
        <li><a href="/api/outages">/api/outages</a> -- Outages (?search=X&amp;status=ongoing)</li>
        <li><a href="/api/news">/api/news</a> -- News (?search=X&amp;category=tariffs)</li>
        <li><a href="/api/tariffs">/api/tariffs</a> -- Tariffs (?category=residential)</li>
        <li><a href="/api/tariffs/estimate?usage=450">/api/tariffs/estimate</a> -- Bill estimate (?category=X&amp;usage=N)</li>
        <li><a href="/api/notifications">/api/notifications</a> -- Live notifications</li>
    </ul>

    <h2>WebSocket</h2>
    <ul>
        <li><code>ws://host:port/ws/session</code> -- Session and notification stream</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Return the full session snapshot.
pub async fn get_session(State(state): State<Arc<AppState>>) -> Json<SessionState> {
    Json(state.session.snapshot().await)
}

/// Run a manual refresh and report its outcome.
///
/// A refresh already in flight yields `skipped`; a failed refresh is
/// reported in the body, not as an HTTP error.
pub async fn refresh_session(State(state): State<Arc<AppState>>) -> Json<RefreshOutcome> {
    let outcome = state.session.refresh().await;
    info!(?outcome, "manual refresh requested");
    Json(outcome)
}

/// Summarise system availability and refresh state.
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let snapshot = state.session.snapshot().await;
    Json(StatusResponse {
        system_status: snapshot.system_status,
        last_updated: snapshot.last_updated,
        loading: snapshot.loading,
        active_outages: snapshot.active_outage_count(),
        error: snapshot.error,
    })
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// List outages, optionally filtered.
///
/// # Query Parameters
///
/// - `search`: substring of area or district (case-insensitive)
/// - `status`: `scheduled` | `ongoing` | `resolved` | `all` (default: `all`)
pub async fn list_outages(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OutagesParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = OutageQuery {
        status: parse_filter(params.status.as_deref(), "status", OutageStatus::parse)?,
        search: params.search,
    };
    let snapshot = state.session.snapshot().await;
    Ok(Json(query.apply(&snapshot.outages)))
}

/// List news articles, optionally filtered.
pub async fn list_news(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NewsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = NewsQuery {
        category: parse_filter(params.category.as_deref(), "category", NewsCategory::parse)?,
        search: params.search,
    };
    let snapshot = state.session.snapshot().await;
    Ok(Json(query.apply(&snapshot.news)))
}

/// List tariffs, optionally filtered by category.
pub async fn list_tariffs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TariffsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let category = parse_filter(
        params.category.as_deref(),
        "category",
        TariffCategory::parse,
    )?;
    let snapshot = state.session.snapshot().await;
    Ok(Json(filters::filter_tariffs(&snapshot.tariffs, category)))
}

/// Estimate a monthly bill from the current tariff schedule.
pub async fn estimate_bill(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EstimateParams>,
) -> Result<impl IntoResponse, ApiError> {
    let category = parse_filter(
        params.category.as_deref(),
        "category",
        TariffCategory::parse,
    )?
    .unwrap_or(TariffCategory::Residential);

    let raw_usage = params
        .usage
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::InvalidQuery(String::from("usage is required")))?;
    let usage = Decimal::from_str(raw_usage)
        .map_err(|e| ApiError::InvalidQuery(format!("invalid usage '{raw_usage}': {e}")))?;

    let snapshot = state.session.snapshot().await;
    let estimate = billing::estimate_bill(category, usage, &snapshot.tariffs)?;
    Ok(Json(estimate))
}

// ---------------------------------------------------------------------------
// Customer
// ---------------------------------------------------------------------------

/// Look up a customer profile through the data source.
pub async fn get_customer(
    State(state): State<Arc<AppState>>,
    Path(account_number): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let account_number = account_number.trim();
    if account_number.is_empty() {
        return Err(ApiError::InvalidQuery(String::from(
            "account number is required",
        )));
    }
    let profile = state.source.customer(account_number).await?;
    Ok(Json(profile))
}

// ---------------------------------------------------------------------------
// Fallback
// ---------------------------------------------------------------------------

/// JSON 404 for unknown routes.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("no route for {}", uri.path()))
}
