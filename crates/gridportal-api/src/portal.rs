//! Customer portal endpoints.
//!
//! Each handler runs the matching flow from [`gridportal_core::portal`],
//! which also posts the user-facing notification. The HTTP response
//! carries the typed result.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/portal/login` | Look up and return the customer profile |
//! | `POST` | `/api/portal/payments` | Accept a bill payment |
//! | `POST` | `/api/contact` | Submit the contact form |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use gridportal_core::portal::{self, ContactForm};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for `POST /api/portal/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Account number as typed by the customer.
    #[serde(default)]
    pub account_number: String,
}

/// Request body for `POST /api/portal/payments`.
#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    /// Account of the logged-in customer.
    #[serde(default)]
    pub account_number: String,
    /// Amount to pay, in kwacha.
    pub amount: Option<Decimal>,
}

/// Run the login flow.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = portal::login(
        state.source.as_ref(),
        &state.notifications,
        &body.account_number,
    )
    .await?;
    Ok(Json(profile))
}

/// Run the payment flow for the account in the request.
pub async fn pay(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account_number = body.account_number.trim();
    if account_number.is_empty() {
        return Err(portal::PortalError::NotLoggedIn.into());
    }
    let receipt =
        portal::process_payment(&state.notifications, account_number, body.amount).await?;
    Ok(Json(receipt))
}

/// Run the contact form flow.
pub async fn contact(
    State(state): State<Arc<AppState>>,
    Json(form): Json<ContactForm>,
) -> Result<impl IntoResponse, ApiError> {
    portal::submit_contact(&state.notifications, &form).await?;
    Ok(Json(serde_json::json!({ "status": "sent" })))
}
