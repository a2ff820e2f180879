//! Core record and state structs.
//!
//! Catalog records (outages, news, tariffs) are immutable once built.
//! [`SessionState`] is the consolidated view republished by the
//! aggregation session; [`Notification`] is a transient status message.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{
    AccountStatus, NewsCategory, NotificationKind, OutageStatus, RemovalReason, SystemStatus,
    TariffCategory,
};
use crate::ids::{NotificationId, PaymentReference};

// ---------------------------------------------------------------------------
// Catalog records
// ---------------------------------------------------------------------------

/// A planned or unplanned interruption of supply to an area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct OutageRecord {
    /// Record identifier.
    pub id: u32,
    /// Affected area name.
    pub area: String,
    /// District the area belongs to.
    pub district: String,
    /// When supply is (or was) interrupted.
    pub start_time: DateTime<Utc>,
    /// When supply is expected to be (or was) restored.
    pub end_time: DateTime<Utc>,
    /// Free-text cause.
    pub reason: String,
    /// Lifecycle status.
    pub status: OutageStatus,
    /// Number of customers without supply.
    pub affected_customers: u32,
}

/// A published news item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NewsArticle {
    /// Record identifier.
    pub id: u32,
    /// Headline.
    pub title: String,
    /// Short summary shown in listings.
    pub excerpt: String,
    /// Full body text.
    pub content: String,
    /// Publication date.
    pub date: NaiveDate,
    /// Editorial category.
    pub category: NewsCategory,
    /// URI of the lead image.
    pub image: String,
}

/// One line of the published tariff schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TariffEntry {
    /// Record identifier.
    pub id: u32,
    /// Customer class.
    pub category: TariffCategory,
    /// Band or customer sub-class label.
    pub subcategory: String,
    /// Price per unit.
    #[ts(as = "String")]
    pub rate: Decimal,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Billing unit (e.g. `kWh`).
    pub unit: String,
    /// Date from which the rate applies.
    pub effective_date: NaiveDate,
    /// Human-readable description.
    pub description: String,
}

// ---------------------------------------------------------------------------
// Customer
// ---------------------------------------------------------------------------

/// Account view shown in the self-service portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CustomerProfile {
    /// Account number as entered by the customer.
    pub account_number: String,
    /// Account holder name.
    pub name: String,
    /// Supply address.
    pub address: String,
    /// Outstanding balance.
    #[ts(as = "String")]
    pub current_balance: Decimal,
    /// Date of the most recent payment.
    pub last_payment: NaiveDate,
    /// Consumption over the current month in kWh.
    #[ts(as = "String")]
    pub monthly_usage_kwh: Decimal,
    /// Account standing.
    pub status: AccountStatus,
}

impl CustomerProfile {
    /// Average daily consumption over a 30-day month, to one decimal place.
    pub fn average_daily_usage_kwh(&self) -> Decimal {
        self.monthly_usage_kwh
            .checked_div(Decimal::from(30_u32))
            .unwrap_or_default()
            .round_dp(1)
    }
}

/// Confirmation of an accepted bill payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PaymentReceipt {
    /// Confirmation reference.
    pub reference: PaymentReference,
    /// Account the payment was made against.
    pub account_number: String,
    /// Amount paid, in kwacha.
    #[ts(as = "String")]
    pub amount: Decimal,
    /// When the payment was accepted.
    pub processed_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Consolidated view owned by the aggregation session.
///
/// The four data fields are always replaced together. `loading` is true
/// only while a refresh is in flight; `error` holds the message of the
/// most recent failed refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SessionState {
    /// Current outage listing.
    pub outages: Vec<OutageRecord>,
    /// Current news listing.
    pub news: Vec<NewsArticle>,
    /// Current tariff schedule.
    pub tariffs: Vec<TariffEntry>,
    /// Reported system availability.
    pub system_status: SystemStatus,
    /// When the data fields were last committed.
    pub last_updated: DateTime<Utc>,
    /// Whether a refresh is in flight.
    pub loading: bool,
    /// Failure message of the most recent refresh, if it failed.
    pub error: Option<String>,
}

impl SessionState {
    /// Empty state with the given timestamp, as held before the first refresh.
    pub const fn empty(now: DateTime<Utc>) -> Self {
        Self {
            outages: Vec::new(),
            news: Vec::new(),
            tariffs: Vec::new(),
            system_status: SystemStatus::Online,
            last_updated: now,
            loading: false,
            error: None,
        }
    }

    /// Number of outages currently in progress.
    pub fn active_outage_count(&self) -> usize {
        self.outages
            .iter()
            .filter(|o| o.status == OutageStatus::Ongoing)
            .count()
    }
}

/// Result of a single refresh request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "outcome", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum RefreshOutcome {
    /// All retrievals succeeded and the state was replaced.
    Committed {
        /// The committed `last_updated` timestamp.
        last_updated: DateTime<Utc>,
    },
    /// At least one retrieval failed; prior data was kept.
    Failed {
        /// The recorded failure message.
        message: String,
    },
    /// Another refresh was already in flight.
    Skipped,
    /// The session was torn down; nothing was committed.
    Discarded,
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// A short-lived, user-visible status message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Notification {
    /// Time-ordered identifier.
    pub id: NotificationId,
    /// Visual intent.
    pub kind: NotificationKind,
    /// Headline.
    pub title: String,
    /// Optional detail text.
    pub message: Option<String>,
    /// When the notification was added.
    pub created_at: DateTime<Utc>,
}

/// A change to the notification queue, published to display collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum NotificationEvent {
    /// A notification was appended.
    Added {
        /// The new notification.
        notification: Notification,
    },
    /// A notification left the queue.
    Removed {
        /// Identifier of the removed notification.
        id: NotificationId,
        /// Expiry or dismissal.
        reason: RemovalReason,
    },
}

// ---------------------------------------------------------------------------
// Billing
// ---------------------------------------------------------------------------

/// One priced band of a bill estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BillLine {
    /// Lower bound of the band in kWh (exclusive, 0 for the first band).
    #[ts(as = "String")]
    pub from_kwh: Decimal,
    /// Upper bound of the band in kWh, `None` when open-ended.
    #[ts(as = "Option<String>")]
    pub to_kwh: Option<Decimal>,
    /// Consumption billed in this band.
    #[ts(as = "String")]
    pub kwh: Decimal,
    /// Price per kWh.
    #[ts(as = "String")]
    pub rate: Decimal,
    /// `kwh * rate`.
    #[ts(as = "String")]
    pub amount: Decimal,
}

/// Estimated bill for a month's consumption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BillEstimate {
    /// Customer class the estimate was computed for.
    pub category: TariffCategory,
    /// Consumption in kWh.
    #[ts(as = "String")]
    pub usage_kwh: Decimal,
    /// Priced bands making up the total.
    pub lines: Vec<BillLine>,
    /// Total rounded to two decimal places.
    #[ts(as = "String")]
    pub total: Decimal,
    /// ISO 4217 currency code.
    pub currency: String,
}
