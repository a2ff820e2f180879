//! Enumeration types for the utility portal.
//!
//! Wire names match the published dataset: lowercase for statuses and
//! news categories, capitalised for tariff categories.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Outages
// ---------------------------------------------------------------------------

/// Lifecycle status of a power outage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum OutageStatus {
    /// Planned work announced ahead of time.
    Scheduled,
    /// Supply is currently interrupted.
    Ongoing,
    /// Supply has been restored.
    Resolved,
}

impl OutageStatus {
    /// All statuses in display order.
    pub const ALL: [Self; 3] = [Self::Scheduled, Self::Ongoing, Self::Resolved];

    /// Wire name of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Ongoing => "ongoing",
            Self::Resolved => "resolved",
        }
    }

    /// Parse a status from its wire name (case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

// ---------------------------------------------------------------------------
// News
// ---------------------------------------------------------------------------

/// Editorial category of a news article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum NewsCategory {
    /// Pricing and tariff announcements.
    Tariffs,
    /// Grid, substation and transmission works.
    Infrastructure,
    /// Solar and other renewable generation.
    Renewable,
    /// Planned maintenance notices.
    Maintenance,
    /// Corporate news.
    Corporate,
}

impl NewsCategory {
    /// All categories in display order.
    pub const ALL: [Self; 5] = [
        Self::Tariffs,
        Self::Infrastructure,
        Self::Renewable,
        Self::Maintenance,
        Self::Corporate,
    ];

    /// Wire name of the category.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tariffs => "tariffs",
            Self::Infrastructure => "infrastructure",
            Self::Renewable => "renewable",
            Self::Maintenance => "maintenance",
            Self::Corporate => "corporate",
        }
    }

    /// Parse a category from its wire name (case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

// ---------------------------------------------------------------------------
// Tariffs
// ---------------------------------------------------------------------------

/// Customer class a tariff applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum TariffCategory {
    /// Domestic households.
    Residential,
    /// Shops, offices and small businesses.
    Commercial,
    /// Manufacturing and mining.
    Industrial,
}

impl TariffCategory {
    /// All categories in display order.
    pub const ALL: [Self; 3] = [Self::Residential, Self::Commercial, Self::Industrial];

    /// Wire name of the category.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Residential => "Residential",
            Self::Commercial => "Commercial",
            Self::Industrial => "Industrial",
        }
    }

    /// Parse a category from its wire name (case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

// ---------------------------------------------------------------------------
// System / accounts / notifications
// ---------------------------------------------------------------------------

/// Reported availability of the utility's systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum SystemStatus {
    /// Systems are available.
    Online,
    /// Systems are unavailable.
    Offline,
}

impl SystemStatus {
    /// Whether the status is [`SystemStatus::Online`].
    pub const fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }
}

/// Standing of a customer account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum AccountStatus {
    /// Account in good standing.
    Active,
    /// Supply suspended (e.g. for arrears).
    Suspended,
    /// Account closed.
    Closed,
}

/// Visual intent of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum NotificationKind {
    /// An operation succeeded.
    Success,
    /// Something needs attention but nothing failed.
    Warning,
    /// An operation failed.
    Error,
    /// Neutral information.
    Info,
}

/// Why a notification left the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum RemovalReason {
    /// Its lifetime elapsed.
    Expired,
    /// A consumer dismissed it.
    Dismissed,
}
