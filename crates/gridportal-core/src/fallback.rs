//! Static fallback dataset.
//!
//! [`FallbackStore`] holds the outage, news and tariff collections and the
//! customer template served whenever no live source is available. The
//! process-wide instance is built on first use by [`FallbackStore::global`]
//! and never mutated afterwards.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use gridportal_types::{
    AccountStatus, CustomerProfile, NewsArticle, NewsCategory, OutageRecord, OutageStatus,
    TariffCategory, TariffEntry,
};
use rust_decimal::Decimal;

/// Currency every fallback tariff and balance is denominated in.
pub const CURRENCY: &str = "ZMW";

static GLOBAL: LazyLock<FallbackStore> = LazyLock::new(FallbackStore::new);

/// Immutable snapshot of the four fallback collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackStore {
    outages: Vec<OutageRecord>,
    news: Vec<NewsArticle>,
    tariffs: Vec<TariffEntry>,
    customer: CustomerProfile,
}

impl FallbackStore {
    /// Build a fresh copy of the dataset.
    ///
    /// Application code should prefer [`FallbackStore::global`]; this
    /// constructor exists so tests can own an instance.
    pub fn new() -> Self {
        Self {
            outages: outages(),
            news: news(),
            tariffs: tariffs(),
            customer: customer_template(),
        }
    }

    /// The process-wide instance.
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Outage listing.
    pub fn outages(&self) -> &[OutageRecord] {
        &self.outages
    }

    /// News listing.
    pub fn news(&self) -> &[NewsArticle] {
        &self.news
    }

    /// Tariff schedule.
    pub fn tariffs(&self) -> &[TariffEntry] {
        &self.tariffs
    }

    /// Customer template. The account number is empty; callers fill it in.
    pub const fn customer_template(&self) -> &CustomerProfile {
        &self.customer
    }
}

impl Default for FallbackStore {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn timestamp(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    date(year, month, day)
        .and_hms_opt(hour, minute, 0)
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

fn outages() -> Vec<OutageRecord> {
    vec![
        OutageRecord {
            id: 1,
            area: String::from("Lusaka Central"),
            district: String::from("Lusaka"),
            start_time: timestamp(2024, 1, 15, 8, 0),
            end_time: timestamp(2024, 1, 15, 16, 0),
            reason: String::from("Planned maintenance on transmission lines"),
            status: OutageStatus::Scheduled,
            affected_customers: 15_000,
        },
        OutageRecord {
            id: 2,
            area: String::from("Ndola Industrial"),
            district: String::from("Ndola"),
            start_time: timestamp(2024, 1, 14, 14, 30),
            end_time: timestamp(2024, 1, 14, 18, 0),
            reason: String::from("Equipment failure at substation"),
            status: OutageStatus::Resolved,
            affected_customers: 8_500,
        },
        OutageRecord {
            id: 3,
            area: String::from("Kitwe Residential"),
            district: String::from("Kitwe"),
            start_time: timestamp(2024, 1, 16, 6, 0),
            end_time: timestamp(2024, 1, 16, 14, 0),
            reason: String::from("Transformer replacement"),
            status: OutageStatus::Ongoing,
            affected_customers: 12_000,
        },
    ]
}

fn news() -> Vec<NewsArticle> {
    vec![
        NewsArticle {
            id: 1,
            title: String::from("ZESCO Announces New Tariff Structure for 2024"),
            excerpt: String::from(
                "New electricity tariffs will be implemented starting February 2024 to improve service delivery.",
            ),
            content: String::from(
                "The Zambia Electricity Supply Corporation (ZESCO) has announced a new tariff structure \
                 that will come into effect from February 1, 2024. The new tariffs are designed to ensure \
                 sustainable electricity supply while maintaining affordability for consumers.",
            ),
            date: date(2024, 1, 10),
            category: NewsCategory::Tariffs,
            image: String::from(
                "https://images.unsplash.com/photo-1473341304170-971dccb5ac1e?w=800&h=400&fit=crop",
            ),
        },
        NewsArticle {
            id: 2,
            title: String::from("Major Infrastructure Upgrade Completed in Copperbelt"),
            excerpt: String::from(
                "ZESCO completes major transmission line upgrade improving power stability in mining areas.",
            ),
            content: String::from(
                "ZESCO has successfully completed a major infrastructure upgrade in the Copperbelt \
                 Province, installing new transmission lines and upgrading substations to improve power \
                 reliability for mining operations and residential areas.",
            ),
            date: date(2024, 1, 8),
            category: NewsCategory::Infrastructure,
            image: String::from(
                "https://images.unsplash.com/photo-1558618047-3c8c76ca7d13?w=800&h=400&fit=crop",
            ),
        },
        NewsArticle {
            id: 3,
            title: String::from("Solar Power Integration Project Launched"),
            excerpt: String::from(
                "ZESCO partners with renewable energy companies to integrate solar power into the national grid.",
            ),
            content: String::from(
                "In line with Zambia's commitment to renewable energy, ZESCO has launched a comprehensive \
                 solar power integration project that will add 200MW of clean energy to the national grid \
                 by 2025.",
            ),
            date: date(2024, 1, 5),
            category: NewsCategory::Renewable,
            image: String::from(
                "https://images.unsplash.com/photo-1509391366360-2e959784a276?w=800&h=400&fit=crop",
            ),
        },
    ]
}

fn tariff(
    id: u32,
    category: TariffCategory,
    subcategory: &str,
    rate: Decimal,
    description: &str,
) -> TariffEntry {
    TariffEntry {
        id,
        category,
        subcategory: String::from(subcategory),
        rate,
        currency: String::from(CURRENCY),
        unit: String::from("kWh"),
        effective_date: date(2024, 1, 1),
        description: String::from(description),
    }
}

fn tariffs() -> Vec<TariffEntry> {
    vec![
        tariff(
            1,
            TariffCategory::Residential,
            "Domestic (0-300 kWh)",
            Decimal::new(89, 2),
            "Standard residential tariff for monthly consumption up to 300 kWh",
        ),
        tariff(
            2,
            TariffCategory::Residential,
            "Domestic (301-800 kWh)",
            Decimal::new(115, 2),
            "Residential tariff for monthly consumption between 301-800 kWh",
        ),
        tariff(
            3,
            TariffCategory::Commercial,
            "Small Commercial",
            Decimal::new(145, 2),
            "Commercial tariff for small businesses and offices",
        ),
        tariff(
            4,
            TariffCategory::Industrial,
            "Large Industrial",
            Decimal::new(95, 2),
            "Industrial tariff for large manufacturing and mining operations",
        ),
    ]
}

fn customer_template() -> CustomerProfile {
    CustomerProfile {
        account_number: String::new(),
        name: String::from("John Doe"),
        address: String::from("123 Main Street, Lusaka"),
        current_balance: Decimal::new(25_050, 2),
        last_payment: date(2024, 1, 10),
        monthly_usage_kwh: Decimal::from(450_u32),
        status: AccountStatus::Active,
    }
}
