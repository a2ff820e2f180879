//! The data-source seam.
//!
//! [`DataSource`] is the backend contract: one fallible retrieval per
//! endpoint. The aggregation session and the customer lookup talk only to
//! this trait, so a networked client can replace [`FallbackSource`]
//! without touching either.

use futures::FutureExt;
use futures::future::BoxFuture;
use gridportal_types::{CustomerProfile, NewsArticle, OutageRecord, SystemStatus, TariffEntry};
use tracing::debug;

use crate::fallback::FallbackStore;
use crate::simulator::RequestSimulator;

/// Endpoint path of the outage listing.
pub const OUTAGES_ENDPOINT: &str = "/outages";
/// Endpoint path of the news listing.
pub const NEWS_ENDPOINT: &str = "/news";
/// Endpoint path of the tariff schedule.
pub const TARIFFS_ENDPOINT: &str = "/tariffs";
/// Endpoint path of the system status.
pub const STATUS_ENDPOINT: &str = "/status";

/// Errors a retrieval can fail with.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// The request did not complete in time.
    #[error("request to {endpoint} timed out")]
    Timeout {
        /// Endpoint path.
        endpoint: String,
    },

    /// The backend answered with a non-success status.
    #[error("request to {endpoint} failed with status {code}")]
    Status {
        /// Endpoint path.
        endpoint: String,
        /// HTTP status code.
        code: u16,
    },

    /// The response body could not be decoded.
    #[error("malformed response from {endpoint}: {message}")]
    Malformed {
        /// Endpoint path.
        endpoint: String,
        /// Decoder message.
        message: String,
    },

    /// The backend could not be reached.
    #[error("{endpoint} unavailable: {message}")]
    Unavailable {
        /// Endpoint path.
        endpoint: String,
        /// Transport message.
        message: String,
    },
}

impl SourceError {
    /// The endpoint path the failure is tagged with.
    pub fn endpoint(&self) -> &str {
        match self {
            Self::Timeout { endpoint }
            | Self::Status { endpoint, .. }
            | Self::Malformed { endpoint, .. }
            | Self::Unavailable { endpoint, .. } => endpoint,
        }
    }
}

/// A fallible provider of the portal's data.
///
/// Methods return boxed futures so the trait stays object-safe and can be
/// shared as `Arc<dyn DataSource>`.
pub trait DataSource: Send + Sync {
    /// Retrieve the outage listing.
    fn outages(&self) -> BoxFuture<'_, Result<Vec<OutageRecord>, SourceError>>;

    /// Retrieve the news listing.
    fn news(&self) -> BoxFuture<'_, Result<Vec<NewsArticle>, SourceError>>;

    /// Retrieve the tariff schedule.
    fn tariffs(&self) -> BoxFuture<'_, Result<Vec<TariffEntry>, SourceError>>;

    /// Retrieve the reported system availability.
    fn system_status(&self) -> BoxFuture<'_, Result<SystemStatus, SourceError>>;

    /// Look up a customer by account number.
    fn customer(&self, account_number: &str)
    -> BoxFuture<'_, Result<CustomerProfile, SourceError>>;
}

/// Serves the static dataset behind a simulated delay.
#[derive(Debug, Clone, Copy)]
pub struct FallbackSource {
    store: &'static FallbackStore,
    simulator: RequestSimulator,
}

impl FallbackSource {
    /// Create a source over the process-wide store.
    pub fn new(simulator: RequestSimulator) -> Self {
        Self {
            store: FallbackStore::global(),
            simulator,
        }
    }
}

impl Default for FallbackSource {
    fn default() -> Self {
        Self::new(RequestSimulator::default())
    }
}

impl DataSource for FallbackSource {
    fn outages(&self) -> BoxFuture<'_, Result<Vec<OutageRecord>, SourceError>> {
        async move {
            self.simulator
                .simulate(OUTAGES_ENDPOINT, self.store.outages().to_vec())
                .await
        }
        .boxed()
    }

    fn news(&self) -> BoxFuture<'_, Result<Vec<NewsArticle>, SourceError>> {
        async move {
            self.simulator
                .simulate(NEWS_ENDPOINT, self.store.news().to_vec())
                .await
        }
        .boxed()
    }

    fn tariffs(&self) -> BoxFuture<'_, Result<Vec<TariffEntry>, SourceError>> {
        async move {
            self.simulator
                .simulate(TARIFFS_ENDPOINT, self.store.tariffs().to_vec())
                .await
        }
        .boxed()
    }

    fn system_status(&self) -> BoxFuture<'_, Result<SystemStatus, SourceError>> {
        async move {
            self.simulator
                .simulate(STATUS_ENDPOINT, SystemStatus::Online)
                .await
        }
        .boxed()
    }

    fn customer(
        &self,
        account_number: &str,
    ) -> BoxFuture<'_, Result<CustomerProfile, SourceError>> {
        let account_number = account_number.to_owned();
        async move {
            debug!(%account_number, "customer lookup");
            let endpoint = format!("/customer/{account_number}");
            let profile = CustomerProfile {
                account_number,
                ..self.store.customer_template().clone()
            };
            self.simulator.simulate(&endpoint, profile).await
        }
        .boxed()
    }
}
