//! Customer portal flows: login, bill payment and the contact form.
//!
//! Every flow reports its outcome on the [`NotificationQueue`] and returns
//! a typed result. Validation failures stay here; they never reach the
//! aggregation session.

use chrono::Utc;
use gridportal_types::{CustomerProfile, NotificationKind, PaymentReceipt, PaymentReference};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use validator::Validate;

use crate::notifications::NotificationQueue;
use crate::source::{DataSource, SourceError};

/// Contact form fields checked for presence, in display order.
const REQUIRED_CONTACT_FIELDS: [&str; 4] = ["name", "email", "subject", "message"];

/// Errors from the portal flows.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    /// Login was attempted without an account number.
    #[error("account number is required")]
    MissingAccountNumber,

    /// The customer lookup failed.
    #[error("customer lookup failed: {source}")]
    Lookup {
        /// The underlying retrieval error.
        #[from]
        source: SourceError,
    },

    /// The payment amount was missing, zero or negative.
    #[error("payment amount must be greater than zero")]
    InvalidAmount,

    /// A payment was attempted without a logged-in customer.
    #[error("no customer is logged in")]
    NotLoggedIn,

    /// Required contact form fields were empty.
    #[error("missing required fields: {}", .fields.join(", "))]
    MissingFields {
        /// Names of the empty fields, in form order.
        fields: Vec<&'static str>,
    },
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Look up a customer and report the outcome.
pub async fn login(
    source: &dyn DataSource,
    notifications: &NotificationQueue,
    account_number: &str,
) -> Result<CustomerProfile, PortalError> {
    let account_number = account_number.trim();
    if account_number.is_empty() {
        notifications
            .add(
                NotificationKind::Error,
                "Error",
                Some(String::from("Please enter your account number")),
            )
            .await;
        return Err(PortalError::MissingAccountNumber);
    }

    match source.customer(account_number).await {
        Ok(profile) => {
            info!(account_number, "customer logged in");
            notifications
                .add(
                    NotificationKind::Success,
                    "Login Successful",
                    Some(String::from("Welcome to your customer portal")),
                )
                .await;
            Ok(profile)
        }
        Err(err) => {
            warn!(account_number, error = %err, "customer login failed");
            notifications
                .add(
                    NotificationKind::Error,
                    "Login Failed",
                    Some(String::from(
                        "Please check your account number and try again",
                    )),
                )
                .await;
            Err(err.into())
        }
    }
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

/// Accept a payment against `account_number` and report the outcome.
pub async fn process_payment(
    notifications: &NotificationQueue,
    account_number: &str,
    amount: Option<Decimal>,
) -> Result<PaymentReceipt, PortalError> {
    let Some(amount) = amount.filter(|a| *a > Decimal::ZERO) else {
        notifications
            .add(
                NotificationKind::Error,
                "Invalid Amount",
                Some(String::from("Please enter a valid payment amount")),
            )
            .await;
        return Err(PortalError::InvalidAmount);
    };

    let receipt = PaymentReceipt {
        reference: PaymentReference::new(),
        account_number: account_number.to_owned(),
        amount,
        processed_at: Utc::now(),
    };
    info!(
        account_number,
        %amount,
        reference = %receipt.reference,
        "payment accepted"
    );
    notifications
        .add(
            NotificationKind::Success,
            "Payment Successful",
            Some(format!(
                "Payment of K{amount} has been processed successfully"
            )),
        )
        .await;
    Ok(receipt)
}

/// A single visitor's portal session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PortalSession {
    /// No customer is logged in.
    #[default]
    LoggedOut,
    /// A customer is logged in.
    LoggedIn {
        /// The profile returned by the lookup.
        customer: CustomerProfile,
    },
}

impl PortalSession {
    /// The logged-in customer, if any.
    pub const fn customer(&self) -> Option<&CustomerProfile> {
        match self {
            Self::LoggedOut => None,
            Self::LoggedIn { customer } => Some(customer),
        }
    }

    /// Log in. On failure the session is left logged out.
    pub async fn login(
        &mut self,
        source: &dyn DataSource,
        notifications: &NotificationQueue,
        account_number: &str,
    ) -> Result<&CustomerProfile, PortalError> {
        *self = Self::LoggedOut;
        let customer = login(source, notifications, account_number).await?;
        *self = Self::LoggedIn { customer };
        self.customer().ok_or(PortalError::NotLoggedIn)
    }

    /// Pay against the logged-in account.
    pub async fn pay(
        &self,
        notifications: &NotificationQueue,
        amount: Option<Decimal>,
    ) -> Result<PaymentReceipt, PortalError> {
        let customer = self.customer().ok_or(PortalError::NotLoggedIn)?;
        process_payment(notifications, &customer.account_number, amount).await
    }

    /// Return to the logged-out state.
    pub fn logout(&mut self) {
        *self = Self::LoggedOut;
    }
}

// ---------------------------------------------------------------------------
// Contact form
// ---------------------------------------------------------------------------

/// A message submitted through the contact page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ContactForm {
    /// Sender name.
    #[serde(default)]
    #[validate(length(min = 1))]
    pub name: String,
    /// Reply address.
    #[serde(default)]
    #[validate(length(min = 1))]
    pub email: String,
    /// Optional phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Subject line.
    #[serde(default)]
    #[validate(length(min = 1))]
    pub subject: String,
    /// Message body.
    #[serde(default)]
    #[validate(length(min = 1))]
    pub message: String,
}

impl ContactForm {
    /// Names of required fields that are empty, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => {
                let failed = errors.field_errors();
                REQUIRED_CONTACT_FIELDS
                    .into_iter()
                    .filter(|field| failed.contains_key(*field))
                    .collect()
            }
        }
    }
}

/// Validate and accept a contact form, reporting the outcome.
pub async fn submit_contact(
    notifications: &NotificationQueue,
    form: &ContactForm,
) -> Result<(), PortalError> {
    let fields = form.missing_fields();
    if !fields.is_empty() {
        debug!(?fields, "contact form incomplete");
        notifications
            .add(
                NotificationKind::Error,
                "Missing Information",
                Some(format!(
                    "Please fill in the required fields: {}",
                    fields.join(", ")
                )),
            )
            .await;
        return Err(PortalError::MissingFields { fields });
    }

    info!(subject = %form.subject, "contact message received");
    notifications
        .add(
            NotificationKind::Success,
            "Message Sent",
            Some(String::from(
                "Your message has been sent successfully. We will respond within 24 hours.",
            )),
        )
        .await;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use futures::FutureExt;
    use futures::future::BoxFuture;
    use gridportal_types::{NewsArticle, OutageRecord, SystemStatus, TariffEntry};

    use super::*;
    use crate::simulator::RequestSimulator;
    use crate::source::FallbackSource;

    /// Source whose customer lookup always fails.
    struct UnreachableSource;

    impl DataSource for UnreachableSource {
        fn outages(&self) -> BoxFuture<'_, Result<Vec<OutageRecord>, SourceError>> {
            async { Ok(Vec::new()) }.boxed()
        }

        fn news(&self) -> BoxFuture<'_, Result<Vec<NewsArticle>, SourceError>> {
            async { Ok(Vec::new()) }.boxed()
        }

        fn tariffs(&self) -> BoxFuture<'_, Result<Vec<TariffEntry>, SourceError>> {
            async { Ok(Vec::new()) }.boxed()
        }

        fn system_status(&self) -> BoxFuture<'_, Result<SystemStatus, SourceError>> {
            async { Ok(SystemStatus::Offline) }.boxed()
        }

        fn customer(
            &self,
            account_number: &str,
        ) -> BoxFuture<'_, Result<CustomerProfile, SourceError>> {
            let endpoint = format!("/customer/{account_number}");
            async move {
                Err(SourceError::Unavailable {
                    endpoint,
                    message: String::from("connection refused"),
                })
            }
            .boxed()
        }
    }

    fn fast_source() -> FallbackSource {
        FallbackSource::new(RequestSimulator::new(Duration::from_millis(5)))
    }

    #[tokio::test(start_paused = true)]
    async fn empty_account_number_skips_lookup() {
        let queue = NotificationQueue::default();
        let result = login(&UnreachableSource, &queue, "   ").await;
        assert!(matches!(result, Err(PortalError::MissingAccountNumber)));

        let list = queue.list().await;
        assert_eq!(list.len(), 1);
        let note = list.first().unwrap();
        assert_eq!(note.kind, NotificationKind::Error);
        assert_eq!(note.title, "Error");
        assert_eq!(
            note.message.as_deref(),
            Some("Please enter your account number")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failed_lookup_stays_logged_out() {
        let queue = NotificationQueue::default();
        let mut session = PortalSession::default();
        let result = session.login(&UnreachableSource, &queue, "1001").await;
        assert!(matches!(result, Err(PortalError::Lookup { .. })));
        assert!(session.customer().is_none());
        assert_eq!(queue.list().await.first().unwrap().title, "Login Failed");
    }

    #[tokio::test(start_paused = true)]
    async fn successful_login_holds_profile() {
        let queue = NotificationQueue::default();
        let mut session = PortalSession::default();
        let profile = session
            .login(&fast_source(), &queue, "ACC-42")
            .await
            .unwrap()
            .clone();
        assert_eq!(profile.account_number, "ACC-42");
        assert_eq!(session.customer(), Some(&profile));

        let note = queue.list().await.first().cloned().unwrap();
        assert_eq!(note.kind, NotificationKind::Success);
        assert_eq!(note.title, "Login Successful");

        session.logout();
        assert_eq!(session, PortalSession::LoggedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn payment_requires_login() {
        let queue = NotificationQueue::default();
        let session = PortalSession::default();
        let result = session.pay(&queue, Some(Decimal::from(100))).await;
        assert!(matches!(result, Err(PortalError::NotLoggedIn)));
        assert!(queue.list().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn non_positive_amount_is_rejected() {
        let queue = NotificationQueue::default();
        for amount in [None, Some(Decimal::ZERO), Some(Decimal::from(-5))] {
            let result = process_payment(&queue, "1001", amount).await;
            assert!(matches!(result, Err(PortalError::InvalidAmount)));
        }
        let titles: Vec<_> = queue.list().await.into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["Invalid Amount"; 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn payment_message_quotes_amount() {
        let queue = NotificationQueue::default();
        let mut session = PortalSession::default();
        session.login(&fast_source(), &queue, "1001").await.unwrap();

        let receipt = session
            .pay(&queue, Some(Decimal::new(15_050, 2)))
            .await
            .unwrap();
        assert_eq!(receipt.account_number, "1001");
        assert_eq!(receipt.amount, Decimal::new(15_050, 2));

        let last = queue.list().await.last().cloned().unwrap();
        assert_eq!(last.title, "Payment Successful");
        assert_eq!(
            last.message.as_deref(),
            Some("Payment of K150.50 has been processed successfully")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn contact_form_lists_missing_fields() {
        let queue = NotificationQueue::default();
        let form = ContactForm {
            name: String::from("Mwila"),
            subject: String::from("Billing"),
            ..ContactForm::default()
        };
        let result = submit_contact(&queue, &form).await;
        assert!(matches!(
            &result,
            Err(PortalError::MissingFields { fields }) if *fields == ["email", "message"]
        ));
        let note = queue.list().await.first().cloned().unwrap();
        assert_eq!(note.title, "Missing Information");
    }

    #[tokio::test(start_paused = true)]
    async fn complete_contact_form_is_accepted_and_expires() {
        let queue = NotificationQueue::default();
        let form = ContactForm {
            name: String::from("Mwila"),
            email: String::from("mwila@example.com"),
            phone: None,
            subject: String::from("Billing"),
            message: String::from("Please check my last bill."),
        };
        submit_contact(&queue, &form).await.unwrap();

        let list = queue.list().await;
        assert_eq!(list.len(), 1);
        assert_eq!(list.first().unwrap().title, "Message Sent");

        tokio::time::sleep(Duration::from_millis(5100)).await;
        assert!(queue.list().await.is_empty());
    }
}
