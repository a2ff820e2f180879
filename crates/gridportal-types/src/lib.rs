//! Shared type definitions for the utility information portal.
//!
//! This crate is the single source of truth for every type that crosses a
//! crate boundary or reaches the browser. Types flow downstream to
//! `TypeScript` via `ts-rs` for the web frontend.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for runtime-generated identifiers
//! - [`enums`] -- Statuses, categories and notification kinds
//! - [`structs`] -- Catalog records, customer profile, session state,
//!   notifications and bill estimates

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    AccountStatus, NewsCategory, NotificationKind, OutageStatus, RemovalReason, SystemStatus,
    TariffCategory,
};
pub use ids::{NotificationId, PaymentReference};
pub use structs::{
    BillEstimate, BillLine, CustomerProfile, NewsArticle, Notification, NotificationEvent,
    OutageRecord, PaymentReceipt, RefreshOutcome, SessionState, TariffEntry,
};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs generates TypeScript bindings when types with
        // #[ts(export)] are used. The files are written to the
        // `bindings/` directory relative to the crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::NotificationId::export_all();
        let _ = crate::ids::PaymentReference::export_all();

        // Enums
        let _ = crate::enums::OutageStatus::export_all();
        let _ = crate::enums::NewsCategory::export_all();
        let _ = crate::enums::TariffCategory::export_all();
        let _ = crate::enums::SystemStatus::export_all();
        let _ = crate::enums::AccountStatus::export_all();
        let _ = crate::enums::NotificationKind::export_all();
        let _ = crate::enums::RemovalReason::export_all();

        // Structs
        let _ = crate::structs::OutageRecord::export_all();
        let _ = crate::structs::NewsArticle::export_all();
        let _ = crate::structs::TariffEntry::export_all();
        let _ = crate::structs::CustomerProfile::export_all();
        let _ = crate::structs::PaymentReceipt::export_all();
        let _ = crate::structs::SessionState::export_all();
        let _ = crate::structs::RefreshOutcome::export_all();
        let _ = crate::structs::Notification::export_all();
        let _ = crate::structs::NotificationEvent::export_all();
        let _ = crate::structs::BillLine::export_all();
        let _ = crate::structs::BillEstimate::export_all();
    }
}
