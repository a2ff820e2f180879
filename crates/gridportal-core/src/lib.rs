//! Data aggregation, notifications and portal flows for the utility portal.
//!
//! This crate owns the state the portal serves: a periodically refreshed
//! snapshot of outages, news, tariffs and system status, plus a queue of
//! short-lived notifications that every user-facing flow reports into.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `gridportal.yaml` into
//!   strongly-typed structs.
//! - [`fallback`] -- The static dataset served when no backend is available.
//! - [`simulator`] -- Artificial request latency.
//! - [`source`] -- [`DataSource`] trait and [`FallbackSource`].
//! - [`session`] -- [`AggregationSession`], the refresh loop and its state.
//! - [`notifications`] -- [`NotificationQueue`] with timed expiry.
//! - [`billing`] -- Monthly bill estimation.
//! - [`filters`] -- Search and category filters over catalog records.
//! - [`portal`] -- Login, payment and contact form flows.
//!
//! [`DataSource`]: source::DataSource
//! [`FallbackSource`]: source::FallbackSource
//! [`AggregationSession`]: session::AggregationSession
//! [`NotificationQueue`]: notifications::NotificationQueue

pub mod billing;
pub mod config;
pub mod fallback;
pub mod filters;
pub mod notifications;
pub mod portal;
pub mod session;
pub mod simulator;
pub mod source;
