//! Portal server binary.
//!
//! Wires together the data source, the aggregation session, the
//! notification queue and the HTTP API, then runs until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load and validate configuration from `gridportal.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Create the fallback data source behind the request simulator
//! 4. Start the aggregation session (first refresh begins immediately)
//! 5. Create the notification queue
//! 6. Spawn the API server
//! 7. Wait for `Ctrl-C`, then stop the API and tear down the session

mod error;

use std::path::Path;
use std::sync::Arc;

use gridportal_api::{AppState, ServerConfig};
use gridportal_core::config::{LoggingConfig, PortalConfig};
use gridportal_core::notifications::NotificationQueue;
use gridportal_core::session::AggregationSession;
use gridportal_core::simulator::RequestSimulator;
use gridportal_core::source::{DataSource, FallbackSource};
use tokio::sync::Notify;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Path of the optional configuration file.
const CONFIG_PATH: &str = "gridportal.yaml";

/// Application entry point for the portal server.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the API cannot bind,
/// or the shutdown signal cannot be installed.
#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Load configuration.
    let config = load_config()?;
    config.validate()?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!(
        refresh_interval_secs = config.session.refresh_interval_secs,
        simulated_latency_ms = config.session.simulated_latency_ms,
        notification_lifetime_ms = config.notifications.lifetime_ms,
        "gridportal-server starting"
    );

    // 3. Data source.
    let source: Arc<dyn DataSource> = Arc::new(FallbackSource::new(RequestSimulator::new(
        config.session.simulated_latency(),
    )));

    // 4. Aggregation session.
    let session = AggregationSession::start(Arc::clone(&source), &config.session);

    // 5. Notification queue.
    let notifications = NotificationQueue::new(config.notifications.lifetime());

    // 6. API server.
    let state = Arc::new(AppState::new(
        Arc::clone(&session),
        notifications,
        source,
    ));
    let stop = Arc::new(Notify::new());
    let stop_signal = Arc::clone(&stop);
    let server_config = ServerConfig::from(&config.server);
    let api_handle = match gridportal_api::spawn_api(&server_config, state, async move {
        stop_signal.notified().await;
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            session.shutdown().await;
            return Err(e.into());
        }
    };

    // 7. Run until Ctrl-C.
    let signal = tokio::signal::ctrl_c().await;
    info!("Shutdown requested");

    stop.notify_one();
    if let Err(e) = api_handle.await {
        warn!(error = %e, "API task ended abnormally");
    }
    session.shutdown().await;

    info!("gridportal-server stopped");
    signal.map_err(AppError::from)
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Load configuration from `gridportal.yaml`, falling back to defaults
/// when the file does not exist.
fn load_config() -> Result<PortalConfig, AppError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok(PortalConfig::from_file(config_path)?)
    } else {
        let mut config = PortalConfig::default();
        config.server.apply_env_overrides();
        Ok(config)
    }
}
