//! The aggregation session.
//!
//! [`AggregationSession`] owns the consolidated [`SessionState`] and keeps
//! it current by refreshing all four collections from a [`DataSource`]
//! on a fixed schedule. It is created once at startup, shared by
//! [`Arc`] handle, and torn down explicitly with
//! [`AggregationSession::shutdown`].
//!
//! # Refresh protocol
//!
//! 1. Mark `loading` and clear `error`, then publish.
//! 2. Issue the four retrievals concurrently and wait for all of them.
//! 3. If every retrieval succeeded, replace the data fields and
//!    `last_updated` under one write lock. Otherwise keep the data and
//!    record the first failure in endpoint order.
//! 4. Clear `loading` and publish.
//!
//! Refreshes never interleave: a request made while another is in flight
//! returns [`RefreshOutcome::Skipped`]. The refresh body runs on its own
//! task, so a caller that stops waiting does not cut it short and every
//! published `loading: true` is followed by a `loading: false`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::Utc;
use gridportal_types::{RefreshOutcome, SessionState};
use tokio::sync::{Notify, RwLock, broadcast};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::source::{DataSource, SourceError};

/// Capacity of the session-state broadcast channel.
///
/// A subscriber that falls further behind skips to the newest state.
const BROADCAST_CAPACITY: usize = 64;

/// Message recorded if a refresh fails without any retrieval error.
const UNKNOWN_FAILURE: &str = "refresh failed";

/// Non-blocking gate that lets one refresh run at a time.
struct RefreshGate {
    busy: Arc<AtomicBool>,
}

/// Proof of holding the [`RefreshGate`]; releases it on drop.
struct RefreshPermit {
    busy: Arc<AtomicBool>,
}

impl RefreshGate {
    fn new() -> Self {
        Self {
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A gate that is already held by the returned permit.
    fn held() -> (Self, RefreshPermit) {
        let busy = Arc::new(AtomicBool::new(true));
        let permit = RefreshPermit {
            busy: Arc::clone(&busy),
        };
        (Self { busy }, permit)
    }

    fn try_acquire(&self) -> Option<RefreshPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RefreshPermit {
                busy: Arc::clone(&self.busy),
            })
    }
}

impl Drop for RefreshPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Owns the consolidated portal state and its refresh schedule.
pub struct AggregationSession {
    source: Arc<dyn DataSource>,
    state: RwLock<SessionState>,
    tx: broadcast::Sender<SessionState>,
    refresh_gate: RefreshGate,
    torn_down: AtomicBool,
    shutdown_notify: Arc<Notify>,
    scheduler: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for AggregationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregationSession")
            .field("torn_down", &self.is_torn_down())
            .finish_non_exhaustive()
    }
}

impl AggregationSession {
    /// Create an idle session with an empty state.
    ///
    /// No refresh is scheduled; use [`start`](Self::start) for the
    /// application lifecycle or call [`refresh`](Self::refresh) by hand.
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self::with_state(
            source,
            SessionState::empty(Utc::now()),
            RefreshGate::new(),
        )
    }

    fn with_state(
        source: Arc<dyn DataSource>,
        initial: SessionState,
        refresh_gate: RefreshGate,
    ) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            source,
            state: RwLock::new(initial),
            tx,
            refresh_gate,
            torn_down: AtomicBool::new(false),
            shutdown_notify: Arc::new(Notify::new()),
            scheduler: std::sync::Mutex::new(None),
        }
    }

    /// Create a session, begin its first refresh and schedule the rest.
    ///
    /// The returned session already reports `loading`. Must be called
    /// from within a Tokio runtime.
    pub fn start(source: Arc<dyn DataSource>, config: &SessionConfig) -> Arc<Self> {
        let initial = SessionState {
            loading: true,
            ..SessionState::empty(Utc::now())
        };
        // The first refresh owns the gate from the start, so manual
        // refreshes cannot race it.
        let (gate, permit) = RefreshGate::held();
        let session = Arc::new(Self::with_state(source, initial, gate));

        let period = config.refresh_interval();
        let handle = tokio::spawn(run_schedule(
            Arc::downgrade(&session),
            permit,
            period,
            Arc::clone(&session.shutdown_notify),
        ));
        if let Ok(mut slot) = session.scheduler.lock() {
            *slot = Some(handle);
        }

        info!(
            refresh_interval_secs = period.as_secs(),
            "aggregation session started"
        );
        session
    }

    /// Refresh all collections from the data source.
    ///
    /// Returns [`RefreshOutcome::Skipped`] if a refresh is already in
    /// flight and [`RefreshOutcome::Discarded`] once the session is torn
    /// down. Dropping the returned future does not cancel the refresh.
    pub async fn refresh(self: &Arc<Self>) -> RefreshOutcome {
        if self.is_torn_down() {
            debug!("refresh requested after teardown");
            return RefreshOutcome::Discarded;
        }
        let Some(permit) = self.refresh_gate.try_acquire() else {
            debug!("refresh already in flight, skipping");
            return RefreshOutcome::Skipped;
        };
        let session = Arc::clone(self);
        match tokio::spawn(async move { session.run_refresh(permit).await }).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "refresh task ended abnormally");
                RefreshOutcome::Failed {
                    message: err.to_string(),
                }
            }
        }
    }

    async fn run_refresh(&self, _permit: RefreshPermit) -> RefreshOutcome {
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
            self.broadcast(&state);
        }

        let (outages, news, tariffs, system_status) = tokio::join!(
            self.source.outages(),
            self.source.news(),
            self.source.tariffs(),
            self.source.system_status(),
        );

        if self.is_torn_down() {
            let mut state = self.state.write().await;
            state.loading = false;
            self.broadcast(&state);
            debug!("session torn down during refresh, discarding result");
            return RefreshOutcome::Discarded;
        }

        match (outages, news, tariffs, system_status) {
            (Ok(outages), Ok(news), Ok(tariffs), Ok(system_status)) => {
                let mut state = self.state.write().await;
                let last_updated = Utc::now().max(state.last_updated);
                state.outages = outages;
                state.news = news;
                state.tariffs = tariffs;
                state.system_status = system_status;
                state.last_updated = last_updated;
                state.loading = false;
                state.error = None;
                self.broadcast(&state);
                info!(
                    outages = state.outages.len(),
                    news = state.news.len(),
                    tariffs = state.tariffs.len(),
                    active_outages = state.active_outage_count(),
                    "session refreshed"
                );
                RefreshOutcome::Committed { last_updated }
            }
            (outages, news, tariffs, system_status) => {
                let mut failures = [
                    outages.err(),
                    news.err(),
                    tariffs.err(),
                    system_status.err(),
                ]
                .into_iter()
                .flatten();
                let message = failures
                    .next()
                    .map_or_else(|| String::from(UNKNOWN_FAILURE), |e| e.to_string());
                for extra in failures {
                    log_additional_failure(&extra);
                }

                let mut state = self.state.write().await;
                state.loading = false;
                state.error = Some(message.clone());
                self.broadcast(&state);
                warn!(error = %message, "session refresh failed, keeping previous data");
                RefreshOutcome::Failed { message }
            }
        }
    }

    /// The last committed data plus the current loading and error flags.
    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Subscribe to every published state.
    ///
    /// A state is published when a refresh starts and when it ends.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionState> {
        self.tx.subscribe()
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::Acquire)
    }

    /// Cancel the refresh schedule.
    ///
    /// An in-flight refresh runs to completion but its result is
    /// discarded. Later calls to [`refresh`](Self::refresh) return
    /// [`RefreshOutcome::Discarded`] immediately.
    pub async fn shutdown(&self) {
        if self.torn_down.swap(true, Ordering::AcqRel) {
            return;
        }
        self.shutdown_notify.notify_one();

        let handle = self.scheduler.lock().ok().and_then(|mut slot| slot.take());
        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                warn!(error = %err, "session scheduler ended abnormally");
            }
        }
        info!("aggregation session shut down");
    }

    fn broadcast(&self, state: &SessionState) -> usize {
        // send fails only when nobody is subscribed.
        self.tx.send(state.clone()).unwrap_or(0)
    }
}

fn log_additional_failure(err: &SourceError) {
    warn!(endpoint = err.endpoint(), error = %err, "additional retrieval failure");
}

/// Scheduler task: first refresh, then one refresh per period until
/// shutdown or until the session is dropped.
async fn run_schedule(
    session: Weak<AggregationSession>,
    permit: RefreshPermit,
    period: Duration,
    shutdown: Arc<Notify>,
) {
    let Some(current) = session.upgrade() else {
        return;
    };
    let outcome = current.run_refresh(permit).await;
    debug!(?outcome, "initial refresh finished");
    drop(current);

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    interval.tick().await;

    loop {
        tokio::select! {
            () = shutdown.notified() => break,
            _ = interval.tick() => {}
        }
        let Some(current) = session.upgrade() else {
            break;
        };
        if current.is_torn_down() {
            break;
        }
        let outcome = current.refresh().await;
        debug!(?outcome, "scheduled refresh finished");
    }
    debug!("session scheduler stopped");
}
