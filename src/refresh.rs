//! Refresh Loop
//!
//! Background task that keeps the snapshot store current.
//!
//! # Lifecycle
//!
//! ```text
//! Starting ──► Running ──► Draining ──► Stopped
//!   (fetch)     (tick / shutdown)  (timer dropped)
//! ```
//!
//! - **Starting**: one immediate fetch of both resources
//! - **Running**: waits for the next tick or the shutdown notification, whichever comes first
//! - **Draining**: the timer is dropped and no further fetches are issued
//! - **Stopped**: terminal
//!
//! Devices and appliances are fetched independently on every tick; a failure of one
//! never blocks or invalidates the other. There is no backoff: a failing upstream is
//! retried at the same cadence until shutdown. A fetch already in progress when
//! shutdown is signalled is allowed to finish.

use crate::collectors::{self, CollectionContext, CollectionStatus};
use crate::config::MAX_REFRESH_INTERVAL_SECONDS;
use crate::error::Result;
use crate::metrics::ExporterMetrics;
use crate::nature::{Appliance, Device, NatureClient};
use crate::store::SnapshotStore;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{interval_at, Duration, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

/// Source of the two resource lists
///
/// Implemented by [`NatureClient`]; tests drive the loop with their own sources.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_devices(&self) -> Result<Vec<Device>>;
    async fn fetch_appliances(&self) -> Result<Vec<Appliance>>;
}

#[async_trait]
impl DataSource for NatureClient {
    async fn fetch_devices(&self) -> Result<Vec<Device>> {
        NatureClient::fetch_devices(self).await
    }

    async fn fetch_appliances(&self) -> Result<Vec<Appliance>> {
        NatureClient::fetch_appliances(self).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Starting,
    Running,
    Draining,
    Stopped,
}

/// Per-resource result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub devices: CollectionStatus,
    pub appliances: CollectionStatus,
}

impl RefreshOutcome {
    pub fn any_success(&self) -> bool {
        self.devices.is_success() || self.appliances.is_success()
    }
}

pub struct RefreshLoop {
    source: Arc<dyn DataSource>,
    store: SnapshotStore,
    metrics: ExporterMetrics,
    period: Duration,
    state: RefreshState,
}

impl RefreshLoop {
    pub fn new(
        source: Arc<dyn DataSource>,
        store: SnapshotStore,
        metrics: ExporterMetrics,
        period: Duration,
    ) -> Self {
        // interval_at panics on a zero period or an Instant overflow
        let period = period.clamp(
            Duration::from_millis(1),
            Duration::from_secs(MAX_REFRESH_INTERVAL_SECONDS),
        );
        Self {
            source,
            store,
            metrics,
            period,
            state: RefreshState::Starting,
        }
    }

    pub fn state(&self) -> RefreshState {
        self.state
    }

    /// Tick period, clamped to between one millisecond and one day
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Fetch both resources once and publish whichever succeeded
    pub async fn refresh_once(&self) -> RefreshOutcome {
        let ctx = CollectionContext {
            source: self.source.as_ref(),
            store: &self.store,
            metrics: &self.metrics,
        };

        let outcome = RefreshOutcome {
            devices: collectors::collect_device_snapshot(&ctx).await,
            appliances: collectors::collect_appliance_snapshot(&ctx).await,
        };

        self.metrics
            .up
            .set(if outcome.any_success() { 1.0 } else { 0.0 });
        outcome
    }

    /// Drive the loop until `shutdown` turns `true` or its sender is dropped
    ///
    /// Returns the terminal state.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> RefreshState {
        let mut ticker: Option<Interval> = None;

        loop {
            let next = match self.state {
                RefreshState::Starting => {
                    self.refresh_once().await;
                    let mut t = interval_at(Instant::now() + self.period, self.period);
                    t.set_missed_tick_behavior(MissedTickBehavior::Skip);
                    ticker = Some(t);
                    RefreshState::Running
                }
                RefreshState::Running => match ticker.as_mut() {
                    Some(t) => {
                        tokio::select! {
                            _ = t.tick() => {
                                self.refresh_once().await;
                                RefreshState::Running
                            }
                            _ = shutdown_requested(&mut shutdown) => RefreshState::Draining,
                        }
                    }
                    None => RefreshState::Draining,
                },
                RefreshState::Draining => {
                    ticker = None;
                    RefreshState::Stopped
                }
                RefreshState::Stopped => {
                    info!("Refresh loop stopped");
                    return self.state;
                }
            };

            if next != self.state {
                debug!("Refresh loop {:?} -> {:?}", self.state, next);
                self.state = next;
            }
        }
    }
}

/// Resolves once shutdown is requested or the sender is gone
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}
