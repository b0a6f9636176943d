//! Snapshot Collectors
//!
//! Each collector fetches one Nature Remo resource and, only if the fetch
//! succeeded, replaces the matching slot of the snapshot store.
//!
//! # Architecture
//!
//! Collectors follow a consistent pattern:
//! - Accept a `CollectionContext` containing shared state
//! - Query the Nature Remo API through the `DataSource`
//! - Hand the result to the store using `collect_with_handler`
//! - Return `CollectionStatus`
//!
//! # Error Handling
//!
//! A failed fetch is logged as a warning and leaves the store untouched, so
//! scrapers keep seeing the last good values. It never stops the refresh loop.

use crate::metrics::ExporterMetrics;
use crate::refresh::DataSource;
use crate::store::SnapshotStore;
use tracing::{info, warn};

/// Shared context passed to all collectors
#[derive(Clone, Copy)]
pub struct CollectionContext<'a> {
    /// Remote API the resources are fetched from
    pub source: &'a dyn DataSource,
    /// Snapshot slots updated on success
    pub store: &'a SnapshotStore,
    /// Exporter health metrics
    pub metrics: &'a ExporterMetrics,
}

/// Status of a single resource fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStatus {
    /// The resource was fetched and the store updated
    Success,
    /// The fetch failed; the store keeps the previous list (already logged)
    Failed,
}

impl CollectionStatus {
    pub fn is_success(self) -> bool {
        self == CollectionStatus::Success
    }
}

/// Run one fetch and apply its result with consistent logging and bookkeeping
///
/// * `name` - Resource name, used for logs and the `resource` metric label
/// * `query_future` - Async API call that returns the resource list
/// * `process` - Stores the list; returns the number of items stored
pub async fn collect_with_handler<T, F, P, E>(
    ctx: &CollectionContext<'_>,
    name: &str,
    query_future: F,
    process: P,
) -> CollectionStatus
where
    F: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: FnOnce(T) -> usize,
{
    match query_future.await {
        Ok(data) => {
            let items = process(data);
            ctx.metrics.record_success(name, items);
            info!("Updated {} snapshot ({} items)", name, items);
            CollectionStatus::Success
        }
        Err(e) => {
            ctx.metrics.record_failure(name);
            warn!("Failed to fetch {}, keeping previous snapshot: {}", name, e);
            CollectionStatus::Failed
        }
    }
}

pub mod appliances;
pub mod devices;

pub use appliances::collect_appliance_snapshot;
pub use devices::collect_device_snapshot;
