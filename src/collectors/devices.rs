//! Device Snapshot Collector
//!
//! Fetches the Remo device list (energy bridges already excluded by the client)
//! and publishes it as the `devices` slot of the snapshot.

use super::{collect_with_handler, CollectionContext, CollectionStatus};

/// Fetch devices and replace the device slot on success
pub async fn collect_device_snapshot(ctx: &CollectionContext<'_>) -> CollectionStatus {
    collect_with_handler(ctx, "devices", ctx.source.fetch_devices(), |devices| {
        let count = devices.len();
        ctx.store.replace_devices(devices);
        count
    })
    .await
}
