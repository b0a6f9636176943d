//! Appliance Snapshot Collector
//!
//! Fetches the ECHONET Lite appliance list and publishes it as the
//! `appliances` slot of the snapshot.

use super::{collect_with_handler, CollectionContext, CollectionStatus};

pub async fn collect_appliance_snapshot(ctx: &CollectionContext<'_>) -> CollectionStatus {
    collect_with_handler(
        ctx,
        "appliances",
        ctx.source.fetch_appliances(),
        |appliances| {
            let count = appliances.len();
            ctx.store.replace_appliances(appliances);
            count
        },
    )
    .await
}
