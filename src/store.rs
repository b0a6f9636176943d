//! Snapshot Store
//!
//! Holds the most recent successfully fetched device and appliance lists.
//! The refresh loop is the only writer, scrape handlers are the only readers.
//!
//! Each list lives behind an `Arc<[T]>` that is swapped as a whole, so a reader
//! either sees the previous list or the new one, never a mix of both.

use crate::nature::{Appliance, Device};
use parking_lot::RwLock;
use std::sync::Arc;

/// The lists considered "latest" at one instant
///
/// `None` means the list has never been fetched successfully.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub devices: Option<Arc<[Device]>>,
    pub appliances: Option<Arc<[Appliance]>>,
}

impl Snapshot {
    pub fn devices(&self) -> &[Device] {
        self.devices.as_deref().unwrap_or_default()
    }

    pub fn appliances(&self) -> &[Appliance] {
        self.appliances.as_deref().unwrap_or_default()
    }
}

/// Shared handle to the latest snapshot
///
/// Cloning is cheap and every clone refers to the same slots.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    inner: Arc<RwLock<Snapshot>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_devices(&self, devices: Vec<Device>) {
        let devices: Arc<[Device]> = devices.into();
        self.inner.write().devices = Some(devices);
    }

    pub fn replace_appliances(&self, appliances: Vec<Appliance>) {
        let appliances: Arc<[Appliance]> = appliances.into();
        self.inner.write().appliances = Some(appliances);
    }

    pub fn read(&self) -> Snapshot {
        self.inner.read().clone()
    }
}
