pub mod client;
pub mod types;

pub use client::NatureClient;
pub use types::{Appliance, ApplianceDevice, Device, NewestEvents, Property, SensorValue};
