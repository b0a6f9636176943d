//! Nature Remo API Type Definitions
//!
//! Rust structs for the JSON documents returned by the Nature Remo cloud API.
//!
//! # Design Notes
//!
//! - **Lenient decoding**: fields the API may omit or send as `null` fall back to their
//!   default, so a device without an illumination sensor still decodes with a zero reading.
//! - **Timestamps**: RFC 3339 strings decoded into `DateTime<Utc>`; absent timestamps are `None`.
//! - **Unused fields**: identity and calibration fields are kept even though the
//!   exposition only reads a subset of them.
//!
//! # API Endpoints Covered
//!
//! - `GET /1/devices` → `Vec<`[`Device`]`>`
//! - `GET /1/echonetlite/appliances` → [`ApplianceList`] → `Vec<`[`Appliance`]`>`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Treat an explicit JSON `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single sensor reading
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SensorValue {
    #[serde(rename = "val", default, deserialize_with = "null_as_default")]
    pub value: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Latest reading of each ambient sensor on a device
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewestEvents {
    #[serde(rename = "te", default, deserialize_with = "null_as_default")]
    pub temperature: SensorValue,
    #[serde(rename = "hu", default, deserialize_with = "null_as_default")]
    pub humidity: SensorValue,
    #[serde(rename = "il", default, deserialize_with = "null_as_default")]
    pub illumination: SensorValue,
    #[serde(rename = "mo", default, deserialize_with = "null_as_default")]
    pub movement: SensorValue,
}

/// A Nature Remo unit
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Device {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub temperature_offset: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub humidity_offset: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub firmware_version: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mac_address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub serial_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub newest_events: NewestEvents,
}

/// Copy of the owning device's descriptors embedded in each appliance
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApplianceDevice {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub temperature_offset: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub humidity_offset: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub firmware_version: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mac_address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub serial_number: String,
}

/// ECHONET Lite property of an appliance
///
/// `code` is the EPC tag and `value` is the raw, usually hexadecimal, payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Property {
    #[serde(rename = "epc", default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(rename = "val", default, deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// An ECHONET Lite appliance (smart meter, air conditioner, ...)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Appliance {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename = "nickname", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(
        rename = "device",
        alias = "Device",
        default,
        deserialize_with = "null_as_default"
    )]
    pub device: ApplianceDevice,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: Vec<Property>,
}

/// Envelope of the appliances endpoint
#[derive(Debug, Deserialize)]
pub struct ApplianceList {
    pub appliances: Vec<Appliance>,
}
