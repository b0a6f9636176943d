//! Nature Remo Cloud API Client
//!
//! This module provides a client for the two read-only Nature Remo endpoints the
//! exporter needs.
//!
//! # Architecture
//!
//! - **Transport**: HTTPS GET via a shared `reqwest::Client`
//! - **Authentication**: Bearer token in the `Authorization` header of every request
//! - **Protocol**: JSON response bodies, no query parameters
//!
//! Each call is a single attempt. Retrying is left to the refresh loop, which simply
//! tries again on its next tick.
//!
//! # Example
//!
//! ```no_run
//! use nature_remo_exporter::config::NatureConfig;
//! use nature_remo_exporter::nature::NatureClient;
//! use secrecy::SecretString;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = NatureConfig {
//!     base_url: "https://api.nature.global".to_string(),
//!     access_token: SecretString::from("your-access-token"),
//! };
//!
//! let client = NatureClient::new(&config)?;
//! let devices = client.fetch_devices().await?;
//! # Ok(())
//! # }
//! ```

use crate::config::NatureConfig;
use crate::error::{ExporterError, Result};
use crate::nature::types::{Appliance, ApplianceList, Device};
use reqwest::header::AUTHORIZATION;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Path of the device list resource
pub const DEVICES_PATH: &str = "/1/devices";

/// Path of the ECHONET Lite appliance list resource
pub const APPLIANCES_PATH: &str = "/1/echonetlite/appliances";

/// Firmware marker of Nature Remo E units.
///
/// These are energy-monitoring bridges without the four ambient sensors.
pub const ENERGY_SENSOR_FIRMWARE_MARKER: &str = "Remo-E";

/// Client for the Nature Remo cloud API
///
/// Holds no mutable state besides the connection pool inside `reqwest::Client`,
/// so one instance can be reused for every refresh tick.
pub struct NatureClient {
    http: reqwest::Client,
    base_url: String,
    access_token: SecretString,
}

impl NatureClient {
    pub fn new(config: &NatureConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("nature-remo-exporter/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
        })
    }

    /// Fetch all Remo devices, excluding Remo E energy bridges
    pub async fn fetch_devices(&self) -> Result<Vec<Device>> {
        let devices: Vec<Device> = self.get_json(DEVICES_PATH).await?;
        Ok(exclude_energy_sensors(devices))
    }

    /// Fetch all ECHONET Lite appliances
    pub async fn fetch_appliances(&self) -> Result<Vec<Appliance>> {
        let list: ApplianceList = self.get_json(APPLIANCES_PATH).await?;
        Ok(list.appliances)
    }

    /// Issue an authenticated GET and decode the JSON body
    ///
    /// The body is read completely before decoding so that a dropped connection
    /// surfaces as [`ExporterError::Transport`] and a malformed document as
    /// [`ExporterError::Decode`]. Any status >= 400 is reported as
    /// [`ExporterError::Http`] without looking at the body.
    async fn get_json<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .header(
                AUTHORIZATION,
                format!("Bearer {}", self.access_token.expose_secret()),
            )
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() >= 400 {
            return Err(ExporterError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Drop devices whose firmware identifies them as Remo E energy bridges
pub fn exclude_energy_sensors(devices: Vec<Device>) -> Vec<Device> {
    devices
        .into_iter()
        .filter(|d| !d.firmware_version.contains(ENERGY_SENSOR_FIRMWARE_MARKER))
        .collect()
}
