//! Nature Remo Prometheus Exporter
//!
//! Republishes Nature Remo sensor readings and ECHONET Lite appliance properties
//! in Prometheus text format.
//!
//! # Overview
//!
//! A background loop polls the Nature Remo cloud API every minute and keeps the
//! latest device and appliance lists in a snapshot store. Each scrape of
//! `/metrics` renders that snapshot without touching the network, so a slow or
//! failing upstream only makes the values stale, never the scrape slow.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     HTTPS + JSON     ┌──────────────────┐
//! │ Nature Remo │ ◄──────────────────  │     Exporter     │
//! │  Cloud API  │   GET every 60s      │                  │
//! └─────────────┘                      │  ┌────────────┐  │      HTTP      ┌────────────┐
//!                                      │  │  Refresh   │  │ ◄────────────► │ Prometheus │
//!                                      │  └─────┬──────┘  │   /metrics     └────────────┘
//!                                      │  ┌─────▼──────┐  │
//!                                      │  │  Snapshot  │  │
//!                                      │  └────────────┘  │
//!                                      └──────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`nature`] - HTTP client and API type definitions
//! - [`store`] - Latest device/appliance snapshot
//! - [`collectors`] - Per-resource fetch-and-publish steps
//! - [`refresh`] - Background refresh loop
//! - [`exposition`] - Snapshot to text format rendering
//! - [`metrics`] - Exporter operational metrics
//! - [`server`] - HTTP server and lifecycle
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use nature_remo_exporter::{config::Config, nature::NatureClient, server};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/Default.toml")?;
//!     let client = NatureClient::new(&config.nature)?;
//!     server::start(config, Arc::new(client)).await?;
//!     Ok(())
//! }
//! ```

pub mod collectors;
pub mod config;
pub mod error;
pub mod exposition;
pub mod metrics;
pub mod nature;
pub mod refresh;
pub mod server;
pub mod store;
