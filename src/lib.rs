//! Tasmota Prometheus Exporter
//!
//! A Prometheus metrics exporter for Tasmota smart plugs with energy monitoring.
//!
//! # Overview
//!
//! On every scrape the exporter queries each configured plug over its HTTP command
//! API (`Status 10`) and republishes voltage, current, power and energy counters as
//! gauges labeled by outlet name.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   GET /cm?cmnd=   ┌──────────────────┐
//! │  Tasmota    │ ◄──────────────── │     Exporter     │
//! │  plug (N)   │    status%2010    │                  │
//! └─────────────┘                   │  ┌────────────┐  │      HTTP      ┌────────────┐
//!                                   │  │ Collector  │  │ ◄────────────► │ Prometheus │
//!                                   │  └────────────┘  │   /metrics     └────────────┘
//!                                   │  ┌────────────┐  │
//!                                   │  │  Metrics   │  │
//!                                   │  └────────────┘  │
//!                                   └──────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`outlet`] - Outlet registry and configuration string parsing
//! - [`tasmota`] - HTTP client and API type definitions
//! - [`collectors`] - Concurrent per-scrape collection
//! - [`metrics`] - Prometheus metric definitions
//! - [`server`] - HTTP server
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use tasmota_exporter::{config::Config, outlet::OutletRegistry, server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/Default.toml")?;
//!     let outlets = OutletRegistry::parse(&config.tasmota.outlets);
//!     server::start(config, outlets).await?;
//!     Ok(())
//! }
//! ```

pub mod collectors;
pub mod config;
pub mod error;
pub mod metrics;
pub mod outlet;
pub mod server;
pub mod tasmota;
