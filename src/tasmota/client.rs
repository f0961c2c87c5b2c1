//! Tasmota HTTP Command Client
//!
//! Queries a device's sensor status through the web command endpoint
//! (`/cm?cmnd=status%2010`) and turns the answer into a [`DeviceSnapshot`].
//!
//! # Failure Model
//!
//! Every probe is a single attempt bounded by one deadline that covers connect,
//! response, body read and JSON parsing. Connection errors, timeouts, unreadable
//! bodies and malformed JSON all end up as [`ProbeOutcome::Unreachable`]. The HTTP
//! status code is not inspected: the body alone decides.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use tasmota_exporter::tasmota::{ProbeOutcome, TasmotaClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = TasmotaClient::new(Duration::from_secs(5))?;
//! match client.probe("192.168.1.100").await {
//!     ProbeOutcome::Reachable(snapshot) => println!("{} W", snapshot.active_power),
//!     ProbeOutcome::Unreachable(e) => println!("unreachable: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

use crate::error::{ExporterError, Result};
use crate::tasmota::types::{DeviceSnapshot, StatusResponse};
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Command path for `Status 10`, with the space URL-encoded
pub const STATUS_COMMAND_PATH: &str = "/cm?cmnd=status%2010";

/// Result of probing one device
#[derive(Debug)]
pub enum ProbeOutcome {
    Reachable(DeviceSnapshot),
    Unreachable(ExporterError),
}

impl ProbeOutcome {
    pub fn is_reachable(&self) -> bool {
        matches!(self, Self::Reachable(_))
    }
}

impl From<Result<DeviceSnapshot>> for ProbeOutcome {
    fn from(result: Result<DeviceSnapshot>) -> Self {
        match result {
            Ok(snapshot) => Self::Reachable(snapshot),
            Err(e) => Self::Unreachable(e),
        }
    }
}

/// Client for the Tasmota web command API
///
/// Cheap to clone; clones share one `reqwest::Client`. Idle connections are not
/// pooled, so every probe opens and owns its own connection to the device.
#[derive(Debug, Clone)]
pub struct TasmotaClient {
    http: reqwest::Client,
    timeout: Duration,
}

impl TasmotaClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .build()?;
        Ok(Self { http, timeout })
    }

    /// Status URL for a device address (`host` or `host:port`)
    pub fn status_url(address: &str) -> String {
        format!("http://{}{}", address, STATUS_COMMAND_PATH)
    }

    /// Probe a device once, bounded by the client timeout
    pub async fn probe(&self, address: &str) -> ProbeOutcome {
        match timeout(self.timeout, self.query_status(address)).await {
            Ok(result) => result.into(),
            Err(_) => ProbeOutcome::Unreachable(ExporterError::Timeout(self.timeout)),
        }
    }

    async fn query_status(&self, address: &str) -> Result<DeviceSnapshot> {
        let url = Self::status_url(address);
        let response = self.http.get(&url).send().await?;
        let body = response.bytes().await?;

        debug!(
            address,
            response = %String::from_utf8_lossy(&body),
            "tasmota target response"
        );

        let status: StatusResponse = serde_json::from_slice(&body)?;
        Ok(status.into())
    }
}
