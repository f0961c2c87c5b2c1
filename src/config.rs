use crate::error::ExporterError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub tasmota: TasmotaConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TasmotaConfig {
    /// Comma-separated `name:address` pairs
    #[serde(default)]
    pub outlets: String,
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default)]
    pub format: LogFormat,
}

/// Minimum level of emitted log events
///
/// Config files, environment variables and CLI flags all parse through [`FromStr`],
/// so `INFO` and ` info ` are accepted everywhere.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(try_from = "String")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

/// Output format of the log subscriber
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Text on a terminal, JSON otherwise
    #[default]
    Auto,
    Text,
    Json,
}

fn default_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8092
}

fn default_probe_timeout() -> u64 {
    5
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            port: default_port(),
        }
    }
}

impl Default for TasmotaConfig {
    fn default() -> Self {
        Self {
            outlets: String::new(),
            probe_timeout_seconds: default_probe_timeout(),
        }
    }
}

impl TasmotaConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_seconds)
    }
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ExporterError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(ExporterError::Config(format!(
                "invalid log level '{}' (valid levels: debug, info, warn, error)",
                other
            ))),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = ExporterError;

    fn try_from(value: String) -> std::result::Result<Self, <LogLevel as TryFrom<String>>::Error> {
        value.parse()
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("TASMOTA_EXPORTER").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Checks values that serde cannot reject on its own
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.tasmota.outlets.trim().is_empty() {
            return Err(ExporterError::Config(
                "outlets must be configured (e.g. 'livingroom:192.168.1.100')".to_string(),
            ));
        }
        if self.tasmota.probe_timeout_seconds == 0 {
            return Err(ExporterError::Config(
                "probe_timeout_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
