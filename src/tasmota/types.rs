//! Tasmota API Type Definitions
//!
//! Response shapes of the `Status 10` (sensor status) command as returned by
//! `GET /cm?cmnd=status%2010`:
//!
//! ```json
//! {"StatusSNS": {
//!     "Time": "2025-01-15T10:30:00",
//!     "ENERGY": {"TotalStartTime": "...", "Total": 1.5, "Yesterday": 0.8, "Today": 0.7,
//!                "Power": 45.2, "ApparentPower": 50.0, "ReactivePower": 20.0,
//!                "Factor": 0.9, "Voltage": 240.0, "Current": 0.2},
//!     "ESP32": {"Temperature": 42.5}}}
//! ```
//!
//! # Design Notes
//!
//! - **Tolerant parsing**: every section and number is `#[serde(default)]`, so a device
//!   that omits a field (an ESP8266 has no `ESP32` block) reports zero for it.
//! - **Unknown fields** are ignored.

use serde::{Deserialize, Serialize};

/// Top-level response of the `Status 10` command
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(rename = "StatusSNS", default)]
    pub status_sns: StatusSns,
}

/// Sensor block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusSns {
    #[serde(rename = "Time", default)]
    pub time: String,
    #[serde(rename = "ENERGY", default)]
    pub energy: Energy,
    #[serde(rename = "ESP32", default)]
    pub esp32: Esp32,
}

/// Power monitoring readings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Energy {
    pub total_start_time: String,
    /// kWh since `TotalStartTime`
    pub total: f64,
    pub yesterday: f64,
    pub today: f64,
    /// Active power in W
    pub power: f64,
    pub apparent_power: f64,
    pub reactive_power: f64,
    pub factor: f64,
    pub voltage: f64,
    pub current: f64,
}

/// Chip readings of ESP32 based devices
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Esp32 {
    pub temperature: f64,
}

/// Measurements of one successful probe
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DeviceSnapshot {
    pub voltage: f64,
    pub current: f64,
    pub active_power: f64,
    pub apparent_power: f64,
    pub reactive_power: f64,
    pub power_factor: f64,
    pub energy_today: f64,
    pub energy_yesterday: f64,
    pub energy_total: f64,
    pub chip_temperature: f64,
}

impl DeviceSnapshot {
    /// A plug reports 0 W while switched off, so on-state is derived from active power
    /// alone.
    pub fn power_on(&self) -> bool {
        self.active_power > 0.0
    }
}

impl From<StatusResponse> for DeviceSnapshot {
    fn from(status: StatusResponse) -> Self {
        let energy = status.status_sns.energy;
        Self {
            voltage: energy.voltage,
            current: energy.current,
            active_power: energy.power,
            apparent_power: energy.apparent_power,
            reactive_power: energy.reactive_power,
            power_factor: energy.factor,
            energy_today: energy.today,
            energy_yesterday: energy.yesterday,
            energy_total: energy.total,
            chip_temperature: status.status_sns.esp32.temperature,
        }
    }
}
