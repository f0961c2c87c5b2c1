//! Prometheus Metrics Definitions
//!
//! This module defines all Prometheus metrics exposed by the Tasmota exporter.
//!
//! # Metrics
//!
//! | Name | Unit |
//! |------|------|
//! | `tasmota_up` | 1 if the last probe succeeded, 0 otherwise |
//! | `tasmota_on` | 1 if active power > 0 W |
//! | `tasmota_voltage_volts` | V |
//! | `tasmota_current_amperes` | A |
//! | `tasmota_power_watts` | W |
//! | `tasmota_apparent_power_voltamperes` | VA |
//! | `tasmota_reactive_power_voltamperesreactive` | VAr |
//! | `tasmota_power_factor` | ratio |
//! | `tasmota_today_kwh_total` | kWh |
//! | `tasmota_yesterday_kwh_total` | kWh |
//! | `tasmota_kwh_total` | kWh |
//! | `tasmota_temperature_celsius` | °C (ESP32 chip) |
//!
//! Every metric is a `GaugeVec` with the single label `outlet`.
//!
//! # Stale Values
//!
//! Gauges are never reset. When an outlet becomes unreachable only `tasmota_up` is
//! written, so its measurement gauges keep the last reported value.

use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};
use std::fmt;
use std::sync::Arc;

/// Namespace prefix of every metric
pub const NAMESPACE: &str = "tasmota";

/// Label carrying the outlet name
pub const OUTLET_LABEL: &str = "outlet";

/// The gauges published per outlet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TasmotaMetric {
    Up,
    On,
    Voltage,
    Current,
    Power,
    ApparentPower,
    ReactivePower,
    PowerFactor,
    TodayKwh,
    YesterdayKwh,
    TotalKwh,
    Temperature,
}

impl TasmotaMetric {
    /// All metrics, in exposition order for a reachable outlet
    pub const ALL: [TasmotaMetric; 12] = [
        Self::Up,
        Self::On,
        Self::Voltage,
        Self::Current,
        Self::Power,
        Self::ApparentPower,
        Self::ReactivePower,
        Self::PowerFactor,
        Self::TodayKwh,
        Self::YesterdayKwh,
        Self::TotalKwh,
        Self::Temperature,
    ];

    /// Name without the namespace prefix
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::On => "on",
            Self::Voltage => "voltage_volts",
            Self::Current => "current_amperes",
            Self::Power => "power_watts",
            Self::ApparentPower => "apparent_power_voltamperes",
            Self::ReactivePower => "reactive_power_voltamperesreactive",
            Self::PowerFactor => "power_factor",
            Self::TodayKwh => "today_kwh_total",
            Self::YesterdayKwh => "yesterday_kwh_total",
            Self::TotalKwh => "kwh_total",
            Self::Temperature => "temperature_celsius",
        }
    }

    /// Fully qualified name as exposed to Prometheus
    pub fn name(&self) -> &'static str {
        match self {
            Self::Up => "tasmota_up",
            Self::On => "tasmota_on",
            Self::Voltage => "tasmota_voltage_volts",
            Self::Current => "tasmota_current_amperes",
            Self::Power => "tasmota_power_watts",
            Self::ApparentPower => "tasmota_apparent_power_voltamperes",
            Self::ReactivePower => "tasmota_reactive_power_voltamperesreactive",
            Self::PowerFactor => "tasmota_power_factor",
            Self::TodayKwh => "tasmota_today_kwh_total",
            Self::YesterdayKwh => "tasmota_yesterday_kwh_total",
            Self::TotalKwh => "tasmota_kwh_total",
            Self::Temperature => "tasmota_temperature_celsius",
        }
    }

    pub fn help(&self) -> &'static str {
        match self {
            Self::Up => "Indicates if the tasmota outlet is reachable",
            Self::On => "Indicates if the tasmota plug is on/off",
            Self::Voltage => "voltage of tasmota plug in volt (V)",
            Self::Current => "current of tasmota plug in ampere (A)",
            Self::Power => "current power of tasmota plug in watts (W)",
            Self::ApparentPower => "apparent power of tasmota plug in volt-amperes (VA)",
            Self::ReactivePower => {
                "reactive power of tasmota plug in volt-amperes reactive (VAr)"
            }
            Self::PowerFactor => "power factor of tasmota plug",
            Self::TodayKwh => "todays energy usage total in kilowatts hours (kWh)",
            Self::YesterdayKwh => "yesterdays energy usage total in kilowatts hours (kWh)",
            Self::TotalKwh => "total energy usage in kilowatts hours (kWh)",
            Self::Temperature => "temperature of the ESP32 chip in celsius",
        }
    }

    fn gauge_vec(&self) -> prometheus::Result<GaugeVec> {
        GaugeVec::new(
            Opts::new(self.short_name(), self.help()).namespace(NAMESPACE),
            &[OUTLET_LABEL],
        )
    }
}

impl fmt::Display for TasmotaMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Gauge storage for all outlets
///
/// Each `GaugeVec` maps an outlet label to its last written value and is safe to
/// write from concurrent probe tasks.
#[derive(Clone)]
pub struct MetricsCollector {
    registry: Arc<Registry>,

    // Reachability
    pub up: Arc<GaugeVec>,
    pub on: Arc<GaugeVec>,

    // Electrical readings
    pub voltage_volts: Arc<GaugeVec>,
    pub current_amperes: Arc<GaugeVec>,
    pub power_watts: Arc<GaugeVec>,
    pub apparent_power_voltamperes: Arc<GaugeVec>,
    pub reactive_power_voltamperesreactive: Arc<GaugeVec>,
    pub power_factor: Arc<GaugeVec>,

    // Energy counters reported by the device
    pub today_kwh_total: Arc<GaugeVec>,
    pub yesterday_kwh_total: Arc<GaugeVec>,
    pub kwh_total: Arc<GaugeVec>,

    // Chip
    pub temperature_celsius: Arc<GaugeVec>,
}

impl MetricsCollector {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let up = TasmotaMetric::Up.gauge_vec()?;
        let on = TasmotaMetric::On.gauge_vec()?;
        let voltage_volts = TasmotaMetric::Voltage.gauge_vec()?;
        let current_amperes = TasmotaMetric::Current.gauge_vec()?;
        let power_watts = TasmotaMetric::Power.gauge_vec()?;
        let apparent_power_voltamperes = TasmotaMetric::ApparentPower.gauge_vec()?;
        let reactive_power_voltamperesreactive = TasmotaMetric::ReactivePower.gauge_vec()?;
        let power_factor = TasmotaMetric::PowerFactor.gauge_vec()?;
        let today_kwh_total = TasmotaMetric::TodayKwh.gauge_vec()?;
        let yesterday_kwh_total = TasmotaMetric::YesterdayKwh.gauge_vec()?;
        let kwh_total = TasmotaMetric::TotalKwh.gauge_vec()?;
        let temperature_celsius = TasmotaMetric::Temperature.gauge_vec()?;

        registry.register(Box::new(up.clone()))?;
        registry.register(Box::new(on.clone()))?;
        registry.register(Box::new(voltage_volts.clone()))?;
        registry.register(Box::new(current_amperes.clone()))?;
        registry.register(Box::new(power_watts.clone()))?;
        registry.register(Box::new(apparent_power_voltamperes.clone()))?;
        registry.register(Box::new(reactive_power_voltamperesreactive.clone()))?;
        registry.register(Box::new(power_factor.clone()))?;
        registry.register(Box::new(today_kwh_total.clone()))?;
        registry.register(Box::new(yesterday_kwh_total.clone()))?;
        registry.register(Box::new(kwh_total.clone()))?;
        registry.register(Box::new(temperature_celsius.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            up: Arc::new(up),
            on: Arc::new(on),
            voltage_volts: Arc::new(voltage_volts),
            current_amperes: Arc::new(current_amperes),
            power_watts: Arc::new(power_watts),
            apparent_power_voltamperes: Arc::new(apparent_power_voltamperes),
            reactive_power_voltamperesreactive: Arc::new(reactive_power_voltamperesreactive),
            power_factor: Arc::new(power_factor),
            today_kwh_total: Arc::new(today_kwh_total),
            yesterday_kwh_total: Arc::new(yesterday_kwh_total),
            kwh_total: Arc::new(kwh_total),
            temperature_celsius: Arc::new(temperature_celsius),
        })
    }

    /// Gauge family backing a metric
    pub fn gauge(&self, metric: TasmotaMetric) -> &GaugeVec {
        match metric {
            TasmotaMetric::Up => &self.up,
            TasmotaMetric::On => &self.on,
            TasmotaMetric::Voltage => &self.voltage_volts,
            TasmotaMetric::Current => &self.current_amperes,
            TasmotaMetric::Power => &self.power_watts,
            TasmotaMetric::ApparentPower => &self.apparent_power_voltamperes,
            TasmotaMetric::ReactivePower => &self.reactive_power_voltamperesreactive,
            TasmotaMetric::PowerFactor => &self.power_factor,
            TasmotaMetric::TodayKwh => &self.today_kwh_total,
            TasmotaMetric::YesterdayKwh => &self.yesterday_kwh_total,
            TasmotaMetric::TotalKwh => &self.kwh_total,
            TasmotaMetric::Temperature => &self.temperature_celsius,
        }
    }

    /// Overwrite the value of `metric` for one outlet
    pub fn set(&self, metric: TasmotaMetric, outlet: &str, value: f64) {
        self.gauge(metric).with_label_values(&[outlet]).set(value);
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics collector")
    }
}
