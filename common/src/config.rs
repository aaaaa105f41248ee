use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::{
    schedule::DayOfWeek,
    types::{Phase, DEVICE_MAX_CELSIUS, DEVICE_MIN_CELSIUS},
};

pub const DEFAULT_LOCATION: &str = "livingroom";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepWindow {
    pub start: Option<String>,
    pub stop: Option<String>,
}

pub type WeeklySleep = BTreeMap<DayOfWeek, SleepWindow>;

/// Live control parameters plus the two phase fields that survive restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermostatConfig {
    pub target_temperature: f64,
    pub pos_hysteresis: f64,
    pub neg_hysteresis: f64,
    pub sleep_active: bool,
    pub sleep_start: Option<String>,
    pub sleep_stop: Option<String>,
    pub sleep_weekly: Option<WeeklySleep>,
    pub control_locations: Vec<String>,
    pub min_on_seconds: u64,
    pub min_off_seconds: u64,
    pub poll_interval_seconds: u64,
    pub smoothing_window: usize,
    pub max_staleness_seconds: Option<u64>,
    pub engine_enabled: bool,
    /// Device setpoint forced on every automatic ON; `None` leaves the device alone.
    pub engage_setpoint_celsius: Option<i32>,
    #[serde(deserialize_with = "lenient_phase")]
    pub current_phase: Option<Phase>,
    pub phase_started_at: Option<String>,
}

impl Default for ThermostatConfig {
    fn default() -> Self {
        Self {
            target_temperature: 24.5,
            pos_hysteresis: 0.5,
            neg_hysteresis: 0.5,
            sleep_active: true,
            sleep_start: None,
            sleep_stop: None,
            sleep_weekly: None,
            control_locations: Vec::new(),
            min_on_seconds: 240,
            min_off_seconds: 240,
            poll_interval_seconds: 15,
            smoothing_window: 5,
            max_staleness_seconds: Some(120),
            engine_enabled: true,
            engage_setpoint_celsius: Some(DEVICE_MIN_CELSIUS),
            current_phase: None,
            phase_started_at: None,
        }
    }
}

impl ThermostatConfig {
    pub fn sanitize(&mut self) {
        let defaults = Self::default();

        if !self.target_temperature.is_finite() {
            warn!("target temperature is not finite; using default");
            self.target_temperature = defaults.target_temperature;
        }
        self.pos_hysteresis = sanitize_hysteresis(self.pos_hysteresis, defaults.pos_hysteresis);
        self.neg_hysteresis = sanitize_hysteresis(self.neg_hysteresis, defaults.neg_hysteresis);

        if self.poll_interval_seconds == 0 {
            self.poll_interval_seconds = defaults.poll_interval_seconds;
        }
        self.smoothing_window = self.smoothing_window.max(1);

        if let Some(celsius) = self.engage_setpoint_celsius {
            if !(DEVICE_MIN_CELSIUS..=DEVICE_MAX_CELSIUS).contains(&celsius) {
                warn!("engage setpoint {celsius} outside device range; disabling");
                self.engage_setpoint_celsius = None;
            }
        }

        let mut seen = Vec::with_capacity(self.control_locations.len());
        for location in self.control_locations.drain(..) {
            let trimmed = location.trim();
            if !trimmed.is_empty() && !seen.iter().any(|known: &String| known == trimmed) {
                seen.push(trimmed.to_string());
            }
        }
        self.control_locations = seen;

        if matches!(&self.sleep_weekly, Some(weekly) if weekly.is_empty()) {
            self.sleep_weekly = None;
        }
    }

    pub fn on_threshold(&self) -> f64 {
        self.target_temperature + self.pos_hysteresis
    }

    pub fn off_threshold(&self) -> f64 {
        self.target_temperature - self.neg_hysteresis
    }
}

fn sanitize_hysteresis(value: f64, default: f64) -> f64 {
    if !value.is_finite() {
        default
    } else {
        value.max(0.0)
    }
}

// A corrupted phase marker must not make the whole record unloadable.
fn lenient_phase<'de, D>(deserializer: D) -> Result<Option<Phase>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|value| match value.trim().to_ascii_lowercase().as_str() {
            "on" => Some(Phase::On),
            "off" => Some(Phase::Off),
            _ => None,
        }))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub mqtt_host: String,
    pub mqtt_port: u16,
    pub mqtt_user: String,
    pub mqtt_pass: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            mqtt_host: "127.0.0.1".to_string(),
            mqtt_port: 1883,
            mqtt_user: String::new(),
            mqtt_pass: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub thermostat: ThermostatConfig,
    pub timezone: String,
    pub default_location: String,
    pub network: NetworkConfig,
    pub status_publish_interval_secs: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            thermostat: ThermostatConfig::default(),
            timezone: "Europe/Helsinki".to_string(),
            default_location: DEFAULT_LOCATION.to_string(),
            network: NetworkConfig::default(),
            status_publish_interval_secs: 60,
        }
    }
}
