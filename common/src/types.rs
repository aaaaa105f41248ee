use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ActuatorError;

pub const DEVICE_MIN_CELSIUS: i32 = 16;
pub const DEVICE_MAX_CELSIUS: i32 = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    On,
    Off,
}

impl Phase {
    pub fn from_power(is_on: bool) -> Self {
        if is_on {
            Self::On
        } else {
            Self::Off
        }
    }

    pub fn is_on(self) -> bool {
        self == Self::On
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcMode {
    Cold,
    Wet,
    Wind,
}

impl AcMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cold => "cold",
            Self::Wet => "wet",
            Self::Wind => "wind",
        }
    }
}

impl FromStr for AcMode {
    type Err = ActuatorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cold" => Ok(Self::Cold),
            "wet" => Ok(Self::Wet),
            "wind" => Ok(Self::Wind),
            _ => Err(ActuatorError::InvalidMode(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FanSpeed {
    Low,
    High,
}

impl FanSpeed {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::High => "high",
        }
    }
}

impl FromStr for FanSpeed {
    type Err = ActuatorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "high" => Ok(Self::High),
            _ => Err(ActuatorError::InvalidFanSpeed(value.to_string())),
        }
    }
}

/// Power, mode and fan speed as reported by the device itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceStatus {
    pub switch: bool,
    pub mode: Option<String>,
    pub fan_speed: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    #[serde(rename = "isOn")]
    pub is_on: bool,
    pub enabled: bool,
    #[serde(rename = "sleepEnabled")]
    pub sleep_enabled: bool,
    #[serde(rename = "sleepTimeActive")]
    pub sleep_time_active: bool,
    #[serde(rename = "sleepOverrideUntil")]
    pub sleep_override_until: Option<String>,
    #[serde(rename = "controlTemp")]
    pub control_temperature: Option<f64>,
    #[serde(rename = "targetTemp")]
    pub target_temperature: f64,
    #[serde(rename = "onAt")]
    pub on_threshold: f64,
    #[serde(rename = "offAt")]
    pub off_threshold: f64,
    pub phase: &'static str,
    #[serde(rename = "phaseStartedAt")]
    pub phase_started_at: String,
    #[serde(rename = "phaseAgeSecs")]
    pub phase_age_secs: u64,
    #[serde(rename = "dwellRemainingSecs")]
    pub dwell_remaining_secs: u64,
    pub mode: Option<String>,
    #[serde(rename = "fanSpeed")]
    pub fan_speed: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_modes_case_insensitively() {
        assert_eq!(" Cold ".parse::<AcMode>().unwrap(), AcMode::Cold);
        assert_eq!("WIND".parse::<AcMode>().unwrap(), AcMode::Wind);
        assert!(matches!(
            "heat".parse::<AcMode>(),
            Err(ActuatorError::InvalidMode(_))
        ));
    }

    #[test]
    fn parses_fan_speeds() {
        assert_eq!("high".parse::<FanSpeed>().unwrap(), FanSpeed::High);
        assert!(matches!(
            "turbo".parse::<FanSpeed>(),
            Err(ActuatorError::InvalidFanSpeed(_))
        ));
    }

    #[test]
    fn phase_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Phase::On).unwrap(), "\"on\"");
        assert_eq!(
            serde_json::from_str::<Phase>("\"off\"").unwrap(),
            Phase::Off
        );
    }
}
