use serde_json::Value;

use crate::{
    config::ThermostatConfig,
    error::{ActuatorError, StoreError},
    types::{AcMode, DeviceStatus, FanSpeed, Reading},
};

pub const EVENT_POWER_STATUS: &str = "power_status";
pub const EVENT_ENGINE_STATUS: &str = "engine_status";
pub const EVENT_SLEEP_STATUS: &str = "sleep_status";
pub const EVENT_CONFIG_STATUS: &str = "config_status";
pub const EVENT_DEVICE_STATE: &str = "device_state";

/// The climate device being switched. Every call is synchronous and may fail;
/// a failed command means the transition did not happen.
pub trait Actuator {
    fn turn_on(&mut self) -> Result<(), ActuatorError>;
    fn turn_off(&mut self) -> Result<(), ActuatorError>;
    fn set_mode(&mut self, mode: AcMode) -> Result<(), ActuatorError>;
    fn set_fan_speed(&mut self, speed: FanSpeed) -> Result<(), ActuatorError>;
    /// Device setpoint in whole degrees, valid in 16..=31.
    fn set_temperature(&mut self, celsius: i32) -> Result<(), ActuatorError>;
    fn get_status(&mut self) -> Result<DeviceStatus, ActuatorError>;
}

pub trait SensorSource {
    fn latest(&self, location: &str) -> Option<Reading>;
}

pub trait ConfigStore {
    fn load(&self) -> Result<Option<ThermostatConfig>, StoreError>;
    fn save(&mut self, config: &ThermostatConfig) -> Result<(), StoreError>;
}

/// Fire-and-forget observer channel. Implementations swallow their own
/// delivery failures.
pub trait NotificationSink {
    fn notify(&self, event: &str, payload: &Value);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl NotificationSink for NoopSink {
    fn notify(&self, _event: &str, _payload: &Value) {}
}
