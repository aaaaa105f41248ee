use std::collections::HashMap;

use ac_thermostat_common::{
    event_topic,
    types::{DEVICE_MAX_CELSIUS, DEVICE_MIN_CELSIUS},
    AcMode, Actuator, ActuatorError, DeviceStatus, FanSpeed, NotificationSink, Reading,
    SensorSource,
};
use rumqttc::{AsyncClient, QoS};
use serde_json::Value;
use tracing::{debug, info, warn};

/// In-process air conditioner. Commands only log; the remote button lets
/// power change behind the engine's back.
#[derive(Debug, Clone)]
pub struct SimulatedAc {
    status: DeviceStatus,
    setpoint: Option<i32>,
}

impl Default for SimulatedAc {
    fn default() -> Self {
        Self {
            status: DeviceStatus {
                switch: false,
                mode: Some(AcMode::Cold.as_str().to_string()),
                fan_speed: Some(FanSpeed::Low.as_str().to_string()),
            },
            setpoint: None,
        }
    }
}

impl SimulatedAc {
    #[cfg(test)]
    pub fn setpoint(&self) -> Option<i32> {
        self.setpoint
    }

    /// `None` toggles. Returns the resulting power state.
    pub fn press_remote(&mut self, power: Option<bool>) -> bool {
        self.status.switch = power.unwrap_or(!self.status.switch);
        self.status.switch
    }
}

impl Actuator for SimulatedAc {
    fn turn_on(&mut self) -> Result<(), ActuatorError> {
        info!("simulated AC -> ON");
        self.status.switch = true;
        Ok(())
    }

    fn turn_off(&mut self) -> Result<(), ActuatorError> {
        info!("simulated AC -> OFF");
        self.status.switch = false;
        Ok(())
    }

    fn set_mode(&mut self, mode: AcMode) -> Result<(), ActuatorError> {
        info!("simulated AC mode -> {}", mode.as_str());
        self.status.mode = Some(mode.as_str().to_string());
        Ok(())
    }

    fn set_fan_speed(&mut self, speed: FanSpeed) -> Result<(), ActuatorError> {
        info!("simulated AC fan -> {}", speed.as_str());
        self.status.fan_speed = Some(speed.as_str().to_string());
        Ok(())
    }

    fn set_temperature(&mut self, celsius: i32) -> Result<(), ActuatorError> {
        if !(DEVICE_MIN_CELSIUS..=DEVICE_MAX_CELSIUS).contains(&celsius) {
            return Err(ActuatorError::TemperatureOutOfRange { celsius });
        }
        info!("simulated AC setpoint -> {celsius}");
        self.setpoint = Some(celsius);
        Ok(())
    }

    fn get_status(&mut self) -> Result<DeviceStatus, ActuatorError> {
        Ok(self.status.clone())
    }
}

/// Latest reading per location, fed from MQTT.
#[derive(Debug, Clone, Default)]
pub struct SensorCache {
    readings: HashMap<String, Reading>,
}

impl SensorCache {
    /// Out-of-order deliveries never replace a newer reading.
    pub fn record(&mut self, location: &str, reading: Reading) {
        match self.readings.get(location) {
            Some(known) if known.timestamp > reading.timestamp => {
                debug!("dropping out-of-order reading for {location}");
            }
            _ => {
                self.readings.insert(location.to_string(), reading);
            }
        }
    }
}

impl SensorSource for SensorCache {
    fn latest(&self, location: &str) -> Option<Reading> {
        self.readings.get(location).copied()
    }
}

/// Publishes engine events to `thermostat/controller/event/<event>`.
#[derive(Clone)]
pub struct MqttNotifier {
    mqtt: AsyncClient,
}

impl MqttNotifier {
    pub fn new(mqtt: AsyncClient) -> Self {
        Self { mqtt }
    }
}

impl NotificationSink for MqttNotifier {
    fn notify(&self, event: &str, payload: &Value) {
        let body = match serde_json::to_vec(payload) {
            Ok(body) => body,
            Err(err) => {
                warn!("event {event} serialization failed: {err}");
                return;
            }
        };
        if let Err(err) = self
            .mqtt
            .try_publish(event_topic(event), QoS::AtLeastOnce, false, body)
        {
            warn!("event {event} publish failed: {err}");
        }
    }
}
