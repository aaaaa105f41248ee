use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActuatorError {
    #[error("invalid mode `{0}` (expected cold, wet or wind)")]
    InvalidMode(String),
    #[error("invalid fan speed `{0}` (expected low or high)")]
    InvalidFanSpeed(String),
    #[error("device setpoint {celsius} is outside 16..=31")]
    TemperatureOutOfRange { celsius: i32 },
    #[error("device command failed: {0}")]
    Device(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
    #[error("invalid time `{value}` (expected HH:MM)")]
    InvalidTime { value: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("config store io: {0}")]
    Io(#[from] std::io::Error),
    #[error("config store serialization: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Actuator(#[from] ActuatorError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
