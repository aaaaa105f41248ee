pub mod aggregator;
pub mod config;
pub mod dwell;
pub mod error;
pub mod phase;
pub mod schedule;
pub mod thermostat;
pub mod topics;
pub mod traits;
pub mod types;

pub use aggregator::TemperatureAggregator;
pub use config::{NetworkConfig, RuntimeConfig, SleepWindow, ThermostatConfig, WeeklySleep};
pub use dwell::DwellGuard;
pub use error::{ActuatorError, ConfigError, EngineError, StoreError};
pub use phase::PhaseTracker;
pub use schedule::DayOfWeek;
pub use thermostat::{StepOutcome, ThermostatEngine, MAX_SLEEP_OVERRIDE_MINUTES};
pub use topics::*;
pub use traits::{Actuator, ConfigStore, NoopSink, NotificationSink, SensorSource};
pub use types::{AcMode, DeviceStatus, EngineStatus, FanSpeed, Phase, Reading};
