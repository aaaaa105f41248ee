/// Sensors publish to `thermostat/sensor/<location>/temperature`.
pub const TOPIC_SENSOR_TEMP_WILDCARD: &str = "thermostat/sensor/+/temperature";
pub const TOPIC_SENSOR_PREFIX: &str = "thermostat/sensor/";
pub const TOPIC_SENSOR_TEMP_SUFFIX: &str = "/temperature";

pub const TOPIC_CONTROLLER_STATE: &str = "thermostat/controller/state";
pub const TOPIC_CONTROLLER_EVENT_PREFIX: &str = "thermostat/controller/event/";

pub const TOPIC_CMD_WILDCARD: &str = "thermostat/cmnd/ac/#";
pub const TOPIC_CMD_POWER: &str = "thermostat/cmnd/ac/power";
pub const TOPIC_CMD_ENGINE: &str = "thermostat/cmnd/ac/engine";
pub const TOPIC_CMD_SETPOINT: &str = "thermostat/cmnd/ac/setpoint";
pub const TOPIC_CMD_HYSTERESIS: &str = "thermostat/cmnd/ac/hysteresis";
pub const TOPIC_CMD_MIN_ON: &str = "thermostat/cmnd/ac/min_on";
pub const TOPIC_CMD_MIN_OFF: &str = "thermostat/cmnd/ac/min_off";
pub const TOPIC_CMD_POLL_INTERVAL: &str = "thermostat/cmnd/ac/poll_interval";
pub const TOPIC_CMD_SMOOTHING: &str = "thermostat/cmnd/ac/smoothing";
pub const TOPIC_CMD_MAX_STALE: &str = "thermostat/cmnd/ac/max_stale";
pub const TOPIC_CMD_LOCATIONS: &str = "thermostat/cmnd/ac/locations";
pub const TOPIC_CMD_ENGAGE_SETPOINT: &str = "thermostat/cmnd/ac/engage_setpoint";
pub const TOPIC_CMD_MODE: &str = "thermostat/cmnd/ac/mode";
pub const TOPIC_CMD_FAN: &str = "thermostat/cmnd/ac/fan";
pub const TOPIC_CMD_SLEEP: &str = "thermostat/cmnd/ac/sleep";
pub const TOPIC_CMD_SLEEP_TIMES: &str = "thermostat/cmnd/ac/sleep_times";
pub const TOPIC_CMD_SLEEP_SCHEDULE: &str = "thermostat/cmnd/ac/sleep_schedule";
pub const TOPIC_CMD_SLEEP_OVERRIDE: &str = "thermostat/cmnd/ac/sleep_override";

/// Flips the simulated unit's power as if someone used the physical remote.
pub const TOPIC_SIM_REMOTE: &str = "thermostat/sim/ac/remote";

pub fn event_topic(event: &str) -> String {
    format!("{TOPIC_CONTROLLER_EVENT_PREFIX}{event}")
}

/// The location segment of a sensor temperature topic.
pub fn sensor_location(topic: &str) -> Option<&str> {
    let location = topic
        .strip_prefix(TOPIC_SENSOR_PREFIX)?
        .strip_suffix(TOPIC_SENSOR_TEMP_SUFFIX)?;
    (!location.is_empty() && !location.contains('/')).then_some(location)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_sensor_location() {
        assert_eq!(
            sensor_location("thermostat/sensor/bedroom/temperature"),
            Some("bedroom")
        );
        assert_eq!(sensor_location("thermostat/sensor//temperature"), None);
        assert_eq!(sensor_location("thermostat/sensor/a/b/temperature"), None);
        assert_eq!(sensor_location("thermostat/sensor/bedroom/humidity"), None);
    }

    #[test]
    fn builds_event_topics() {
        assert_eq!(
            event_topic("power_status"),
            "thermostat/controller/event/power_status"
        );
    }
}
