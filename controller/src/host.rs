use std::{ops::RangeInclusive, str::FromStr, sync::Arc, time::Duration};

use anyhow::{bail, Context};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use chrono_tz::Tz;
use rumqttc::{AsyncClient, Event, Incoming, MqttOptions, QoS};
use serde::Deserialize;
use tokio::{
    sync::{watch, Mutex},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use ac_thermostat_common::{
    sensor_location, AcMode, Actuator, ConfigStore, EngineError, FanSpeed, NotificationSink,
    Reading, RuntimeConfig, SensorSource, SleepWindow, ThermostatEngine, WeeklySleep,
    TOPIC_CMD_ENGAGE_SETPOINT, TOPIC_CMD_ENGINE, TOPIC_CMD_FAN, TOPIC_CMD_HYSTERESIS,
    TOPIC_CMD_LOCATIONS, TOPIC_CMD_MAX_STALE, TOPIC_CMD_MIN_OFF, TOPIC_CMD_MIN_ON,
    TOPIC_CMD_MODE, TOPIC_CMD_POLL_INTERVAL, TOPIC_CMD_POWER, TOPIC_CMD_SETPOINT,
    TOPIC_CMD_SLEEP, TOPIC_CMD_SLEEP_OVERRIDE, TOPIC_CMD_SLEEP_SCHEDULE, TOPIC_CMD_SLEEP_TIMES,
    TOPIC_CMD_SMOOTHING, TOPIC_CMD_WILDCARD, TOPIC_CONTROLLER_STATE, TOPIC_SENSOR_TEMP_WILDCARD,
    TOPIC_SIM_REMOTE,
};

use crate::{
    device::{MqttNotifier, SensorCache, SimulatedAc},
    store::JsonFileStore,
};

type Engine = ThermostatEngine<SimulatedAc, SensorCache, JsonFileStore, MqttNotifier>;

const MAX_MQTT_PAYLOAD_BYTES: usize = 4096;
const SENSOR_RANGE_C: RangeInclusive<f64> = -40.0..=85.0;
const MAX_SENSOR_CLOCK_SKEW_SECS: i64 = 5;

#[derive(Clone)]
struct AppState {
    engine: Arc<Mutex<Engine>>,
    timezone: Tz,
    mqtt: AsyncClient,
    status_interval: Duration,
}

/// Operator commands, one per `thermostat/cmnd/ac/...` topic.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Power(bool),
    Engine(bool),
    Setpoint(f64),
    Deadband(f64),
    HysteresisSplit { pos: f64, neg: f64 },
    MinOn(u64),
    MinOff(u64),
    PollInterval(u64),
    Smoothing(usize),
    MaxStale(Option<u64>),
    Locations(Vec<String>),
    EngageSetpoint(Option<i32>),
    Mode(AcMode),
    Fan(FanSpeed),
    Sleep(bool),
    SleepTimes(SleepWindow),
    SleepSchedule(WeeklySleep),
    SleepOverride(u64),
}

#[derive(Debug, Deserialize)]
struct HysteresisUpdate {
    pos: f64,
    neg: f64,
}

#[derive(Debug, Deserialize)]
struct SensorPayload {
    value: f64,
    #[serde(default)]
    timestamp: Option<String>,
}

pub async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let store = JsonFileStore::from_env();
    let mut runtime = store.load_runtime().unwrap_or_else(|err| {
        warn!(
            "failed to load runtime config from {}: {err}",
            store.runtime_path().display()
        );
        RuntimeConfig::default()
    });
    if let Ok(timezone) = std::env::var("THERMOSTAT_TIMEZONE") {
        runtime.timezone = timezone;
    }
    if let Ok(location) = std::env::var("THERMOSTAT_LOCATION") {
        runtime.default_location = location;
    }
    let timezone = parse_timezone(&runtime.timezone);

    let mqtt_host = std::env::var("MQTT_HOST").unwrap_or(runtime.network.mqtt_host.clone());
    let mqtt_port = std::env::var("MQTT_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(runtime.network.mqtt_port);

    let mut mqtt_options = MqttOptions::new("ac-thermostat-controller", mqtt_host, mqtt_port);
    mqtt_options.set_keep_alive(Duration::from_secs(30));
    let mqtt_user = std::env::var("MQTT_USER").unwrap_or(runtime.network.mqtt_user.clone());
    let mqtt_pass = std::env::var("MQTT_PASS").unwrap_or(runtime.network.mqtt_pass.clone());
    if !mqtt_user.is_empty() {
        mqtt_options.set_credentials(mqtt_user, mqtt_pass);
    }

    let (mqtt, eventloop) = AsyncClient::new(mqtt_options, 64);

    let engine = ThermostatEngine::open(
        SimulatedAc::default(),
        SensorCache::default(),
        store,
        MqttNotifier::new(mqtt.clone()),
        runtime.default_location.clone(),
        now_in_timezone(&timezone),
    );

    let app_state = AppState {
        engine: Arc::new(Mutex::new(engine)),
        timezone,
        mqtt,
        status_interval: Duration::from_secs(runtime.status_publish_interval_secs.max(1)),
    };

    subscribe_topics(&app_state.mqtt).await?;
    spawn_mqtt_loop(app_state.clone(), eventloop);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let control = spawn_control_loop(app_state.clone(), shutdown_rx.clone());
    let publisher = spawn_state_publish_loop(app_state.clone(), shutdown_rx);

    info!(
        "controller running (timezone {}, default location {})",
        app_state.timezone.name(),
        runtime.default_location
    );

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    info!("shutdown requested");

    if shutdown_tx.send(true).is_err() {
        debug!("control loops already stopped");
    }
    control.await.context("control loop panicked")?;
    publisher.await.context("state publisher panicked")?;

    if let Err(err) = app_state.mqtt.disconnect().await {
        debug!("mqtt disconnect failed: {err}");
    }
    Ok(())
}

async fn subscribe_topics(mqtt: &AsyncClient) -> anyhow::Result<()> {
    let topics = [
        TOPIC_SENSOR_TEMP_WILDCARD,
        TOPIC_CMD_WILDCARD,
        TOPIC_SIM_REMOTE,
    ];

    for topic in topics {
        mqtt.subscribe(topic, QoS::AtMostOnce).await?;
    }
    Ok(())
}

fn spawn_mqtt_loop(app_state: AppState, mut eventloop: rumqttc::EventLoop) {
    tokio::spawn(async move {
        loop {
            match eventloop.poll().await {
                Ok(Event::Incoming(Incoming::Publish(message))) => {
                    if let Err(err) =
                        handle_mqtt_message(&app_state, message.topic, message.payload.to_vec())
                            .await
                    {
                        warn!("mqtt message handling error: {err:#}");
                    }
                }
                Ok(Event::Incoming(Incoming::ConnAck(_))) => {
                    info!("mqtt connected");
                }
                Ok(_) => {}
                Err(err) => {
                    warn!("mqtt poll error: {err}");
                    tokio::time::sleep(Duration::from_secs(2)).await;
                }
            }
        }
    });
}

/// Steps the engine, then sleeps for the current poll interval or until
/// shutdown, whichever comes first.
fn spawn_control_loop(app_state: AppState, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let interval = {
                let mut engine = app_state.engine.lock().await;
                match engine.step(now_in_timezone(&app_state.timezone)) {
                    Ok(outcome) => debug!("step: {outcome:?}"),
                    Err(err) => warn!("control step failed: {err}; retrying next poll"),
                }
                engine.poll_interval()
            };

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = shutdown.changed() => break,
            }
        }
        info!("control loop stopped");
    })
}

fn spawn_state_publish_loop(
    app_state: AppState,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(app_state.status_interval);
        loop {
            tokio::select! {
                _ = interval.tick() => {}
                _ = shutdown.changed() => break,
            }

            let payload = {
                let engine = app_state.engine.lock().await;
                serde_json::to_vec(&engine.status(now_in_timezone(&app_state.timezone)))
            };

            match payload {
                Ok(body) => {
                    if let Err(err) = app_state
                        .mqtt
                        .publish(TOPIC_CONTROLLER_STATE, QoS::AtLeastOnce, true, body)
                        .await
                    {
                        warn!("controller state publish failed: {err}");
                    }
                }
                Err(err) => warn!("controller state serialization failed: {err}"),
            }
        }
    })
}

async fn handle_mqtt_message(
    app_state: &AppState,
    topic: String,
    payload: Vec<u8>,
) -> anyhow::Result<()> {
    if payload.len() > MAX_MQTT_PAYLOAD_BYTES {
        warn!(
            "dropping oversized MQTT payload on topic {} ({} bytes)",
            topic,
            payload.len()
        );
        return Ok(());
    }

    let message = String::from_utf8(payload).context("non utf8 mqtt payload")?;

    if let Some(location) = sensor_location(&topic) {
        let reading = parse_reading(&message, Utc::now())
            .with_context(|| format!("bad reading on {topic}"))?;
        let mut engine = app_state.engine.lock().await;
        engine.sensors_mut().record(location, reading);
        return Ok(());
    }

    if topic == TOPIC_SIM_REMOTE {
        let power = match message.trim() {
            "" | "toggle" => None,
            other => Some(parse_switch(other)?),
        };
        let is_on = app_state
            .engine
            .lock()
            .await
            .actuator_mut()
            .press_remote(power);
        info!(
            "simulated remote pressed; unit is {}",
            if is_on { "ON" } else { "OFF" }
        );
        return Ok(());
    }

    let Some(command) = parse_command(&topic, &message)? else {
        debug!("ignoring message on {topic}");
        return Ok(());
    };
    info!("command on {topic}: {command:?}");

    let now = now_in_timezone(&app_state.timezone);
    let mut engine = app_state.engine.lock().await;
    apply_command(&mut *engine, command, now)
        .with_context(|| format!("command on {topic} rejected"))?;
    Ok(())
}

fn parse_command(topic: &str, message: &str) -> anyhow::Result<Option<Command>> {
    let message = message.trim();
    let command = match topic {
        TOPIC_CMD_POWER => Command::Power(parse_switch(message)?),
        TOPIC_CMD_ENGINE => Command::Engine(parse_switch(message)?),
        TOPIC_CMD_SETPOINT => Command::Setpoint(parse_value(message)?),
        TOPIC_CMD_HYSTERESIS if message.starts_with('{') => {
            let update: HysteresisUpdate =
                serde_json::from_str(message).context("invalid hysteresis split")?;
            Command::HysteresisSplit {
                pos: update.pos,
                neg: update.neg,
            }
        }
        TOPIC_CMD_HYSTERESIS => Command::Deadband(parse_value(message)?),
        TOPIC_CMD_MIN_ON => Command::MinOn(parse_value(message)?),
        TOPIC_CMD_MIN_OFF => Command::MinOff(parse_value(message)?),
        TOPIC_CMD_POLL_INTERVAL => Command::PollInterval(parse_value(message)?),
        TOPIC_CMD_SMOOTHING => Command::Smoothing(parse_value(message)?),
        TOPIC_CMD_MAX_STALE => Command::MaxStale(parse_optional(message)?),
        TOPIC_CMD_LOCATIONS => Command::Locations(parse_locations(message)?),
        TOPIC_CMD_ENGAGE_SETPOINT => Command::EngageSetpoint(parse_optional(message)?),
        TOPIC_CMD_MODE => Command::Mode(message.parse()?),
        TOPIC_CMD_FAN => Command::Fan(message.parse()?),
        TOPIC_CMD_SLEEP => Command::Sleep(parse_switch(message)?),
        TOPIC_CMD_SLEEP_TIMES => {
            Command::SleepTimes(serde_json::from_str(message).context("invalid sleep times")?)
        }
        TOPIC_CMD_SLEEP_SCHEDULE => Command::SleepSchedule(
            serde_json::from_str(message).context("invalid weekly sleep schedule")?,
        ),
        TOPIC_CMD_SLEEP_OVERRIDE => Command::SleepOverride(parse_value(message)?),
        _ => return Ok(None),
    };
    Ok(Some(command))
}

fn apply_command<A, S, C, N>(
    engine: &mut ThermostatEngine<A, S, C, N>,
    command: Command,
    now: DateTime<FixedOffset>,
) -> Result<(), EngineError>
where
    A: Actuator,
    S: SensorSource,
    C: ConfigStore,
    N: NotificationSink,
{
    match command {
        Command::Power(on) => engine.set_power(on, now)?,
        Command::Engine(true) => engine.enable(),
        Command::Engine(false) => engine.disable(),
        Command::Setpoint(celsius) => engine.set_setpoint(celsius)?,
        Command::Deadband(deadband) => engine.set_hysteresis(deadband)?,
        Command::HysteresisSplit { pos, neg } => engine.set_hysteresis_split(pos, neg)?,
        Command::MinOn(seconds) => engine.set_min_on_seconds(seconds),
        Command::MinOff(seconds) => engine.set_min_off_seconds(seconds),
        Command::PollInterval(seconds) => engine.set_poll_interval_seconds(seconds)?,
        Command::Smoothing(window) => engine.set_smoothing_window(window)?,
        Command::MaxStale(seconds) => engine.set_max_staleness_seconds(seconds),
        Command::Locations(locations) => engine.set_control_locations(locations),
        Command::EngageSetpoint(celsius) => engine.set_engage_setpoint(celsius)?,
        Command::Mode(mode) => engine.set_mode(mode)?,
        Command::Fan(speed) => engine.set_fan_speed(speed)?,
        Command::Sleep(enabled) => engine.set_sleep_enabled(enabled, now)?,
        Command::SleepTimes(SleepWindow { start, stop }) => {
            engine.set_sleep_times(start, stop, now)?
        }
        Command::SleepSchedule(schedule) => engine.set_sleep_schedule(schedule, now)?,
        Command::SleepOverride(minutes) => engine.disable_sleep_for(minutes, now)?,
    }
    Ok(())
}

/// A bare number stamped with `received_at`, or `{"value": .., "timestamp": ..}`
/// with an optional RFC 3339 timestamp.
fn parse_reading(message: &str, received_at: DateTime<Utc>) -> anyhow::Result<Reading> {
    let message = message.trim();
    let (value, timestamp) = if message.starts_with('{') {
        let payload: SensorPayload =
            serde_json::from_str(message).context("invalid sensor payload")?;
        let timestamp = match payload.timestamp.as_deref() {
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .with_context(|| format!("invalid sensor timestamp `{raw}`"))?
                .with_timezone(&Utc),
            None => received_at,
        };
        (payload.value, timestamp)
    } else {
        (parse_value::<f64>(message)?, received_at)
    };

    if !value.is_finite() || !SENSOR_RANGE_C.contains(&value) {
        bail!("temperature {value} outside plausible range");
    }

    // A fast sensor clock must not pin the cache or dodge the staleness limit.
    let latest_allowed = received_at + chrono::Duration::seconds(MAX_SENSOR_CLOCK_SKEW_SECS);
    let timestamp = if timestamp > latest_allowed {
        warn!("sensor timestamp {timestamp} is ahead of receipt time; using receipt time");
        received_at
    } else {
        timestamp
    };
    Ok(Reading { value, timestamp })
}

fn parse_switch(message: &str) -> anyhow::Result<bool> {
    match message.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "1" | "enable" | "enabled" => Ok(true),
        "off" | "false" | "0" | "disable" | "disabled" => Ok(false),
        other => bail!("expected on/off, got `{other}`"),
    }
}

fn parse_value<T>(message: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    message
        .trim()
        .parse::<T>()
        .with_context(|| format!("invalid value `{message}`"))
}

/// `none`, `off`, `null` or an empty payload clear the setting.
fn parse_optional<T>(message: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match message.trim().to_ascii_lowercase().as_str() {
        "" | "none" | "off" | "null" => Ok(None),
        _ => parse_value(message).map(Some),
    }
}

fn parse_locations(message: &str) -> anyhow::Result<Vec<String>> {
    if message.starts_with('[') {
        return serde_json::from_str(message).context("invalid location list");
    }
    Ok(message.split(',').map(|name| name.trim().to_string()).collect())
}

fn parse_timezone(name: &str) -> Tz {
    match name.parse::<Tz>() {
        Ok(timezone) => timezone,
        Err(_) => {
            warn!("unknown timezone `{name}`; falling back to UTC");
            Tz::UTC
        }
    }
}

fn now_in_timezone(timezone: &Tz) -> DateTime<FixedOffset> {
    let local = Utc::now().with_timezone(timezone);
    local.with_timezone(&local.offset().fix())
}

#[cfg(test)]
mod tests {
    use ac_thermostat_common::{DayOfWeek, NoopSink, Phase, ThermostatConfig};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    type TestEngine = ThermostatEngine<SimulatedAc, SensorCache, JsonFileStore, NoopSink>;

    // Monday Jan 5, 2026, 12:00 UTC.
    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 1, 5, 12, 0, 0)
            .unwrap()
    }

    fn engine(dir: &tempfile::TempDir) -> TestEngine {
        let config = ThermostatConfig {
            sleep_active: false,
            smoothing_window: 1,
            current_phase: Some(Phase::Off),
            phase_started_at: Some((now() - chrono::Duration::hours(1)).to_rfc3339()),
            ..ThermostatConfig::default()
        };
        ThermostatEngine::new(
            config,
            SimulatedAc::default(),
            SensorCache::default(),
            JsonFileStore::new(dir.path()),
            NoopSink,
            "livingroom",
            now(),
        )
    }

    fn command(topic: &str, message: &str) -> Command {
        parse_command(topic, message).unwrap().unwrap()
    }

    #[test]
    fn parses_scalar_commands() {
        assert_eq!(command(TOPIC_CMD_POWER, "ON"), Command::Power(true));
        assert_eq!(command(TOPIC_CMD_ENGINE, "disable"), Command::Engine(false));
        assert_eq!(command(TOPIC_CMD_SETPOINT, " 23.5 "), Command::Setpoint(23.5));
        assert_eq!(command(TOPIC_CMD_HYSTERESIS, "1.0"), Command::Deadband(1.0));
        assert_eq!(
            command(TOPIC_CMD_HYSTERESIS, r#"{"pos": 0.3, "neg": 0.7}"#),
            Command::HysteresisSplit { pos: 0.3, neg: 0.7 }
        );
        assert_eq!(command(TOPIC_CMD_MIN_ON, "300"), Command::MinOn(300));
        assert_eq!(command(TOPIC_CMD_MAX_STALE, "none"), Command::MaxStale(None));
        assert_eq!(
            command(TOPIC_CMD_MAX_STALE, "90"),
            Command::MaxStale(Some(90))
        );
        assert_eq!(
            command(TOPIC_CMD_ENGAGE_SETPOINT, "off"),
            Command::EngageSetpoint(None)
        );
        assert_eq!(command(TOPIC_CMD_MODE, "Wind"), Command::Mode(AcMode::Wind));
        assert_eq!(command(TOPIC_CMD_FAN, "high"), Command::Fan(FanSpeed::High));
        assert_eq!(
            command(TOPIC_CMD_SLEEP_OVERRIDE, "45"),
            Command::SleepOverride(45)
        );
    }

    #[test]
    fn parses_structured_commands() {
        assert_eq!(
            command(TOPIC_CMD_LOCATIONS, "bedroom, kitchen"),
            Command::Locations(vec!["bedroom".to_string(), "kitchen".to_string()])
        );
        assert_eq!(
            command(TOPIC_CMD_LOCATIONS, r#"["office"]"#),
            Command::Locations(vec!["office".to_string()])
        );
        assert_eq!(
            command(TOPIC_CMD_SLEEP_TIMES, r#"{"start": "22:30", "stop": null}"#),
            Command::SleepTimes(SleepWindow {
                start: Some("22:30".to_string()),
                stop: None,
            })
        );

        let mut weekly = WeeklySleep::new();
        weekly.insert(
            DayOfWeek::Fri,
            SleepWindow {
                start: Some("23:00".to_string()),
                stop: Some("08:00".to_string()),
            },
        );
        assert_eq!(
            command(
                TOPIC_CMD_SLEEP_SCHEDULE,
                r#"{"fri": {"start": "23:00", "stop": "08:00"}}"#
            ),
            Command::SleepSchedule(weekly)
        );
    }

    #[test]
    fn rejects_malformed_commands() {
        assert!(parse_command(TOPIC_CMD_POWER, "maybe").is_err());
        assert!(parse_command(TOPIC_CMD_SETPOINT, "warm").is_err());
        assert!(parse_command(TOPIC_CMD_MIN_ON, "-5").is_err());
        assert!(parse_command(TOPIC_CMD_MODE, "heat").is_err());
        assert!(parse_command(TOPIC_CMD_SLEEP_SCHEDULE, r#"{"someday": {}}"#).is_err());
        assert!(parse_command("thermostat/cmnd/ac/unknown", "1")
            .unwrap()
            .is_none());
    }

    #[test]
    fn parses_sensor_payloads() {
        let received = Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap();

        let plain = parse_reading("22.75", received).unwrap();
        assert_eq!(plain.value, 22.75);
        assert_eq!(plain.timestamp, received);

        let stamped = parse_reading(
            r#"{"value": 21.0, "timestamp": "2026-01-05T13:59:00+02:00"}"#,
            received,
        )
        .unwrap();
        assert_eq!(stamped.value, 21.0);
        assert_eq!(
            stamped.timestamp,
            Utc.with_ymd_and_hms(2026, 1, 5, 11, 59, 0).unwrap()
        );

        assert_eq!(
            parse_reading(r#"{"value": 20.5}"#, received).unwrap().timestamp,
            received
        );
        assert!(parse_reading("NaN", received).is_err());
        assert!(parse_reading("150", received).is_err());
        assert!(parse_reading(r#"{"value": 20, "timestamp": "soon"}"#, received).is_err());
    }

    #[test]
    fn future_sensor_stamps_are_clamped_to_receipt() {
        let received = Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap();

        let slightly_ahead = parse_reading(
            r#"{"value": 21.0, "timestamp": "2026-01-05T12:00:03Z"}"#,
            received,
        )
        .unwrap();
        assert_eq!(
            slightly_ahead.timestamp,
            Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 3).unwrap()
        );

        let far_ahead = parse_reading(
            r#"{"value": 30.0, "timestamp": "2026-01-05T13:00:00Z"}"#,
            received,
        )
        .unwrap();
        assert_eq!(far_ahead.timestamp, received);

        let mut cache = SensorCache::default();
        cache.record("livingroom", far_ahead);
        let fresh = parse_reading("20.0", received + chrono::Duration::minutes(1)).unwrap();
        cache.record("livingroom", fresh);
        assert_eq!(cache.latest("livingroom").map(|r| r.value), Some(20.0));
    }

    #[test]
    fn commands_drive_engine_and_persist() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine(&dir);

        apply_command(&mut engine, Command::Setpoint(22.0), now()).unwrap();
        apply_command(&mut engine, Command::Deadband(2.0), now()).unwrap();
        apply_command(&mut engine, Command::Power(true), now()).unwrap();

        assert!(engine.is_on());
        assert_eq!(engine.config().on_threshold(), 23.0);

        let persisted = JsonFileStore::new(dir.path()).load().unwrap().unwrap();
        assert_eq!(persisted.target_temperature, 22.0);
        assert_eq!(persisted.current_phase, Some(Phase::On));
    }

    #[test]
    fn invalid_command_values_surface_engine_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine(&dir);

        assert!(matches!(
            apply_command(&mut engine, Command::PollInterval(0), now()),
            Err(EngineError::Config(_))
        ));
        assert!(matches!(
            apply_command(&mut engine, Command::SleepOverride(0), now()),
            Err(EngineError::Config(_))
        ));
        assert_eq!(engine.config().poll_interval_seconds, 15);
    }

    #[test]
    fn remote_press_is_absorbed_on_next_step() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine(&dir);

        engine.actuator_mut().press_remote(Some(true));
        engine.step(now()).unwrap();

        assert!(engine.is_on());
        assert_eq!(engine.last_change_at(), now().with_timezone(&Utc));
    }

    #[test]
    fn sensor_readings_feed_control() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine(&dir);
        let reading = parse_reading("26.0", now().with_timezone(&Utc)).unwrap();
        engine.sensors_mut().record("livingroom", reading);

        engine.step(now()).unwrap();

        assert!(engine.is_on());
        assert_eq!(engine.actuator().setpoint(), Some(16));
    }

    #[test]
    fn unknown_timezone_falls_back_to_utc() {
        assert_eq!(parse_timezone("Mars/Olympus"), Tz::UTC);
        assert_eq!(parse_timezone("Europe/Helsinki"), chrono_tz::Europe::Helsinki);
    }
}
