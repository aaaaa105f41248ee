use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::{
    aggregator::TemperatureAggregator,
    config::{SleepWindow, ThermostatConfig, WeeklySleep},
    dwell::DwellGuard,
    error::{ActuatorError, ConfigError, EngineError},
    phase::PhaseTracker,
    schedule::{self, parse_hhmm},
    traits::{
        Actuator, ConfigStore, NoopSink, NotificationSink, SensorSource, EVENT_CONFIG_STATUS,
        EVENT_DEVICE_STATE, EVENT_ENGINE_STATUS, EVENT_POWER_STATUS, EVENT_SLEEP_STATUS,
    },
    types::{AcMode, EngineStatus, FanSpeed, Phase, DEVICE_MAX_CELSIUS, DEVICE_MIN_CELSIUS},
};

pub const MAX_SLEEP_OVERRIDE_MINUTES: u64 = 7 * 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    Disabled,
    Sleeping { turned_off: bool },
    NoTemperature,
    TurnedOn { temperature: f64 },
    TurnedOff { temperature: f64 },
    /// Inside the dead band, or a dwell guard is holding the current state.
    Holding { temperature: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransitionSource {
    Engine,
    Sleep,
    External,
    Manual,
}

impl TransitionSource {
    fn as_str(self) -> &'static str {
        match self {
            Self::Engine => "engine",
            Self::Sleep => "sleep",
            Self::External => "external",
            Self::Manual => "manual",
        }
    }
}

pub struct ThermostatEngine<A, S, C, N = NoopSink> {
    config: ThermostatConfig,
    actuator: A,
    sensors: S,
    store: C,
    notifier: N,
    default_location: String,

    is_on: bool,
    phase: PhaseTracker,
    dwell: DwellGuard,
    aggregator: TemperatureAggregator,

    sleep_override_until: Option<DateTime<Utc>>,
    in_sleep_window: bool,
    control_temperature: Option<f64>,

    // Cached for observers only.
    mode: Option<String>,
    fan_speed: Option<String>,
}

impl<A, S, C, N> ThermostatEngine<A, S, C, N>
where
    A: Actuator,
    S: SensorSource,
    C: ConfigStore,
    N: NotificationSink,
{
    pub fn open(
        actuator: A,
        sensors: S,
        store: C,
        notifier: N,
        default_location: impl Into<String>,
        now: DateTime<FixedOffset>,
    ) -> Self {
        let config = match store.load() {
            Ok(Some(config)) => config,
            Ok(None) => {
                info!("no persisted thermostat config; seeding defaults");
                ThermostatConfig::default()
            }
            Err(err) => {
                warn!("failed to load thermostat config: {err}; using defaults");
                ThermostatConfig::default()
            }
        };
        Self::new(config, actuator, sensors, store, notifier, default_location, now)
    }

    pub fn new(
        mut config: ThermostatConfig,
        mut actuator: A,
        sensors: S,
        store: C,
        notifier: N,
        default_location: impl Into<String>,
        now: DateTime<FixedOffset>,
    ) -> Self {
        let default_location = default_location.into();
        config.sanitize();
        if config.control_locations.is_empty() {
            config.control_locations = vec![default_location.clone()];
        }

        let status = match actuator.get_status() {
            Ok(status) => Some(status),
            Err(err) => {
                warn!("device status unavailable at startup: {err}; trusting persisted phase");
                None
            }
        };
        let actual = status
            .as_ref()
            .map(|status| Phase::from_power(status.switch))
            .or(config.current_phase)
            .unwrap_or(Phase::Off);

        let restored = PhaseTracker::restore(
            config.current_phase,
            config.phase_started_at.as_deref(),
            actual,
            now,
        );
        let tracker = restored.tracker;

        let mut engine = Self {
            aggregator: TemperatureAggregator::new(config.smoothing_window),
            in_sleep_window: schedule::is_sleep_time(&config, &now),
            config,
            actuator,
            sensors,
            store,
            notifier,
            default_location,
            is_on: actual.is_on(),
            phase: tracker,
            dwell: DwellGuard::new(tracker.started_at()),
            sleep_override_until: None,
            control_temperature: None,
            mode: status.as_ref().and_then(|status| status.mode.clone()),
            fan_speed: status.and_then(|status| status.fan_speed),
        };

        if restored.reset {
            engine.persist();
        } else {
            engine.sync_phase_fields();
        }

        info!(
            "current phase={} age={} min since {}",
            tracker.phase().label(),
            tracker.age_secs(now) / 60,
            tracker.started_at_string()
        );
        engine
    }

    pub fn config(&self) -> &ThermostatConfig {
        &self.config
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn is_enabled(&self) -> bool {
        self.config.engine_enabled
    }

    pub fn phase(&self) -> &PhaseTracker {
        &self.phase
    }

    pub fn last_change_at(&self) -> DateTime<Utc> {
        self.dwell.last_change_at()
    }

    pub fn control_temperature(&self) -> Option<f64> {
        self.control_temperature
    }

    pub fn sleep_override_until(&self) -> Option<DateTime<Utc>> {
        self.sleep_override_until
    }

    pub fn mode(&self) -> Option<&str> {
        self.mode.as_deref()
    }

    pub fn fan_speed(&self) -> Option<&str> {
        self.fan_speed.as_deref()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.config.poll_interval_seconds)
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn actuator_mut(&mut self) -> &mut A {
        &mut self.actuator
    }

    pub fn sensors_mut(&mut self) -> &mut S {
        &mut self.sensors
    }

    pub fn store(&self) -> &C {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// One control pass. Only actuator command failures are returned; the
    /// tracked state is untouched in that case so the next pass retries.
    pub fn step(&mut self, now: DateTime<FixedOffset>) -> Result<StepOutcome, EngineError> {
        self.reconcile(now);

        if !self.config.engine_enabled {
            debug!("engine disabled; skipping control");
            return Ok(StepOutcome::Disabled);
        }

        if let Some(turned_off) = self.enforce_sleep(now)? {
            return Ok(StepOutcome::Sleeping { turned_off });
        }

        let now_utc = now.with_timezone(&Utc);
        let Some(temperature) = self.aggregator.sample(
            &self.sensors,
            &self.config.control_locations,
            self.config.max_staleness_seconds,
            now_utc,
        ) else {
            warn!("no valid temperature (missing or stale); skipping");
            self.control_temperature = None;
            return Ok(StepOutcome::NoTemperature);
        };
        self.control_temperature = Some(temperature);

        let on_at = self.config.on_threshold();
        let off_at = self.config.off_threshold();
        debug!(
            "setpoint={:.2} deadband={:.2} on_at={on_at:.2} off_at={off_at:.2} temp={temperature:.2}",
            self.config.target_temperature,
            self.config.pos_hysteresis + self.config.neg_hysteresis,
        );

        if !self.is_on {
            if temperature >= on_at && self.can_turn_on(now) {
                let ended = self.apply_power(Phase::On, now)?;
                info!(
                    "ON trigger: temp={temperature:.2} >= {on_at:.2}; turned on after {} min",
                    ended / 60
                );
                self.force_engage_setpoint();
                self.emit_power(ended, TransitionSource::Engine);
                return Ok(StepOutcome::TurnedOn { temperature });
            }

            let mut reasons = Vec::new();
            if temperature < on_at {
                reasons.push(format!("temp {temperature:.2} < on_at {on_at:.2}"));
            }
            let wait = self.dwell.remaining_secs(now_utc, self.config.min_off_seconds);
            if wait > 0.0 {
                reasons.push(format!("min-off {wait:.0}s"));
            }
            debug!("staying OFF: {}", reasons.join(", "));
        } else {
            if temperature <= off_at && self.can_turn_off(now) {
                let ended = self.apply_power(Phase::Off, now)?;
                info!(
                    "OFF trigger: temp={temperature:.2} <= {off_at:.2}; turned off after {} min",
                    ended / 60
                );
                self.emit_power(ended, TransitionSource::Engine);
                return Ok(StepOutcome::TurnedOff { temperature });
            }

            let mut reasons = Vec::new();
            if temperature > off_at {
                reasons.push(format!("temp {temperature:.2} > off_at {off_at:.2}"));
            }
            let wait = self.dwell.remaining_secs(now_utc, self.config.min_on_seconds);
            if wait > 0.0 {
                reasons.push(format!("min-on {wait:.0}s"));
            }
            debug!("staying ON: {}", reasons.join(", "));
        }

        Ok(StepOutcome::Holding { temperature })
    }

    pub fn is_sleep_time(&self, now: DateTime<FixedOffset>) -> bool {
        if !self.config.sleep_active {
            return false;
        }
        if let Some(until) = self.sleep_override_until {
            if now.with_timezone(&Utc) < until {
                return false;
            }
        }
        schedule::is_sleep_time(&self.config, &now)
    }

    pub fn can_turn_on(&self, now: DateTime<FixedOffset>) -> bool {
        self.dwell.can_turn_on(
            now.with_timezone(&Utc),
            self.config.min_off_seconds,
            self.is_sleep_time(now),
        )
    }

    pub fn can_turn_off(&self, now: DateTime<FixedOffset>) -> bool {
        self.dwell
            .can_turn_off(now.with_timezone(&Utc), self.config.min_on_seconds)
    }

    pub fn status(&self, now: DateTime<FixedOffset>) -> EngineStatus {
        let now_utc = now.with_timezone(&Utc);
        let dwell_min = if self.is_on {
            self.config.min_on_seconds
        } else {
            self.config.min_off_seconds
        };

        EngineStatus {
            is_on: self.is_on,
            enabled: self.config.engine_enabled,
            sleep_enabled: self.config.sleep_active,
            sleep_time_active: self.is_sleep_time(now),
            sleep_override_until: self.override_hhmm(now),
            control_temperature: self.control_temperature,
            target_temperature: self.config.target_temperature,
            on_threshold: self.config.on_threshold(),
            off_threshold: self.config.off_threshold(),
            phase: self.phase.phase().as_str(),
            phase_started_at: self.phase.started_at_string(),
            phase_age_secs: self.phase.age_secs(now),
            dwell_remaining_secs: self.dwell.remaining_secs(now_utc, dwell_min).ceil() as u64,
            mode: self.mode.clone(),
            fan_speed: self.fan_speed.clone(),
        }
    }

    // --- Configuration mutators ---

    pub fn set_setpoint(&mut self, celsius: f64) -> Result<(), ConfigError> {
        if !celsius.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "target_temperature",
                reason: "must be a finite number",
            });
        }
        self.config.target_temperature = celsius;
        self.config_changed();
        Ok(())
    }

    pub fn set_hysteresis_split(&mut self, pos: f64, neg: f64) -> Result<(), ConfigError> {
        for (field, value) in [("pos_hysteresis", pos), ("neg_hysteresis", neg)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be a non-negative number",
                });
            }
        }
        self.config.pos_hysteresis = pos;
        self.config.neg_hysteresis = neg;
        self.config_changed();
        Ok(())
    }

    /// Splits a total dead band evenly around the setpoint.
    pub fn set_hysteresis(&mut self, deadband: f64) -> Result<(), ConfigError> {
        if !deadband.is_finite() || deadband < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "hysteresis",
                reason: "must be a non-negative number",
            });
        }
        let half = deadband / 2.0;
        self.set_hysteresis_split(half, half)
    }

    pub fn set_min_on_seconds(&mut self, seconds: u64) {
        self.config.min_on_seconds = seconds;
        self.config_changed();
    }

    pub fn set_min_off_seconds(&mut self, seconds: u64) {
        self.config.min_off_seconds = seconds;
        self.config_changed();
    }

    pub fn set_poll_interval_seconds(&mut self, seconds: u64) -> Result<(), ConfigError> {
        if seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poll_interval_seconds",
                reason: "must be greater than zero",
            });
        }
        self.config.poll_interval_seconds = seconds;
        self.config_changed();
        Ok(())
    }

    pub fn set_smoothing_window(&mut self, window: usize) -> Result<(), ConfigError> {
        if window == 0 {
            return Err(ConfigError::InvalidValue {
                field: "smoothing_window",
                reason: "must be at least 1",
            });
        }
        self.config.smoothing_window = window;
        self.aggregator.resize(window);
        self.config_changed();
        Ok(())
    }

    pub fn set_max_staleness_seconds(&mut self, seconds: Option<u64>) {
        self.config.max_staleness_seconds = seconds;
        self.config_changed();
    }

    pub fn set_control_locations(&mut self, locations: Vec<String>) {
        let mut names: Vec<String> = Vec::with_capacity(locations.len());
        for location in locations {
            let trimmed = location.trim();
            if !trimmed.is_empty() && !names.iter().any(|known| known == trimmed) {
                names.push(trimmed.to_string());
            }
        }
        if names.is_empty() {
            names.push(self.default_location.clone());
        }
        self.config.control_locations = names;
        self.config_changed();
    }

    pub fn set_engage_setpoint(&mut self, celsius: Option<i32>) -> Result<(), ConfigError> {
        if let Some(value) = celsius {
            if !(DEVICE_MIN_CELSIUS..=DEVICE_MAX_CELSIUS).contains(&value) {
                return Err(ConfigError::InvalidValue {
                    field: "engage_setpoint_celsius",
                    reason: "must be within the device range 16..=31",
                });
            }
        }
        self.config.engage_setpoint_celsius = celsius;
        self.config_changed();
        Ok(())
    }

    pub fn set_sleep_enabled(
        &mut self,
        enabled: bool,
        now: DateTime<FixedOffset>,
    ) -> Result<(), EngineError> {
        self.config.sleep_active = enabled;
        self.sleep_changed(now)
    }

    pub fn set_sleep_times(
        &mut self,
        start: Option<String>,
        stop: Option<String>,
        now: DateTime<FixedOffset>,
    ) -> Result<(), EngineError> {
        let start = validated_time(start)?;
        let stop = validated_time(stop)?;
        self.config.sleep_start = start;
        self.config.sleep_stop = stop;
        self.sleep_changed(now)
    }

    pub fn set_sleep_schedule(
        &mut self,
        schedule: WeeklySleep,
        now: DateTime<FixedOffset>,
    ) -> Result<(), EngineError> {
        let mut normalized = WeeklySleep::new();
        for (day, window) in schedule {
            normalized.insert(
                day,
                SleepWindow {
                    start: validated_time(window.start)?,
                    stop: validated_time(window.stop)?,
                },
            );
        }
        self.config.sleep_weekly = (!normalized.is_empty()).then_some(normalized);
        self.sleep_changed(now)
    }

    pub fn disable_sleep_for(
        &mut self,
        minutes: u64,
        now: DateTime<FixedOffset>,
    ) -> Result<(), EngineError> {
        if minutes == 0 || minutes > MAX_SLEEP_OVERRIDE_MINUTES {
            return Err(ConfigError::InvalidValue {
                field: "sleep_override_minutes",
                reason: "must be between 1 and 10080",
            }
            .into());
        }
        let until = now + chrono::Duration::minutes(minutes as i64);
        self.sleep_override_until = Some(until.with_timezone(&Utc));
        info!(
            "sleep override enabled for {minutes} min (until {})",
            until.format("%H:%M")
        );

        self.in_sleep_window = self.is_sleep_time(now);
        self.emit_sleep_status(now);
        self.enforce_sleep_if_enabled(now)
    }

    pub fn enable(&mut self) {
        self.set_engine_enabled(true);
    }

    pub fn disable(&mut self) {
        self.set_engine_enabled(false);
    }

    // --- Operator commands ---

    /// Works while the engine is disabled and resets the dwell origin.
    pub fn set_power(&mut self, on: bool, now: DateTime<FixedOffset>) -> Result<(), EngineError> {
        let target = Phase::from_power(on);
        if self.is_on == on {
            // Re-assert without starting a new phase.
            command_power(&mut self.actuator, target)?;
            self.emit_power(0, TransitionSource::Manual);
            return Ok(());
        }
        let ended = self.apply_power(target, now)?;
        info!("manual power {}; previous phase lasted {} min", target.label(), ended / 60);
        self.emit_power(ended, TransitionSource::Manual);
        Ok(())
    }

    pub fn set_mode(&mut self, mode: AcMode) -> Result<(), EngineError> {
        self.actuator.set_mode(mode)?;
        self.mode = Some(mode.as_str().to_string());
        self.emit_device_state();
        Ok(())
    }

    pub fn set_fan_speed(&mut self, speed: FanSpeed) -> Result<(), EngineError> {
        self.actuator.set_fan_speed(speed)?;
        self.fan_speed = Some(speed.as_str().to_string());
        self.emit_device_state();
        Ok(())
    }

    // --- internals ---

    fn reconcile(&mut self, now: DateTime<FixedOffset>) {
        let status = match self.actuator.get_status() {
            Ok(status) => status,
            Err(err) => {
                warn!("device status query failed at step start: {err}");
                return;
            }
        };

        if status.switch != self.is_on {
            info!(
                "device state changed externally -> {}",
                Phase::from_power(status.switch).label()
            );
            self.is_on = status.switch;
            let ended = self.record_transition(now);
            self.dwell.record(now.with_timezone(&Utc));
            self.emit_power(ended, TransitionSource::External);
        }

        let mut changed = false;
        if let Some(mode) = status.mode {
            if self.mode.as_ref() != Some(&mode) {
                self.mode = Some(mode);
                changed = true;
            }
        }
        if let Some(fan_speed) = status.fan_speed {
            if self.fan_speed.as_ref() != Some(&fan_speed) {
                self.fan_speed = Some(fan_speed);
                changed = true;
            }
        }
        if changed {
            self.emit_device_state();
        }
    }

    /// `None` when outside sleep time; otherwise whether an OFF was issued.
    fn enforce_sleep(&mut self, now: DateTime<FixedOffset>) -> Result<Option<bool>, EngineError> {
        if !self.refresh_sleep_window(now) {
            return Ok(None);
        }

        if !self.is_on {
            debug!("sleep active; staying OFF");
            return Ok(Some(false));
        }

        if !self.can_turn_off(now) {
            let wait = self
                .dwell
                .remaining_secs(now.with_timezone(&Utc), self.config.min_on_seconds);
            debug!("sleep active; waiting min-on {wait:.0}s before OFF");
            return Ok(Some(false));
        }

        info!("sleep active; turning OFF");
        let ended = self.apply_power(Phase::Off, now)?;
        self.emit_power(ended, TransitionSource::Sleep);
        Ok(Some(true))
    }

    fn enforce_sleep_if_enabled(&mut self, now: DateTime<FixedOffset>) -> Result<(), EngineError> {
        if self.config.engine_enabled {
            self.enforce_sleep(now)?;
        }
        Ok(())
    }

    fn refresh_sleep_window(&mut self, now: DateTime<FixedOffset>) -> bool {
        if let Some(until) = self.sleep_override_until {
            if now.with_timezone(&Utc) >= until {
                info!("sleep override expired");
                self.sleep_override_until = None;
            }
        }

        let sleeping = self.is_sleep_time(now);
        if sleeping != self.in_sleep_window {
            info!(
                "{} sleep time window",
                if sleeping { "ENTERING" } else { "EXITING" }
            );
            self.in_sleep_window = sleeping;
            self.emit_sleep_status(now);
        }
        sleeping
    }

    fn sleep_changed(&mut self, now: DateTime<FixedOffset>) -> Result<(), EngineError> {
        self.persist();
        self.in_sleep_window = self.is_sleep_time(now);
        self.emit_sleep_status(now);
        self.enforce_sleep_if_enabled(now)
    }

    // State moves only once the device accepted the command.
    fn apply_power(&mut self, target: Phase, now: DateTime<FixedOffset>) -> Result<u64, EngineError> {
        command_power(&mut self.actuator, target)?;
        self.is_on = target.is_on();
        let ended = self.record_transition(now);
        self.dwell.record(now.with_timezone(&Utc));
        Ok(ended)
    }

    fn record_transition(&mut self, now: DateTime<FixedOffset>) -> u64 {
        let ended = self
            .phase
            .record_transition(Phase::from_power(self.is_on), now);
        self.persist();
        ended
    }

    fn force_engage_setpoint(&mut self) {
        let Some(celsius) = self.config.engage_setpoint_celsius else {
            return;
        };
        match self.actuator.set_temperature(celsius) {
            Ok(()) => debug!("device setpoint forced to {celsius}"),
            Err(err) => warn!("failed to force device setpoint to {celsius}: {err}"),
        }
    }

    fn set_engine_enabled(&mut self, enabled: bool) {
        self.config.engine_enabled = enabled;
        self.persist();
        info!("engine {}", if enabled { "enabled" } else { "disabled" });
        self.notifier.notify(
            EVENT_ENGINE_STATUS,
            &json!({ "enabled": enabled }),
        );
    }

    fn sync_phase_fields(&mut self) {
        self.config.current_phase = Some(self.phase.phase());
        self.config.phase_started_at = Some(self.phase.started_at_string());
    }

    fn persist(&mut self) {
        self.sync_phase_fields();
        if let Err(err) = self.store.save(&self.config) {
            warn!("failed to persist thermostat config: {err}");
        }
    }

    fn config_changed(&mut self) {
        self.persist();
        self.notifier
            .notify(EVENT_CONFIG_STATUS, &self.config_payload());
    }

    fn config_payload(&self) -> Value {
        json!({
            "setpoint_c": self.config.target_temperature,
            "pos_hysteresis": self.config.pos_hysteresis,
            "neg_hysteresis": self.config.neg_hysteresis,
            "min_on_s": self.config.min_on_seconds,
            "min_off_s": self.config.min_off_seconds,
            "poll_interval_s": self.config.poll_interval_seconds,
            "smooth_window": self.config.smoothing_window,
            "max_stale_s": self.config.max_staleness_seconds,
            "control_locations": self.config.control_locations,
            "engage_setpoint_c": self.config.engage_setpoint_celsius,
        })
    }

    fn override_hhmm(&self, now: DateTime<FixedOffset>) -> Option<String> {
        self.sleep_override_until
            .filter(|until| now.with_timezone(&Utc) < *until)
            .map(|until| until.with_timezone(now.offset()).format("%H:%M").to_string())
    }

    fn emit_sleep_status(&self, now: DateTime<FixedOffset>) {
        let mut payload = json!({
            "sleep_enabled": self.config.sleep_active,
            "sleep_start": self.config.sleep_start,
            "sleep_stop": self.config.sleep_stop,
            "sleep_time_active": self.is_sleep_time(now),
        });
        if let Some(map) = payload.as_object_mut() {
            if let Some(Ok(weekly)) = self.config.sleep_weekly.as_ref().map(serde_json::to_value) {
                map.insert("sleep_schedule".to_string(), weekly);
            }
            if let Some(until) = self.override_hhmm(now) {
                map.insert("sleep_override_until".to_string(), Value::String(until));
            }
        }
        self.notifier.notify(EVENT_SLEEP_STATUS, &payload);
    }

    fn emit_power(&self, ended_secs: u64, source: TransitionSource) {
        let previous_minutes = (ended_secs >= 60).then_some(ended_secs / 60);
        self.notifier.notify(
            EVENT_POWER_STATUS,
            &json!({
                "is_on": self.is_on,
                "source": source.as_str(),
                "previous_phase_minutes": previous_minutes,
            }),
        );
    }

    fn emit_device_state(&self) {
        self.notifier.notify(
            EVENT_DEVICE_STATE,
            &json!({ "mode": self.mode, "fan_speed": self.fan_speed }),
        );
    }
}

fn command_power<A: Actuator>(actuator: &mut A, target: Phase) -> Result<(), ActuatorError> {
    match target {
        Phase::On => actuator.turn_on(),
        Phase::Off => actuator.turn_off(),
    }
}

fn validated_time(value: Option<String>) -> Result<Option<String>, ConfigError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match parse_hhmm(trimmed) {
        Some(minutes) => Ok(Some(format!("{:02}:{:02}", minutes / 60, minutes % 60))),
        None => Err(ConfigError::InvalidTime { value: raw }),
    }
}
