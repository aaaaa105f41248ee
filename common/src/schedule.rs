use chrono::{DateTime, Datelike, FixedOffset, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{SleepWindow, ThermostatConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl DayOfWeek {
    pub fn from_chrono(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Self::Mon,
            Weekday::Tue => Self::Tue,
            Weekday::Wed => Self::Wed,
            Weekday::Thu => Self::Thu,
            Weekday::Fri => Self::Fri,
            Weekday::Sat => Self::Sat,
            Weekday::Sun => Self::Sun,
        }
    }
}

pub fn parse_hhmm(value: &str) -> Option<u16> {
    let (hours, minutes) = value.trim().split_once(':')?;
    let (hours, minutes) = (hours.trim(), minutes.trim());
    if hours.is_empty()
        || minutes.is_empty()
        || !hours.bytes().all(|b| b.is_ascii_digit())
        || !minutes.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let hours: u16 = hours.parse().ok()?;
    let minutes: u16 = minutes.parse().ok()?;
    if hours >= 24 || minutes >= 60 {
        return None;
    }
    Some(hours * 60 + minutes)
}

pub fn minute_of_day(now: &DateTime<FixedOffset>) -> u16 {
    (now.hour() * 60 + now.minute()) as u16
}

/// Equal bounds describe an empty window; `start > stop` wraps past midnight.
pub fn window_contains(start: u16, stop: u16, minute: u16) -> bool {
    if start == stop {
        false
    } else if start < stop {
        (start..stop).contains(&minute)
    } else {
        minute >= start || minute < stop
    }
}

fn parse_bound(raw: Option<&str>) -> Option<u16> {
    let raw = raw.map(str::trim).filter(|value| !value.is_empty())?;
    let parsed = parse_hhmm(raw);
    if parsed.is_none() {
        warn!("ignoring malformed sleep time `{raw}`");
    }
    parsed
}

fn usable_bounds(start: Option<&str>, stop: Option<&str>) -> Option<(u16, u16)> {
    Some((parse_bound(start)?, parse_bound(stop)?))
}

/// The sleep range in effect for the local day of `now`: the weekly entry for
/// that day when both of its bounds parse, otherwise the single daily window.
pub fn effective_window(config: &ThermostatConfig, now: &DateTime<FixedOffset>) -> Option<(u16, u16)> {
    let day = DayOfWeek::from_chrono(now.weekday());
    let weekly = config
        .sleep_weekly
        .as_ref()
        .and_then(|weekly| weekly.get(&day))
        .and_then(|SleepWindow { start, stop }| usable_bounds(start.as_deref(), stop.as_deref()));

    weekly.or_else(|| usable_bounds(config.sleep_start.as_deref(), config.sleep_stop.as_deref()))
}

// Overrides are runtime state and checked by the engine.
pub fn is_sleep_time(config: &ThermostatConfig, now: &DateTime<FixedOffset>) -> bool {
    if !config.sleep_active {
        return false;
    }

    effective_window(config, now)
        .map(|(start, stop)| window_contains(start, stop, minute_of_day(now)))
        .unwrap_or(false)
}
