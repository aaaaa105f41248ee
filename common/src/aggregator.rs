use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::traits::SensorSource;

#[derive(Debug, Clone)]
pub struct TemperatureAggregator {
    samples: VecDeque<f64>,
    window: usize,
}

impl TemperatureAggregator {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            samples: VecDeque::with_capacity(window),
            window,
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    pub fn resize(&mut self, window: usize) {
        self.window = window.max(1);
        while self.samples.len() > self.window {
            self.samples.pop_front();
        }
    }

    /// Mean of the fresh per-location readings, or `None` when no location
    /// has a usable reading.
    pub fn current_average<S: SensorSource>(
        sensors: &S,
        locations: &[String],
        max_staleness_seconds: Option<u64>,
        now: DateTime<Utc>,
    ) -> Option<f64> {
        let mut total = 0.0;
        let mut used = 0usize;

        for location in locations {
            let Some(reading) = sensors.latest(location) else {
                continue;
            };
            if !reading.value.is_finite() {
                continue;
            }
            if let Some(limit) = max_staleness_seconds {
                let age_secs = (now - reading.timestamp).num_milliseconds() as f64 / 1000.0;
                if age_secs > limit as f64 {
                    debug!(
                        "skipping stale reading for {location}: age={age_secs:.1}s > {limit}s"
                    );
                    continue;
                }
            }
            total += reading.value;
            used += 1;
        }

        if used == 0 {
            debug!("no fresh readings for control locations {locations:?}");
            return None;
        }
        Some(total / used as f64)
    }

    pub fn sample<S: SensorSource>(
        &mut self,
        sensors: &S,
        locations: &[String],
        max_staleness_seconds: Option<u64>,
        now: DateTime<Utc>,
    ) -> Option<f64> {
        let average = Self::current_average(sensors, locations, max_staleness_seconds, now)?;
        self.push(average);
        let smoothed = self.smoothed()?;
        debug!(
            "control temperature raw={average:.2} smoothed={smoothed:.2} window={}/{}",
            self.samples.len(),
            self.window
        );
        Some(smoothed)
    }

    pub fn push(&mut self, value: f64) {
        if self.samples.len() == self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    pub fn smoothed(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::types::Reading;

    struct MapSensors(HashMap<String, Reading>);

    impl SensorSource for MapSensors {
        fn latest(&self, location: &str) -> Option<Reading> {
            self.0.get(location).copied()
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn sensors(readings: &[(&str, f64, i64)]) -> MapSensors {
        MapSensors(
            readings
                .iter()
                .map(|(location, value, age)| {
                    (
                        location.to_string(),
                        Reading {
                            value: *value,
                            timestamp: now() - Duration::seconds(*age),
                        },
                    )
                })
                .collect(),
        )
    }

    fn locations(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn averages_locations_and_drops_stale() {
        let sensors = sensors(&[("a", 22.0, 10), ("b", 24.0, 30), ("c", 40.0, 500)]);
        let average = TemperatureAggregator::current_average(
            &sensors,
            &locations(&["a", "b", "c", "missing"]),
            Some(120),
            now(),
        );
        assert_eq!(average, Some(23.0));
    }

    #[test]
    fn staleness_filter_can_be_disabled() {
        let sensors = sensors(&[("a", 20.0, 10_000)]);
        assert_eq!(
            TemperatureAggregator::current_average(&sensors, &locations(&["a"]), None, now()),
            Some(20.0)
        );
        assert_eq!(
            TemperatureAggregator::current_average(&sensors, &locations(&["a"]), Some(60), now()),
            None
        );
    }

    #[test]
    fn no_surviving_reading_leaves_queue_untouched() {
        let mut aggregator = TemperatureAggregator::new(3);
        aggregator.push(21.0);
        let sensors = sensors(&[("a", f64::NAN, 0)]);

        assert_eq!(
            aggregator.sample(&sensors, &locations(&["a", "b"]), Some(60), now()),
            None
        );
        assert_eq!(aggregator.samples().collect::<Vec<_>>(), vec![21.0]);
    }

    #[test]
    fn smooths_over_bounded_window() {
        let mut aggregator = TemperatureAggregator::new(3);
        for value in [20.0, 22.0, 24.0, 26.0] {
            aggregator.push(value);
        }
        assert_eq!(aggregator.smoothed(), Some(24.0));
    }

    #[test]
    fn window_of_one_returns_raw_value() {
        let mut aggregator = TemperatureAggregator::new(1);
        let first = sensors(&[("a", 20.0, 0)]);
        let second = sensors(&[("a", 25.5, 0)]);
        let locs = locations(&["a"]);

        assert_eq!(aggregator.sample(&first, &locs, None, now()), Some(20.0));
        assert_eq!(aggregator.sample(&second, &locs, None, now()), Some(25.5));
    }

    #[test]
    fn resize_keeps_most_recent_samples() {
        let mut aggregator = TemperatureAggregator::new(5);
        for value in [1.0, 2.0, 3.0, 4.0, 5.0] {
            aggregator.push(value);
        }
        aggregator.resize(2);
        assert_eq!(aggregator.samples().collect::<Vec<_>>(), vec![4.0, 5.0]);

        aggregator.resize(0);
        assert_eq!(aggregator.window(), 1);
        assert_eq!(aggregator.smoothed(), Some(5.0));
    }
}
