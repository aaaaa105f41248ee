use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DwellGuard {
    last_change_at: DateTime<Utc>,
}

impl DwellGuard {
    pub fn new(last_change_at: DateTime<Utc>) -> Self {
        Self { last_change_at }
    }

    pub fn last_change_at(&self) -> DateTime<Utc> {
        self.last_change_at
    }

    // Clock stepped backwards reads as zero.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> f64 {
        ((now - self.last_change_at).num_milliseconds() as f64 / 1000.0).max(0.0)
    }

    pub fn remaining_secs(&self, now: DateTime<Utc>, min_secs: u64) -> f64 {
        (min_secs as f64 - self.elapsed_secs(now)).max(0.0)
    }

    pub fn can_turn_on(&self, now: DateTime<Utc>, min_off_secs: u64, sleeping: bool) -> bool {
        !sleeping && self.elapsed_secs(now) >= min_off_secs as f64
    }

    pub fn can_turn_off(&self, now: DateTime<Utc>, min_on_secs: u64) -> bool {
        self.elapsed_secs(now) >= min_on_secs as f64
    }

    pub fn record(&mut self, now: DateTime<Utc>) {
        self.last_change_at = now;
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap() + Duration::seconds(secs)
    }

    #[test]
    fn off_guard_waits_for_min_on() {
        let guard = DwellGuard::new(t(10));
        assert!(!guard.can_turn_off(t(249), 240));
        assert!(guard.can_turn_off(t(250), 240));
        assert_eq!(guard.remaining_secs(t(20), 240), 230.0);
    }

    #[test]
    fn sleep_blocks_turning_on_regardless_of_elapsed() {
        let guard = DwellGuard::new(t(0));
        assert!(guard.can_turn_on(t(300), 240, false));
        assert!(!guard.can_turn_on(t(300), 240, true));
        assert!(!guard.can_turn_on(t(100), 240, false));
    }

    #[test]
    fn zero_dwell_allows_immediate_change() {
        let guard = DwellGuard::new(t(5));
        assert!(guard.can_turn_on(t(5), 0, false));
        assert!(guard.can_turn_off(t(5), 0));
    }

    #[test]
    fn backwards_clock_never_satisfies_guard() {
        let mut guard = DwellGuard::new(t(0));
        guard.record(t(1_000));
        assert_eq!(guard.elapsed_secs(t(500)), 0.0);
        assert!(!guard.can_turn_off(t(500), 1));
        assert_eq!(guard.last_change_at(), t(1_000));
    }
}
