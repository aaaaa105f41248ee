use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use tracing::warn;

use crate::types::Phase;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Accepts RFC 3339 stamps, and offset-less ISO stamps interpreted in `offset`.
pub fn parse_timestamp(raw: &str, offset: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed);
    }
    NAIVE_FORMATS.iter().find_map(|format| {
        let naive = NaiveDateTime::parse_from_str(raw, format).ok()?;
        offset.from_local_datetime(&naive).single()
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseTracker {
    phase: Phase,
    started_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestoredPhase {
    pub tracker: PhaseTracker,
    pub reset: bool,
}

impl PhaseTracker {
    pub fn new(phase: Phase, started_at: DateTime<FixedOffset>) -> Self {
        Self { phase, started_at }
    }

    pub fn restore(
        persisted_phase: Option<Phase>,
        persisted_started_at: Option<&str>,
        actual: Phase,
        now: DateTime<FixedOffset>,
    ) -> RestoredPhase {
        let parsed = persisted_started_at.and_then(|raw| {
            let parsed = parse_timestamp(raw, now.offset());
            if parsed.is_none() {
                warn!("unparsable persisted phase start `{raw}`; resetting to now");
            }
            parsed
        });

        match parsed {
            Some(started_at) if persisted_phase == Some(actual) => RestoredPhase {
                tracker: Self::new(actual, started_at.min(now)),
                reset: false,
            },
            _ => RestoredPhase {
                tracker: Self::new(actual, now),
                reset: true,
            },
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at.with_timezone(&Utc)
    }

    pub fn started_at_string(&self) -> String {
        self.started_at.to_rfc3339()
    }

    pub fn age_secs(&self, now: DateTime<FixedOffset>) -> u64 {
        (now - self.started_at).num_seconds().max(0) as u64
    }

    /// Returns the ended phase's age in seconds.
    pub fn record_transition(&mut self, phase: Phase, now: DateTime<FixedOffset>) -> u64 {
        let ended_age = self.age_secs(now);
        self.phase = phase;
        self.started_at = now;
        ended_age
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    use super::*;

    fn offset() -> FixedOffset {
        FixedOffset::east_opt(3 * 3600).unwrap()
    }

    fn now() -> DateTime<FixedOffset> {
        offset().with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn parses_rfc3339_and_naive_stamps() {
        let zulu = parse_timestamp("2026-06-01T09:00:00Z", &offset()).unwrap();
        assert_eq!(zulu, now());

        let naive = parse_timestamp("2026-06-01T12:00:00", &offset()).unwrap();
        assert_eq!(naive, now());

        let spaced = parse_timestamp("2026-06-01 11:59:30.5", &offset()).unwrap();
        assert_eq!(now() - spaced, Duration::milliseconds(29_500));

        assert_eq!(parse_timestamp("yesterday", &offset()), None);
        assert_eq!(parse_timestamp("  ", &offset()), None);
    }

    #[test]
    fn adopts_matching_persisted_phase() {
        let started = (now() - Duration::minutes(3)).to_rfc3339();
        let restored = PhaseTracker::restore(Some(Phase::On), Some(&started), Phase::On, now());

        assert!(!restored.reset);
        assert_eq!(restored.tracker.phase(), Phase::On);
        assert_eq!(restored.tracker.age_secs(now()), 180);
    }

    #[test]
    fn resets_on_mismatch_missing_or_garbage() {
        let started = (now() - Duration::minutes(3)).to_rfc3339();

        let mismatch = PhaseTracker::restore(Some(Phase::Off), Some(&started), Phase::On, now());
        assert!(mismatch.reset);
        assert_eq!(mismatch.tracker.age_secs(now()), 0);
        assert_eq!(mismatch.tracker.phase(), Phase::On);

        let missing = PhaseTracker::restore(Some(Phase::On), None, Phase::On, now());
        assert!(missing.reset);

        let garbage = PhaseTracker::restore(Some(Phase::On), Some("??"), Phase::On, now());
        assert!(garbage.reset);

        let no_phase = PhaseTracker::restore(None, Some(&started), Phase::Off, now());
        assert!(no_phase.reset);
    }

    #[test]
    fn clamps_future_start_to_now() {
        let future = (now() + Duration::hours(2)).to_rfc3339();
        let restored = PhaseTracker::restore(Some(Phase::Off), Some(&future), Phase::Off, now());

        assert!(!restored.reset);
        assert_eq!(restored.tracker.started_at(), now().with_timezone(&Utc));
    }

    #[test]
    fn record_transition_reports_ended_phase_age() {
        let mut tracker = PhaseTracker::new(Phase::Off, now());
        let later = now() + Duration::seconds(610);

        assert_eq!(tracker.record_transition(Phase::On, later), 610);
        assert_eq!(tracker.phase(), Phase::On);
        assert_eq!(tracker.age_secs(later), 0);
        assert_eq!(tracker.started_at_string(), "2026-06-01T12:10:10+03:00");
    }
}
