use chrono::{DateTime, SecondsFormat, Utc};

use crate::normalize::NormalizedSummary;
use crate::{TestResult, TestTimings};

/// Current UTC time truncated to whole milliseconds.
pub(super) fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

pub(super) fn timings(started: DateTime<Utc>, completed: DateTime<Utc>) -> TestTimings {
    TestTimings {
        started: started.to_rfc3339_opts(SecondsFormat::Millis, true),
        completed: completed.to_rfc3339_opts(SecondsFormat::Millis, true),
        duration: (completed - started).num_milliseconds(),
    }
}

pub(super) fn test_result(normalized: NormalizedSummary, timings: TestTimings) -> TestResult {
    TestResult {
        success: normalized.success(),
        summary: normalized.summary,
        failures: normalized.failures,
        timings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timings_render_iso_millis_and_duration() {
        let started = Utc
            .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .expect("start");
        let completed = started + chrono::Duration::milliseconds(1_250);

        let timings = timings(started, completed);
        assert_eq!(timings.started, "2024-05-01T12:00:00.000Z");
        assert_eq!(timings.completed, "2024-05-01T12:00:01.250Z");
        assert_eq!(timings.duration, 1_250);
    }

    #[test]
    fn now_millis_has_no_sub_millisecond_component() {
        let now = now_millis();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn test_result_takes_success_from_raw_failure_count() {
        let normalized = NormalizedSummary {
            raw_failure_count: 1,
            ..NormalizedSummary::default()
        };
        let started = now_millis();
        let result = test_result(normalized, timings(started, started));
        assert!(!result.success);
        assert!(result.failures.is_empty());
        assert_eq!(result.timings.duration, 0);
    }
}
