//! Night-differential hour counting.
//!
//! A session is walked in whole-hour steps aligned to wall-clock hour
//! boundaries, starting at the first boundary at or after clock-in. Every
//! step that starts before clock-out and inside the night window counts as
//! one night-differential hour.

use chrono::{Duration, NaiveDateTime, Timelike};

use crate::config::NightDifferentialConfig;

/// Returns the first wall-clock hour boundary at or after `instant`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::first_hour_boundary;
/// use chrono::NaiveDateTime;
///
/// let t = NaiveDateTime::parse_from_str("2026-01-05 21:40:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// assert_eq!(first_hour_boundary(t).to_string(), "2026-01-05 22:00:00");
///
/// let on_the_hour = NaiveDateTime::parse_from_str("2026-01-05 22:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// assert_eq!(first_hour_boundary(on_the_hour), on_the_hour);
/// ```
pub fn first_hour_boundary(instant: NaiveDateTime) -> NaiveDateTime {
    let truncated = instant
        - Duration::minutes(i64::from(instant.minute()))
        - Duration::seconds(i64::from(instant.second()))
        - Duration::nanoseconds(i64::from(instant.nanosecond()));

    if truncated == instant {
        instant
    } else {
        truncated + Duration::hours(1)
    }
}

/// Counts the night-differential hour-steps between `clock_in` and `clock_out`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::night_hour_steps;
/// use payroll_engine::config::NightDifferentialConfig;
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let window = NightDifferentialConfig { rate: Decimal::new(10, 2), start_hour: 22, end_hour: 6 };
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap();
///
/// assert_eq!(night_hour_steps(at("2026-01-05 21:00"), at("2026-01-05 23:00"), &window), 1);
/// assert_eq!(night_hour_steps(at("2026-01-05 22:00"), at("2026-01-06 06:00"), &window), 8);
/// ```
pub fn night_hour_steps(
    clock_in: NaiveDateTime,
    clock_out: NaiveDateTime,
    window: &NightDifferentialConfig,
) -> u32 {
    let mut steps = 0;
    let mut cursor = first_hour_boundary(clock_in);

    while cursor < clock_out {
        if window.contains_hour(cursor.hour()) {
            steps += 1;
        }
        cursor += Duration::hours(1);
    }

    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn window() -> NightDifferentialConfig {
        NightDifferentialConfig {
            rate: Decimal::new(10, 2),
            start_hour: 22,
            end_hour: 6,
        }
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    // ==========================================================================
    // NDH-001: 21:00-23:00 - only the 22:00 step qualifies
    // ==========================================================================
    #[test]
    fn test_ndh_001_evening_session_crossing_window_start() {
        assert_eq!(
            night_hour_steps(at("2026-01-05 21:00"), at("2026-01-05 23:00"), &window()),
            1
        );
    }

    // ==========================================================================
    // NDH-002: 22:00-06:00 - full window
    // ==========================================================================
    #[test]
    fn test_ndh_002_full_overnight_window() {
        assert_eq!(
            night_hour_steps(at("2026-01-05 22:00"), at("2026-01-06 06:00"), &window()),
            8
        );
    }

    // ==========================================================================
    // NDH-003: 21:40-23:10 - steps start at 22:00 and 23:00
    // ==========================================================================
    #[test]
    fn test_ndh_003_unaligned_start_walks_from_next_boundary() {
        assert_eq!(
            night_hour_steps(at("2026-01-05 21:40"), at("2026-01-05 23:10"), &window()),
            2
        );
    }

    #[test]
    fn test_day_session_has_no_night_hours() {
        assert_eq!(
            night_hour_steps(at("2026-01-05 09:00"), at("2026-01-05 17:00"), &window()),
            0
        );
    }

    #[test]
    fn test_session_ending_at_window_start_has_no_night_hours() {
        assert_eq!(
            night_hour_steps(at("2026-01-05 14:00"), at("2026-01-05 22:00"), &window()),
            0
        );
    }

    #[test]
    fn test_early_morning_session() {
        // 04:00 and 05:00 qualify, 06:00 onwards does not.
        assert_eq!(
            night_hour_steps(at("2026-01-05 04:00"), at("2026-01-05 12:00"), &window()),
            2
        );
    }

    #[test]
    fn test_partial_last_step_counts() {
        // The 23:00 step starts before clock-out at 23:30.
        assert_eq!(
            night_hour_steps(at("2026-01-05 22:00"), at("2026-01-05 23:30"), &window()),
            2
        );
    }

    #[test]
    fn test_session_shorter_than_an_hour_inside_window() {
        // No hour boundary between 22:10 and 22:50.
        assert_eq!(
            night_hour_steps(at("2026-01-05 22:10"), at("2026-01-05 22:50"), &window()),
            0
        );
    }

    #[test]
    fn test_first_hour_boundary_ignores_seconds() {
        let t = NaiveDateTime::parse_from_str("2026-01-05 21:59:59", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(first_hour_boundary(t), at("2026-01-05 22:00"));
    }

    #[test]
    fn test_first_hour_boundary_crosses_midnight() {
        assert_eq!(
            first_hour_boundary(at("2026-01-05 23:30")),
            at("2026-01-06 00:00")
        );
    }
}
