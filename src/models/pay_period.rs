//! Half-month pay periods.
//!
//! This module contains the [`HalfPeriod`] and [`PayPeriod`] types that define
//! the semi-monthly payout cadence: the 1st to the 15th, and the 16th to the
//! last day of the month.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::AttendanceRecord;

const FIRST_HALF_LAST_DAY: u32 = 15;

/// Which half of the month a pay period covers.
///
/// Serialized as the integer `1` or `2`.
///
/// # Example
///
/// ```
/// use payroll_engine::models::HalfPeriod;
///
/// assert_eq!(HalfPeriod::try_from(2).unwrap(), HalfPeriod::Second);
/// assert!(HalfPeriod::try_from(3).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HalfPeriod {
    /// The 1st to the 15th.
    First,
    /// The 16th to the last day of the month.
    Second,
}

impl TryFrom<u8> for HalfPeriod {
    type Error = EngineError;

    fn try_from(value: u8) -> EngineResult<Self> {
        match value {
            1 => Ok(HalfPeriod::First),
            2 => Ok(HalfPeriod::Second),
            other => Err(EngineError::invalid_input(
                "period",
                format!("must be 1 or 2, got {}", other),
            )),
        }
    }
}

impl From<HalfPeriod> for u8 {
    fn from(half: HalfPeriod) -> u8 {
        match half {
            HalfPeriod::First => 1,
            HalfPeriod::Second => 2,
        }
    }
}

impl fmt::Display for HalfPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// A half-month pay period with its inclusive date range.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{HalfPeriod, PayPeriod};
/// use chrono::NaiveDate;
///
/// let period = PayPeriod::new(2, 2028, HalfPeriod::Second).unwrap();
/// assert_eq!(period.start_date(), NaiveDate::from_ymd_opt(2028, 2, 16).unwrap());
/// assert_eq!(period.end_date(), NaiveDate::from_ymd_opt(2028, 2, 29).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PayPeriod {
    month: u32,
    year: i32,
    half: HalfPeriod,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl PayPeriod {
    /// Creates the pay period for the given month (1-12), year and half.
    pub fn new(month: u32, year: i32, half: HalfPeriod) -> EngineResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::invalid_input(
                "month",
                format!("must be between 1 and 12, got {}", month),
            ));
        }

        let first_of_month = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| EngineError::invalid_input("year", format!("{} is out of range", year)))?;

        let (start_date, end_date) = match half {
            HalfPeriod::First => (
                first_of_month,
                first_of_month.with_day(FIRST_HALF_LAST_DAY).ok_or_else(|| {
                    EngineError::invalid_input("month", "has no 15th day".to_string())
                })?,
            ),
            HalfPeriod::Second => {
                let start = first_of_month.with_day(FIRST_HALF_LAST_DAY + 1).ok_or_else(|| {
                    EngineError::invalid_input("month", "has no 16th day".to_string())
                })?;
                (start, last_day_of_month(first_of_month)?)
            }
        };

        Ok(Self {
            month,
            year,
            half,
            start_date,
            end_date,
        })
    }

    /// The calendar month, 1-12.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Which half of the month this period covers.
    pub fn half(&self) -> HalfPeriod {
        self.half
    }

    /// First day of the period (inclusive).
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Last day of the period (inclusive).
    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Checks if a given date falls within this pay period (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Selects the records belonging to `employee_id` whose clock-in date lies
    /// inside this period.
    ///
    /// This is the one place attendance is bucketed by date. A session that
    /// crosses midnight belongs to the day it was clocked in on.
    pub fn select_records(
        &self,
        employee_id: &str,
        records: &[AttendanceRecord],
    ) -> Vec<AttendanceRecord> {
        records
            .iter()
            .filter(|r| r.employee_id == employee_id && self.contains_date(r.clock_in.date()))
            .cloned()
            .collect()
    }
}

impl fmt::Display for PayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}/{}", self.year, self.month, self.half)
    }
}

fn last_day_of_month(first_of_month: NaiveDate) -> EngineResult<NaiveDate> {
    let (year, month) = if first_of_month.month() == 12 {
        (first_of_month.year() + 1, 1)
    } else {
        (first_of_month.year(), first_of_month.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| EngineError::invalid_input("year", format!("{} is out of range", year)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn make_record(employee_id: &str, clock_in: &str) -> AttendanceRecord {
        AttendanceRecord {
            id: None,
            employee_id: employee_id.to_string(),
            clock_in: NaiveDateTime::parse_from_str(clock_in, "%Y-%m-%d %H:%M").unwrap(),
            clock_out: None,
            break_minutes: 0,
            total_worked_minutes: None,
        }
    }

    #[test]
    fn test_first_half_covers_1st_to_15th() {
        let period = PayPeriod::new(1, 2026, HalfPeriod::First).unwrap();
        assert_eq!(period.start_date(), make_date("2026-01-01"));
        assert_eq!(period.end_date(), make_date("2026-01-15"));
    }

    #[test]
    fn test_second_half_ends_on_last_day() {
        let period = PayPeriod::new(4, 2026, HalfPeriod::Second).unwrap();
        assert_eq!(period.start_date(), make_date("2026-04-16"));
        assert_eq!(period.end_date(), make_date("2026-04-30"));

        let december = PayPeriod::new(12, 2026, HalfPeriod::Second).unwrap();
        assert_eq!(december.end_date(), make_date("2026-12-31"));
    }

    #[test]
    fn test_february_non_leap_year() {
        let period = PayPeriod::new(2, 2026, HalfPeriod::Second).unwrap();
        assert_eq!(period.end_date(), make_date("2026-02-28"));
    }

    #[test]
    fn test_invalid_month_rejected() {
        assert!(matches!(
            PayPeriod::new(13, 2026, HalfPeriod::First),
            Err(EngineError::InvalidInput { ref field, .. }) if field == "month"
        ));
        assert!(PayPeriod::new(0, 2026, HalfPeriod::First).is_err());
    }

    #[test]
    fn test_half_period_serde_as_integer() {
        assert_eq!(serde_json::to_string(&HalfPeriod::Second).unwrap(), "2");
        let parsed: HalfPeriod = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, HalfPeriod::First);
        assert!(serde_json::from_str::<HalfPeriod>("3").is_err());
    }

    #[test]
    fn test_contains_date_is_inclusive() {
        let period = PayPeriod::new(1, 2026, HalfPeriod::Second).unwrap();
        assert!(period.contains_date(make_date("2026-01-16")));
        assert!(period.contains_date(make_date("2026-01-31")));
        assert!(!period.contains_date(make_date("2026-01-15")));
        assert!(!period.contains_date(make_date("2026-02-01")));
    }

    #[test]
    fn test_select_records_filters_employee_and_clock_in_date() {
        let period = PayPeriod::new(1, 2026, HalfPeriod::First).unwrap();
        let records = vec![
            make_record("emp_001", "2026-01-05 09:00"),
            make_record("emp_002", "2026-01-05 09:00"),
            make_record("emp_001", "2026-01-15 22:00"),
            make_record("emp_001", "2026-01-16 08:00"),
            make_record("emp_001", "2025-12-31 22:00"),
        ];

        let selected = period.select_records("emp_001", &records);

        assert_eq!(selected.len(), 2);
        assert!(selected.iter().all(|r| r.employee_id == "emp_001"));
        assert_eq!(selected[1].clock_in.date(), make_date("2026-01-15"));
    }

    #[test]
    fn test_display() {
        let period = PayPeriod::new(3, 2026, HalfPeriod::Second).unwrap();
        assert_eq!(period.to_string(), "2026-03/2");
    }
}
