//! Attendance records handed over by the time-clock subsystem.
//!
//! Records are read-only input to the payroll engine. Instants are local
//! wall-clock times; timezone and DST handling belong to whoever produced them.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// One clock-in/clock-out session for one employee.
///
/// # Example
///
/// ```
/// use payroll_engine::models::AttendanceRecord;
/// use chrono::NaiveDateTime;
///
/// let record = AttendanceRecord {
///     id: Some("att_001".to_string()),
///     employee_id: "emp_001".to_string(),
///     clock_in: NaiveDateTime::parse_from_str("2026-01-05 09:00", "%Y-%m-%d %H:%M").unwrap(),
///     clock_out: Some(NaiveDateTime::parse_from_str("2026-01-05 18:00", "%Y-%m-%d %H:%M").unwrap()),
///     break_minutes: 60,
///     total_worked_minutes: None,
/// };
/// assert_eq!(record.worked_minutes().unwrap(), Some(480));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Identifier assigned by the time-clock subsystem, if any.
    #[serde(default)]
    pub id: Option<String>,
    /// The employee who clocked in.
    pub employee_id: String,
    /// Clock-in instant.
    pub clock_in: NaiveDateTime,
    /// Clock-out instant; `None` while the session is still open.
    #[serde(default)]
    pub clock_out: Option<NaiveDateTime>,
    /// Accumulated break minutes for the session.
    #[serde(default)]
    pub break_minutes: i64,
    /// Worked minutes as computed by the time clock; `None` while open.
    #[serde(default)]
    pub total_worked_minutes: Option<i64>,
}

impl AttendanceRecord {
    /// A short label for log and error messages.
    pub fn label(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("{}@{}", self.employee_id, self.clock_in),
        }
    }

    /// Returns the worked minutes of a closed session, or `None` if it is open.
    ///
    /// When the time clock did not record a total, it is derived as the
    /// session span minus break minutes.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if clock-out is not strictly after clock-in, or if any
    /// minute count is negative.
    pub fn worked_minutes(&self) -> EngineResult<Option<i64>> {
        if self.break_minutes < 0 {
            return Err(EngineError::invalid_input(
                "break_minutes",
                format!("record {} has negative break minutes", self.label()),
            ));
        }

        let Some(clock_out) = self.clock_out else {
            return Ok(None);
        };

        if clock_out <= self.clock_in {
            return Err(EngineError::invalid_input(
                "clock_out",
                format!(
                    "record {} clocks out at {} which is not after clock-in {}",
                    self.label(),
                    clock_out,
                    self.clock_in
                ),
            ));
        }

        let worked = match self.total_worked_minutes {
            Some(total) => total,
            None => (clock_out - self.clock_in).num_minutes() - self.break_minutes,
        };

        if worked < 0 {
            return Err(EngineError::invalid_input(
                "total_worked_minutes",
                format!("record {} has negative worked minutes ({})", self.label(), worked),
            ));
        }

        Ok(Some(worked))
    }
}

/// Read-only attendance query exposed by the time-clock subsystem.
pub trait AttendanceSource: Send + Sync {
    /// Returns the records for `employee_id` clocked in between `start` and
    /// `end`, both inclusive.
    fn records_for(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<AttendanceRecord>>;
}

impl AttendanceSource for Vec<AttendanceRecord> {
    fn records_for(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        Ok(self
            .iter()
            .filter(|r| {
                let day = r.clock_in.date();
                r.employee_id == employee_id && day >= start && day <= end
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn closed(clock_in: &str, clock_out: &str) -> AttendanceRecord {
        AttendanceRecord {
            id: None,
            employee_id: "emp_001".to_string(),
            clock_in: make_datetime(clock_in),
            clock_out: Some(make_datetime(clock_out)),
            break_minutes: 0,
            total_worked_minutes: None,
        }
    }

    #[test]
    fn test_open_session_has_no_worked_minutes() {
        let mut record = closed("2026-01-05 09:00", "2026-01-05 17:00");
        record.clock_out = None;
        assert_eq!(record.worked_minutes().unwrap(), None);
    }

    #[test]
    fn test_recorded_total_takes_precedence() {
        let mut record = closed("2026-01-05 09:00", "2026-01-05 17:00");
        record.total_worked_minutes = Some(450);
        assert_eq!(record.worked_minutes().unwrap(), Some(450));
    }

    #[test]
    fn test_derived_total_subtracts_breaks() {
        let mut record = closed("2026-01-05 22:00", "2026-01-06 07:00");
        record.break_minutes = 30;
        assert_eq!(record.worked_minutes().unwrap(), Some(510));
    }

    #[test]
    fn test_clock_out_before_clock_in_rejected() {
        let record = closed("2026-01-05 17:00", "2026-01-05 09:00");
        assert!(matches!(
            record.worked_minutes(),
            Err(EngineError::InvalidInput { ref field, .. }) if field == "clock_out"
        ));
    }

    #[test]
    fn test_zero_length_session_rejected() {
        let record = closed("2026-01-05 09:00", "2026-01-05 09:00");
        assert!(record.worked_minutes().is_err());
    }

    #[test]
    fn test_breaks_longer_than_session_rejected() {
        let mut record = closed("2026-01-05 09:00", "2026-01-05 10:00");
        record.break_minutes = 90;
        assert!(matches!(
            record.worked_minutes(),
            Err(EngineError::InvalidInput { ref field, .. }) if field == "total_worked_minutes"
        ));
    }

    #[test]
    fn test_label_prefers_id() {
        let mut record = closed("2026-01-05 09:00", "2026-01-05 17:00");
        assert_eq!(record.label(), "emp_001@2026-01-05 09:00:00");
        record.id = Some("att_42".to_string());
        assert_eq!(record.label(), "att_42");
    }

    #[test]
    fn test_vec_source_filters_by_employee_and_range() {
        let mut other = closed("2026-01-06 09:00", "2026-01-06 17:00");
        other.employee_id = "emp_002".to_string();
        let source = vec![
            closed("2026-01-05 09:00", "2026-01-05 17:00"),
            closed("2026-01-20 09:00", "2026-01-20 17:00"),
            other,
        ];

        let found = source
            .records_for(
                "emp_001",
                NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            )
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].clock_in, make_datetime("2026-01-05 09:00"));
    }

    #[test]
    fn test_deserializes_open_session_without_optional_fields() {
        let json = r#"{
            "employee_id": "emp_001",
            "clock_in": "2026-01-05T09:00:00"
        }"#;
        let record: AttendanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.clock_out, None);
        assert_eq!(record.break_minutes, 0);
    }
}
