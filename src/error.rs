//! Error types for the Payroll Computation Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while finalizing payroll.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the Payroll Computation Engine.
///
/// Every failure is local to a single employee/period operation; batch runs
/// report one of these per failed entry and carry on with the rest.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::InvalidInput {
///     field: "hourly_rate".to_string(),
///     message: "must not be negative".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid input 'hourly_rate': must not be negative");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed or out-of-domain input, raised at the stage that detects it.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The input field that was rejected.
        field: String,
        /// A description of what made the input invalid.
        message: String,
    },

    /// An internal contract was violated; the operation aborts without persisting.
    #[error("Invariant violation: {message}")]
    InvariantViolation {
        /// A description of the violated invariant.
        message: String,
    },

    /// Another finalize operation for the same payslip key is in flight.
    #[error("Concurrent update in progress for payslip {key}")]
    ConcurrentUpdate {
        /// The payslip key that is locked.
        key: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but is semantically unusable.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// A description of the problem.
        message: String,
    },

    /// No income tax table is in force on the given date.
    #[error("No tax table in force on {date}")]
    TaxTableNotFound {
        /// The date for which a table was requested.
        date: NaiveDate,
    },

    /// No payslip exists for the requested key.
    #[error("Payslip not found: {key}")]
    PayslipNotFound {
        /// The payslip key that was looked up.
        key: String,
    },

    /// The payslip store failed to read or write.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the storage failure.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for building an [`EngineError::InvalidInput`].
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for building an [`EngineError::InvariantViolation`].
    pub fn invariant(message: impl Into<String>) -> Self {
        EngineError::InvariantViolation {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_displays_field_and_message() {
        let error = EngineError::invalid_input("period", "must be 1 or 2, got 3");
        assert_eq!(
            error.to_string(),
            "Invalid input 'period': must be 1 or 2, got 3"
        );
    }

    #[test]
    fn test_invariant_violation_displays_message() {
        let error = EngineError::invariant("gross pay is negative");
        assert_eq!(error.to_string(), "Invariant violation: gross pay is negative");
    }

    #[test]
    fn test_concurrent_update_displays_key() {
        let error = EngineError::ConcurrentUpdate {
            key: "emp_001/2026-01/1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Concurrent update in progress for payslip emp_001/2026-01/1"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_tax_table_not_found_displays_date() {
        let error = EngineError::TaxTableNotFound {
            date: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
        };
        assert_eq!(error.to_string(), "No tax table in force on 2019-01-01");
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn rejects() -> EngineResult<()> {
            Err(EngineError::invalid_input("hourly_rate", "negative"))
        }

        fn propagates() -> EngineResult<()> {
            rejects()?;
            Ok(())
        }

        assert!(matches!(
            propagates(),
            Err(EngineError::InvalidInput { .. })
        ));
    }
}
