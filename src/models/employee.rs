//! Employee model and compensation basis.
//!
//! The payroll engine only needs an employee's id and how they are paid.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::Money;

/// How an employee's pay rate is expressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Compensation {
    /// A fixed hourly rate in major currency units.
    Hourly {
        /// The hourly rate.
        rate: Decimal,
    },
    /// A monthly salary in minor units; the hourly rate is derived from it.
    MonthlySalary {
        /// The monthly salary.
        amount: Money,
    },
}

/// Represents an employee being paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// The compensation basis.
    pub compensation: Compensation,
}

impl Employee {
    /// Returns the hourly rate in major units.
    ///
    /// For salaried employees this is `salary / working_days_per_month /
    /// hours_per_day`, unrounded.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{Compensation, Employee, Money};
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     id: "emp_001".to_string(),
    ///     compensation: Compensation::MonthlySalary { amount: Money::from_minor(3_520_000) },
    /// };
    /// let rate = employee.hourly_rate(Decimal::from(22), Decimal::from(8)).unwrap();
    /// assert_eq!(rate, Decimal::from(200));
    /// ```
    pub fn hourly_rate(
        &self,
        working_days_per_month: Decimal,
        hours_per_day: Decimal,
    ) -> EngineResult<Decimal> {
        let rate = match &self.compensation {
            Compensation::Hourly { rate } => *rate,
            Compensation::MonthlySalary { amount } => {
                if working_days_per_month <= Decimal::ZERO || hours_per_day <= Decimal::ZERO {
                    return Err(EngineError::InvalidConfig {
                        message: "working days per month and hours per day must be positive"
                            .to_string(),
                    });
                }
                amount.to_major() / working_days_per_month / hours_per_day
            }
        };

        if rate < Decimal::ZERO {
            return Err(EngineError::invalid_input(
                "hourly_rate",
                format!("employee {} has negative rate {}", self.id, rate),
            ));
        }

        Ok(rate)
    }
}
