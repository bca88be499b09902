//! Monetary amounts in minor currency units.
//!
//! All money crossing the engine boundary is an integer number of cents.
//! Intermediate arithmetic (rates, hours, percentages) is done in
//! [`Decimal`] and converted exactly once with [`Money::from_major`].

use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

const MINOR_UNITS_PER_MAJOR: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// An amount of money in minor currency units (cents).
///
/// Serializes as a bare integer.
///
/// # Example
///
/// ```
/// use payroll_engine::models::Money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let amount = Money::from_major(Decimal::from_str("411.54375").unwrap()).unwrap();
/// assert_eq!(amount.minor_units(), 41154);
/// assert_eq!(amount.to_string(), "411.54");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero.
    pub const ZERO: Money = Money(0);

    /// Creates an amount from a number of minor units.
    pub const fn from_minor(minor_units: i64) -> Self {
        Money(minor_units)
    }

    /// Converts a major-unit amount to minor units, rounding half-up to the cent.
    ///
    /// This is the only place monetary values are rounded.
    pub fn from_major(amount: Decimal) -> EngineResult<Self> {
        amount
            .checked_mul(MINOR_UNITS_PER_MAJOR)
            .map(|cents| cents.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|cents| cents.to_i64())
            .map(Money)
            .ok_or_else(|| {
                EngineError::invariant(format!("amount {} is out of range for minor units", amount))
            })
    }

    /// Returns the amount in minor units.
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Returns the amount in major units as an exact decimal.
    pub fn to_major(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Returns true if the amount is below zero.
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Subtracts `other`, flooring the result at zero.
    pub fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0).max(0))
    }

    /// Adds `other`.
    ///
    /// # Errors
    ///
    /// `InvariantViolation` if the sum does not fit in minor units.
    pub fn checked_add(self, other: Money) -> EngineResult<Money> {
        self.0.checked_add(other.0).map(Money).ok_or_else(|| {
            EngineError::invariant(format!("{} + {} overflows minor units", self, other))
        })
    }

    /// Sums `amounts`, failing on the first overflow.
    pub fn checked_sum<I: IntoIterator<Item = Money>>(amounts: I) -> EngineResult<Money> {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, |total, amount| total.checked_add(amount))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_major())
    }
}
