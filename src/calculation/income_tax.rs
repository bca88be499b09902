//! Progressive income tax.
//!
//! The bracket walk is driven entirely by a [`TaxTable`]; changing the
//! schedule means editing a tax table file, not this code.

use rust_decimal::Decimal;

use crate::config::TaxTable;

/// Computes progressive income tax on `basis` (major units), unrounded.
///
/// Income inside each bracket is taxed at that bracket's marginal rate.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::progressive_income_tax;
/// use payroll_engine::config::{TaxBracket, TaxTable};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let bracket = |lower: i64, rate: i64| TaxBracket {
///     lower: Decimal::from(lower),
///     rate: Decimal::new(rate, 2),
/// };
/// let table = TaxTable {
///     effective_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     brackets: vec![bracket(0, 0), bracket(1000, 10), bracket(2000, 20), bracket(5000, 30)],
/// };
///
/// // 1000 at 10% + 500 at 20%
/// assert_eq!(progressive_income_tax(Decimal::from(2500), &table), Decimal::from(200));
/// ```
pub fn progressive_income_tax(basis: Decimal, table: &TaxTable) -> Decimal {
    table
        .brackets
        .iter()
        .enumerate()
        .filter(|(_, bracket)| basis > bracket.lower)
        .map(|(index, bracket)| {
            let top = match table.brackets.get(index + 1) {
                Some(next) => basis.min(next.lower),
                None => basis,
            };
            (top - bracket.lower) * bracket.rate
        })
        .sum()
}
