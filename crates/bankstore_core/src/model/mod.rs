//! Domain records for both stores.
//!
//! # Responsibility
//! - Define the relational `Client`/`Account` pair and its association.
//! - Define the nested document shape used by the document store.
//! - Convert balances between `Decimal` and exact integer cents.
//!
//! # Invariants
//! - Relational balances fit NUMERIC(10, 2): at most 10 digits, 2 after the point.

use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod account;
pub mod client;
pub mod document;

const BALANCE_SCALE: u32 = 2;
const BALANCE_MAX_DIGITS: u32 = 10;

/// Balance that does not fit the NUMERIC(10, 2) column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceError {
    TooManyFractionDigits(Decimal),
    TooManyDigits(Decimal),
}

impl Display for BalanceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooManyFractionDigits(value) => write!(
                f,
                "balance {value} has more than {BALANCE_SCALE} fraction digits"
            ),
            Self::TooManyDigits(value) => write!(
                f,
                "balance {value} has more than {BALANCE_MAX_DIGITS} digits"
            ),
        }
    }
}

impl Error for BalanceError {}

/// Converts a balance to integer cents, rejecting values outside NUMERIC(10, 2).
pub fn balance_to_cents(value: Decimal) -> Result<i64, BalanceError> {
    if value.normalize().scale() > BALANCE_SCALE {
        return Err(BalanceError::TooManyFractionDigits(value));
    }

    let mut scaled = value;
    scaled.rescale(BALANCE_SCALE);
    let cents = scaled.mantissa();
    if cents.unsigned_abs() >= 10u128.pow(BALANCE_MAX_DIGITS) {
        return Err(BalanceError::TooManyDigits(value));
    }

    // |cents| < 10^10, always inside i64.
    Ok(cents as i64)
}

/// Inverse of [`balance_to_cents`]; the result always has scale 2.
pub fn balance_from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, BALANCE_SCALE)
}

#[cfg(test)]
mod tests {
    use super::{balance_from_cents, balance_to_cents, BalanceError};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn cents_conversion_keeps_two_fraction_digits() {
        let value = Decimal::from_str("1000.5").unwrap();
        let cents = balance_to_cents(value).unwrap();
        assert_eq!(cents, 100_050);
        assert_eq!(balance_from_cents(cents).to_string(), "1000.50");
    }

    #[test]
    fn trailing_zeros_beyond_scale_are_accepted() {
        let value = Decimal::from_str("12.3400").unwrap();
        assert_eq!(balance_to_cents(value).unwrap(), 1234);
    }

    #[test]
    fn rejects_values_outside_numeric_10_2() {
        let too_precise = Decimal::from_str("0.001").unwrap();
        assert!(matches!(
            balance_to_cents(too_precise),
            Err(BalanceError::TooManyFractionDigits(_))
        ));

        let largest = Decimal::from_str("99999999.99").unwrap();
        assert_eq!(balance_to_cents(largest).unwrap(), 9_999_999_999);

        let too_big = Decimal::from_str("100000000.00").unwrap();
        assert!(matches!(
            balance_to_cents(too_big),
            Err(BalanceError::TooManyDigits(_))
        ));
    }

    #[test]
    fn negative_balances_round_trip() {
        let value = Decimal::from_str("-42.10").unwrap();
        assert_eq!(balance_from_cents(balance_to_cents(value).unwrap()), value);
    }
}
