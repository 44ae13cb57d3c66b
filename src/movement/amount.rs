//! Positive money amounts with exactly two fractional digits.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::Error;

const INVALID_NUMBER_MESSAGE: &str = "A valid number is required.";

/// The largest amount in cents, i.e. 99999999.99.
const MAX_AMOUNT_CENTS: i128 = 9_999_999_999;

/// A strictly positive amount of money.
///
/// The amount always carries two fractional digits and serializes as a
/// decimal string, e.g. `"2000.00"`. In the database it is stored as an
/// integer number of cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    /// Validate `value` and fix its scale to two fractional digits.
    ///
    /// # Errors
    /// Returns an [Error::Validation] on the `amount` field if `value` is
    /// zero or negative, has more than two significant fractional digits or
    /// is larger than 99999999.99.
    pub fn new(value: Decimal) -> Result<Self, Error> {
        if value <= Decimal::ZERO {
            return Err(Error::validation(
                "amount",
                "Ensure this value is greater than 0.",
            ));
        }

        if value.normalize().scale() > 2 {
            return Err(Error::validation(
                "amount",
                "Ensure that there are no more than 2 decimal places.",
            ));
        }

        let mut value = value;
        value.rescale(2);

        if value.mantissa() > MAX_AMOUNT_CENTS {
            return Err(Error::validation(
                "amount",
                "Ensure that there are no more than 10 digits in total.",
            ));
        }

        Ok(Self(value))
    }

    /// Create an amount from a whole number of cents.
    ///
    /// # Errors
    /// Returns an [Error::Validation] on the `amount` field if `cents` is not
    /// in the range of valid amounts.
    pub fn from_cents(cents: i64) -> Result<Self, Error> {
        Self::new(Decimal::new(cents, 2))
    }

    /// The amount in cents.
    pub fn cents(&self) -> i64 {
        // The mantissa is bounded by MAX_AMOUNT_CENTS.
        self.0.mantissa() as i64
    }

    /// The amount as a decimal with a scale of two.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Amount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim())
            .map_err(|_| Error::validation("amount", INVALID_NUMBER_MESSAGE))?;

        Self::new(value)
    }
}

/// Accepts a JSON number or a decimal string.
impl TryFrom<&Value> for Amount {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Number(number) => number.to_string().parse(),
            Value::String(text) => text.parse(),
            _ => Err(Error::validation("amount", INVALID_NUMBER_MESSAGE)),
        }
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl ToSql for Amount {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.cents()))
    }
}

impl FromSql for Amount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Amount::from_cents(value.as_i64()?).map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

#[cfg(test)]
mod amount_tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use crate::{Error, movement::Amount};

    #[test]
    fn accepts_positive_amount() {
        let amount = Amount::new(dec!(2000)).unwrap();

        assert_eq!(amount.to_string(), "2000.00");
        assert_eq!(amount.cents(), 200_000);
    }

    #[test]
    fn rejects_zero_and_negative() {
        for value in [dec!(0), dec!(0.00), dec!(-5.00)] {
            let result = Amount::new(value);

            assert!(
                matches!(result, Err(Error::Validation { field: "amount", .. })),
                "want {value} to be rejected, got {result:?}"
            );
        }
    }

    #[test]
    fn rejects_more_than_two_decimal_places() {
        assert!(Amount::new(dec!(1.234)).is_err());
    }

    #[test]
    fn accepts_trailing_zeros_beyond_two_places() {
        let amount = Amount::new(dec!(1.500)).unwrap();

        assert_eq!(amount.to_string(), "1.50");
    }

    #[test]
    fn enforces_maximum() {
        assert!(Amount::new(dec!(99999999.99)).is_ok());
        assert!(Amount::new(dec!(100000000.00)).is_err());
    }

    #[test]
    fn parses_strings() {
        assert_eq!("12.3".parse::<Amount>().unwrap().to_string(), "12.30");
        assert!(matches!(
            "twelve".parse::<Amount>(),
            Err(Error::Validation { field: "amount", .. })
        ));
    }

    #[test]
    fn converts_json_numbers_and_strings() {
        assert_eq!(Amount::try_from(&json!(12.5)).unwrap().to_string(), "12.50");
        assert_eq!(Amount::try_from(&json!(2000)).unwrap().to_string(), "2000.00");
        assert_eq!(
            Amount::try_from(&json!("2000.00")).unwrap().to_string(),
            "2000.00"
        );
    }

    #[test]
    fn rejects_malformed_json_values() {
        for value in [json!("abc"), json!(""), json!(true), json!([1])] {
            let result = Amount::try_from(&value);

            assert_eq!(
                result,
                Err(Error::validation("amount", "A valid number is required.")),
                "want {value} to be rejected"
            );
        }
    }

    #[test]
    fn serializes_as_string() {
        let amount = Amount::new(dec!(500)).unwrap();

        assert_eq!(serde_json::to_string(&amount).unwrap(), "\"500.00\"");
    }
}
