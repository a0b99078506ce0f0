//! Type-safe price representation using exact decimal arithmetic.
//!
//! Prices are stored as `NUMERIC(10, 2)`: at most ten significant digits, two
//! of them after the decimal point. A [`Price`] always satisfies that bound and
//! always carries a scale of exactly two, so `19.99` stays `19.99` no matter
//! how many times it is read, written or compared.

use core::fmt;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is NaN or infinite.
    #[error("price must be a finite number")]
    NotFinite,
    /// The input could not be read as a decimal number.
    #[error("price is not a valid decimal number: {0}")]
    Malformed(String),
    /// The value has more integer digits than the column allows.
    #[error("price {value} exceeds {max_digits} digits with {decimal_places} decimal places")]
    OutOfRange {
        /// The rejected value, as given.
        value: String,
        /// Total number of digits allowed.
        max_digits: u32,
        /// Number of fractional digits.
        decimal_places: u32,
    },
}

/// A monetary amount with exactly two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Total number of digits a stored price may have.
    pub const MAX_DIGITS: u32 = 10;
    /// Number of digits after the decimal point.
    pub const DECIMAL_PLACES: u32 = 2;

    /// Convert an API float into an exact price.
    ///
    /// The float is read through its shortest round-trip decimal text, so
    /// `19.99_f64` becomes `19.99` rather than the binary expansion
    /// `19.989999999999998436805981327779591083526611328125`. The result is
    /// then rounded half-to-even to two places.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotFinite`] for NaN or infinities and
    /// [`PriceError::OutOfRange`] when the rounded value needs more than eight
    /// integer digits.
    pub fn from_f64(value: f64) -> Result<Self, PriceError> {
        if !value.is_finite() {
            return Err(PriceError::NotFinite);
        }

        // Huge floats print as hundreds of digits; report them in scientific form.
        let out_of_range = || PriceError::OutOfRange {
            value: format!("{value:e}"),
            max_digits: Self::MAX_DIGITS,
            decimal_places: Self::DECIMAL_PLACES,
        };
        if value.abs() >= Self::upper_bound_f64() {
            return Err(out_of_range());
        }

        let decimal = Decimal::from_str(&value.to_string()).map_err(|_| out_of_range())?;

        Self::from_decimal(decimal)
    }

    /// Round an arbitrary decimal to a price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::OutOfRange`] when the rounded value needs more
    /// than eight integer digits.
    pub fn from_decimal(value: Decimal) -> Result<Self, PriceError> {
        let mut amount =
            value.round_dp_with_strategy(Self::DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven);
        amount.rescale(Self::DECIMAL_PLACES);

        if amount.abs() >= Self::upper_bound() {
            return Err(PriceError::OutOfRange {
                value: value.to_string(),
                max_digits: Self::MAX_DIGITS,
                decimal_places: Self::DECIMAL_PLACES,
            });
        }

        Ok(Self(amount))
    }

    /// The exact decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Smallest magnitude that no longer fits: `10^(MAX_DIGITS - DECIMAL_PLACES)`.
    fn upper_bound() -> Decimal {
        Decimal::from(10_i64.pow(Self::MAX_DIGITS - Self::DECIMAL_PLACES))
    }

    fn upper_bound_f64() -> f64 {
        f64::from(10_u32.pow(Self::MAX_DIGITS - Self::DECIMAL_PLACES))
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::from_decimal(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal =
            Decimal::from_str(s.trim()).map_err(|e| PriceError::Malformed(e.to_string()))?;
        Self::from_decimal(decimal)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_f64_keeps_two_places() {
        let price = Price::from_f64(19.99).unwrap();
        assert_eq!(price.to_string(), "19.99");
        assert_eq!(price.amount(), Decimal::new(1999, 2));
    }

    #[test]
    fn test_from_f64_has_no_binary_drift() {
        let mut price = Price::from_f64(19.99).unwrap();
        for _ in 0..100 {
            let reparsed: f64 = price.to_string().parse().unwrap();
            price = Price::from_f64(reparsed).unwrap();
        }
        assert_eq!(price.amount(), Decimal::new(1999, 2));
    }

    #[test]
    fn test_from_f64_rounds_extra_places() {
        let price = Price::from_f64(19.999).unwrap();
        assert_eq!(price.to_string(), "20.00");
    }

    #[test]
    fn test_from_f64_rounds_half_to_even() {
        assert_eq!(Price::from_f64(0.125).unwrap().to_string(), "0.12");
        assert_eq!(Price::from_f64(0.135).unwrap().to_string(), "0.14");
    }

    #[test]
    fn test_from_f64_pads_scale() {
        assert_eq!(Price::from_f64(5.0).unwrap().to_string(), "5.00");
    }

    #[test]
    fn test_from_f64_rejects_non_finite() {
        assert_eq!(Price::from_f64(f64::NAN), Err(PriceError::NotFinite));
        assert_eq!(Price::from_f64(f64::INFINITY), Err(PriceError::NotFinite));
    }

    #[test]
    fn test_from_f64_rejects_too_many_integer_digits() {
        assert!(Price::from_f64(99_999_999.99).is_ok());
        assert!(matches!(
            Price::from_f64(100_000_000.0),
            Err(PriceError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_huge_values_are_reported_compactly() {
        let err = Price::from_f64(1e300).unwrap_err();
        assert!(matches!(&err, PriceError::OutOfRange { value, .. } if value == "1e300"));
        assert!(err.to_string().len() < 80, "{err}");
    }

    #[test]
    fn test_rounding_into_overflow_is_rejected() {
        assert!(matches!(
            Price::from_f64(99_999_999.999),
            Err(PriceError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_negative_prices_are_bounded_symmetrically() {
        assert!(Price::from_f64(-1.5).is_ok());
        assert!(Price::from_f64(-100_000_000.0).is_err());
    }

    #[test]
    fn test_from_str_rejects_garbage() {
        assert!(matches!(
            "twelve".parse::<Price>(),
            Err(PriceError::Malformed(_))
        ));
    }

    #[test]
    fn test_serde_uses_exact_string() {
        let price: Price = "12.30".parse().unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"12.30\"");
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
    }
}
