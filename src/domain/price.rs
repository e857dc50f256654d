//! Price type
//!
//! Domain primitive for album unit prices. Prices are validated at
//! construction time so an invalid value never reaches the store.

use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Maximum price representable by the `NUMERIC(10,2)` column (99999999.99)
const MAX_PRICE: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Maximum decimal places (2)
const MAX_SCALE: u32 = 2;

/// Price represents a validated unit price.
///
/// # Invariants
/// - Value is always positive (> 0)
/// - At most 2 decimal places
/// - At most 99999999.99
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use record_shop::domain::Price;
///
/// let price = Price::new(Decimal::new(2999, 2)).unwrap();
/// assert_eq!(price.value(), Decimal::new(2999, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Price(Decimal);

/// Errors that can occur when creating a Price
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceError {
    #[error("price must be greater than 0")]
    NotPositive(Decimal),

    #[error("price must have at most {MAX_SCALE} decimal places")]
    TooManyDecimals(u32),

    #[error("price exceeds maximum of {MAX_PRICE}")]
    Overflow,

    #[error("invalid price: {0}")]
    ParseError(String),
}

impl Price {
    /// Create a new Price with validation.
    ///
    /// Trailing zeros are dropped before the scale check, so `29.990`
    /// is accepted as `29.99`.
    pub fn new(value: Decimal) -> Result<Self, PriceError> {
        if value <= Decimal::ZERO {
            return Err(PriceError::NotPositive(value));
        }

        let value = value.normalize();
        if value.scale() > MAX_SCALE {
            return Err(PriceError::TooManyDecimals(value.scale()));
        }

        if value > MAX_PRICE {
            return Err(PriceError::Overflow);
        }

        Ok(Self(value))
    }

    /// Convert a JSON number without going through binary floating point.
    ///
    /// serde_json prints floats with the shortest representation that
    /// round-trips, so `29.99` arrives here as the text "29.99".
    pub fn from_json_number(number: &serde_json::Number) -> Result<Self, PriceError> {
        let text = number.to_string();
        let decimal = Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .map_err(|e| {
                if text.starts_with('-') {
                    PriceError::NotPositive(Decimal::ZERO)
                } else if let Some(exponent) = exponent_of(&text) {
                    if exponent < 0 {
                        PriceError::TooManyDecimals(
                            u32::try_from(exponent.unsigned_abs()).unwrap_or(u32::MAX),
                        )
                    } else {
                        PriceError::Overflow
                    }
                } else {
                    PriceError::ParseError(e.to_string())
                }
            })?;
        Self::new(decimal)
    }

    /// Get the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }
}

/// Exponent of a number in scientific notation, if it has one
fn exponent_of(text: &str) -> Option<i64> {
    let (_, exponent) = text.split_once(['e', 'E'])?;
    exponent.strip_prefix('+').unwrap_or(exponent).parse().ok()
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s).map_err(|e| PriceError::ParseError(e.to_string()))?;
        Price::new(decimal)
    }
}
