//! Quantities

use std::{fmt, num::NonZeroU32, str::FromStr};

use thiserror::Error;

/// Errors from parsing or combining quantities.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuantityError {
    /// Input was not a whole number.
    #[error("quantity must be a whole number, got {0:?}")]
    NotAnInteger(String),

    /// Input was zero or negative.
    #[error("quantity must be at least 1, got {0}")]
    NotPositive(i64),

    /// Adding quantities together overflowed.
    #[error("quantity is too large")]
    Overflow,
}

/// A strictly positive count of units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Create a quantity, returning `None` for zero.
    pub fn new(value: u32) -> Option<Self> {
        NonZeroU32::new(value).map(Self)
    }

    /// Parse free-text input such as the contents of a quantity field.
    ///
    /// Surrounding whitespace is ignored. Anything that is not a whole number of at least
    /// one is rejected rather than coerced.
    ///
    /// # Errors
    ///
    /// - [`QuantityError::NotAnInteger`]: the input is empty, fractional or not a number.
    /// - [`QuantityError::NotPositive`]: the input is zero or negative.
    /// - [`QuantityError::Overflow`]: the input does not fit in a `u32`.
    pub fn parse(raw: &str) -> Result<Self, QuantityError> {
        let trimmed = raw.trim();

        let value = trimmed
            .parse::<i64>()
            .map_err(|_err| QuantityError::NotAnInteger(trimmed.to_string()))?;

        if value < 1 {
            return Err(QuantityError::NotPositive(value));
        }

        let value = u32::try_from(value).map_err(|_err| QuantityError::Overflow)?;

        Self::new(value).ok_or(QuantityError::NotPositive(0))
    }

    /// The count as a plain integer.
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Add two quantities.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Overflow`] if the sum does not fit in a `u32`.
    pub fn checked_add(self, other: Self) -> Result<Self, QuantityError> {
        self.0
            .checked_add(other.get())
            .map(Self)
            .ok_or(QuantityError::Overflow)
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
