//! Pricing

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::quantity::Quantity;

/// Errors that can occur while calculating prices.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// Multiplying a unit price by a quantity overflowed.
    #[error("line total overflowed")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculates `unit_price × quantity`.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the product does not fit in minor units.
pub fn line_total(
    unit_price: Money<'_, Currency>,
    quantity: Quantity,
) -> Result<Money<'_, Currency>, PricingError> {
    let minor = unit_price
        .to_minor_units()
        .checked_mul(i64::from(quantity.get()))
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor, unit_price.currency()))
}

/// Sums a sequence of amounts, starting from zero in `currency`.
///
/// # Errors
///
/// - [`PricingError::Money`]: an amount is in a different currency.
pub fn sum<'a>(
    amounts: impl IntoIterator<Item = Money<'a, Currency>>,
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, PricingError> {
    let total = amounts
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, amount| acc.add(amount))?;

    Ok(total)
}
