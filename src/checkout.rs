//! Checkout

use jiff::Timestamp;
use thiserror::Error;
use tracing::{Span, info};

use crate::{
    cart::Cart,
    customers::Customer,
    ledger::Ledger,
    pricing::PricingError,
    transactions::{OrderLine, Transaction, TransactionId},
};

/// Errors that can occur while checking out a cart.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// Error calculating line or grand totals.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Commit `cart` as a sale to `customer`.
///
/// The transaction snapshots the customer's name and each cart line's name, price and
/// quantity. Everything that can fail is computed first; only then is the transaction
/// appended to `ledger` and `cart` cleared, so callers see both effects or neither.
///
/// An empty cart checks out to a zero-total transaction.
///
/// # Errors
///
/// Returns a [`CheckoutError`] if a total overflows; `cart` and `ledger` are unchanged.
#[tracing::instrument(
    name = "checkout",
    skip_all,
    fields(
        customer = %customer.name,
        lines = cart.len(),
        transaction_id = tracing::field::Empty,
        grand_total = tracing::field::Empty
    ),
    err
)]
pub fn checkout(
    cart: &mut Cart,
    ledger: &mut Ledger,
    customer: &Customer,
    now: Timestamp,
) -> Result<TransactionId, CheckoutError> {
    let order_lines = cart
        .lines()
        .iter()
        .map(|line| OrderLine::new(line.name.clone(), line.quantity, line.price))
        .collect::<Result<Vec<_>, _>>()?;

    let id = ledger.next_id(now);

    let transaction = Transaction::new(
        id,
        now,
        customer.name.clone(),
        order_lines,
        cart.currency(),
    )?;

    let span = Span::current();

    span.record("transaction_id", tracing::field::display(id));

    span.record(
        "grand_total",
        tracing::field::display(transaction.grand_total()),
    );

    ledger.append(transaction);
    cart.clear();

    info!(transaction_id = %id, "checked out cart");

    Ok(id)
}
