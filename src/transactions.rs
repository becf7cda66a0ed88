//! Transactions
//!
//! A transaction is the committed record of one sale. It holds values copied out of the
//! cart and catalog at checkout, so later catalog changes never rewrite history.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};

use crate::{
    pricing::{PricingError, line_total, sum},
    quantity::Quantity,
};

/// Transaction identifier derived from the checkout time in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionId(pub i64);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TransactionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A line item within a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    name: String,
    quantity: Quantity,
    unit_price: Money<'static, Currency>,
    total_price: Money<'static, Currency>,
}

impl OrderLine {
    /// Create a line, computing its total from the unit price and quantity.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the total overflows.
    pub fn new(
        name: impl Into<String>,
        quantity: Quantity,
        unit_price: Money<'static, Currency>,
    ) -> Result<Self, PricingError> {
        Ok(Self {
            name: name.into(),
            quantity,
            unit_price,
            total_price: line_total(unit_price, quantity)?,
        })
    }

    /// Item name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Units sold
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Price of a single unit
    pub fn unit_price(&self) -> Money<'static, Currency> {
        self.unit_price
    }

    /// `unit_price × quantity`
    pub fn total_price(&self) -> Money<'static, Currency> {
        self.total_price
    }
}

/// A committed sale.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    id: TransactionId,
    date: Timestamp,
    customer_name: String,
    order_lines: Vec<OrderLine>,
    grand_total: Money<'static, Currency>,
}

impl Transaction {
    /// Create a transaction, computing the grand total from its lines.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the lines are not all in `currency` or the sum
    /// overflows.
    pub fn new(
        id: TransactionId,
        date: Timestamp,
        customer_name: impl Into<String>,
        order_lines: impl Into<Vec<OrderLine>>,
        currency: &'static Currency,
    ) -> Result<Self, PricingError> {
        let order_lines = order_lines.into();
        let grand_total = sum(order_lines.iter().map(OrderLine::total_price), currency)?;

        Ok(Self {
            id,
            date,
            customer_name: customer_name.into(),
            order_lines,
            grand_total,
        })
    }

    /// Transaction id
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// When the sale happened
    pub fn date(&self) -> Timestamp {
        self.date
    }

    /// Customer name as it was when the sale was made
    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    /// Line items in checkout order
    pub fn order_lines(&self) -> &[OrderLine] {
        &self.order_lines
    }

    /// Sum of every line total
    pub fn grand_total(&self) -> Money<'static, Currency> {
        self.grand_total
    }
}
