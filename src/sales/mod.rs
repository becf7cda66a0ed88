//! Sales aggregation
//!
//! Derived views over a snapshot of the ledger: revenue per calendar period and lifetime
//! spend per customer. Nothing here reads the clock; "now" is always passed in, and every
//! transaction is placed on the calendar in `now`'s time zone.

use std::{cmp::Reverse, fmt};

use jiff::{Timestamp, ToSpan, Zoned, civil::Date};
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};

use crate::{
    customers::{Customer, CustomerId},
    pricing::{PricingError, sum},
    transactions::Transaction,
};

pub mod report;

/// A calendar window relative to "now".
///
/// Periods overlap: a sale made today also counts towards this week, month and year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    /// The same civil date as now.
    Today,

    /// Monday 00:00 to Sunday 23:59:59.999 of the week containing now.
    ThisWeek,

    /// The same year and month as now.
    ThisMonth,

    /// The same year as now.
    ThisYear,
}

impl Period {
    /// Every period, shortest first.
    pub const ALL: [Period; 4] = [
        Period::Today,
        Period::ThisWeek,
        Period::ThisMonth,
        Period::ThisYear,
    ];

    /// Check whether `at` falls inside this period as seen from `now`.
    pub fn contains(self, at: Timestamp, now: &Zoned) -> bool {
        let date = at.to_zoned(now.time_zone().clone()).date();
        let today = now.date();

        match self {
            Period::Today => date == today,
            Period::ThisWeek => {
                let (monday, sunday) = week_containing(today);

                monday <= date && date <= sunday
            }
            Period::ThisMonth => date.year() == today.year() && date.month() == today.month(),
            Period::ThisYear => date.year() == today.year(),
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            Period::Today => "Today",
            Period::ThisWeek => "This week",
            Period::ThisMonth => "This month",
            Period::ThisYear => "This year",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The Monday and Sunday of the week containing `day`, clamped to the supported range.
fn week_containing(day: Date) -> (Date, Date) {
    let offset = i64::from(day.weekday().to_monday_zero_offset());

    let monday = day.checked_sub(offset.days()).unwrap_or(Date::MIN);
    let sunday = monday.checked_add(6_i64.days()).unwrap_or(Date::MAX);

    (monday, sunday)
}

/// Revenue for each period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalesSummary<'a> {
    /// Sales today
    pub today: Money<'a, Currency>,

    /// Sales this week
    pub this_week: Money<'a, Currency>,

    /// Sales this month
    pub this_month: Money<'a, Currency>,

    /// Sales this year
    pub this_year: Money<'a, Currency>,
}

impl<'a> SalesSummary<'a> {
    /// Revenue for one period.
    pub fn get(&self, period: Period) -> Money<'a, Currency> {
        match period {
            Period::Today => self.today,
            Period::ThisWeek => self.this_week,
            Period::ThisMonth => self.this_month,
            Period::ThisYear => self.this_year,
        }
    }
}

/// Lifetime spend of one catalog customer.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerSpend<'a> {
    /// Catalog id
    pub customer_id: CustomerId,

    /// Catalog name, matched against the names snapshotted on transactions
    pub name: String,

    /// Sum of grand totals
    pub total: Money<'a, Currency>,
}

/// Computes sales figures over a ledger snapshot.
#[derive(Debug, Clone, Copy)]
pub struct SalesAggregator<'a> {
    transactions: &'a [Transaction],
    currency: &'static Currency,
}

impl<'a> SalesAggregator<'a> {
    /// Aggregate over `transactions`, reporting in `currency`.
    pub fn new(transactions: &'a [Transaction], currency: &'static Currency) -> Self {
        Self {
            transactions,
            currency,
        }
    }

    /// Sum of grand totals for transactions dated within `period`.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if a transaction is in another currency or the sum
    /// overflows.
    pub fn bucketed_sales(
        &self,
        period: Period,
        now: &Zoned,
    ) -> Result<Money<'static, Currency>, PricingError> {
        sum(
            self.transactions
                .iter()
                .filter(|transaction| period.contains(transaction.date(), now))
                .map(Transaction::grand_total),
            self.currency,
        )
    }

    /// Revenue for every period.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if any bucket cannot be summed.
    pub fn summary(&self, now: &Zoned) -> Result<SalesSummary<'static>, PricingError> {
        Ok(SalesSummary {
            today: self.bucketed_sales(Period::Today, now)?,
            this_week: self.bucketed_sales(Period::ThisWeek, now)?,
            this_month: self.bucketed_sales(Period::ThisMonth, now)?,
            this_year: self.bucketed_sales(Period::ThisYear, now)?,
        })
    }

    /// One entry per customer, highest lifetime spend first.
    ///
    /// Transactions are matched to customers by their snapshotted name. Customers who have
    /// bought nothing are listed with a zero total. The sort is stable, so equal spenders
    /// stay in catalog order.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if a transaction is in another currency or a total
    /// overflows.
    pub fn customer_ranking(
        &self,
        customers: &[Customer],
    ) -> Result<Vec<CustomerSpend<'static>>, PricingError> {
        let mut spend_by_name: FxHashMap<&str, Money<'static, Currency>> = FxHashMap::default();

        for transaction in self.transactions {
            let entry = spend_by_name
                .entry(transaction.customer_name())
                .or_insert_with(|| Money::from_minor(0, self.currency));

            *entry = entry.add(transaction.grand_total())?;
        }

        let mut ranking: Vec<CustomerSpend<'static>> = customers
            .iter()
            .map(|customer| CustomerSpend {
                customer_id: customer.id,
                name: customer.name.clone(),
                total: spend_by_name
                    .get(customer.name.as_str())
                    .copied()
                    .unwrap_or_else(|| Money::from_minor(0, self.currency)),
            })
            .collect();

        ranking.sort_by_key(|spend| Reverse(spend.total.to_minor_units()));

        Ok(ranking)
    }
}
