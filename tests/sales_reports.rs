//! Sales buckets and customer ranking driven through the register clock.
//!
//! Sales, all in June 2024 (UTC), with "now" on Wednesday 12 June:
//!
//! - 12 June, Ada: Pizza ($30.00) + Soft Drink ($40.00) + Burger ($20.00) = $90.00
//! - 12 June, Grace: Burger ($20.00)
//! - 4 June, Walk-in: Soft Drink ×2 ($80.00), eight days before now
//!
//! Expected buckets: today $110.00, this week $110.00, this month $190.00, this year $190.00.
//! Expected ranking: Ada $90.00, Walk-in $80.00, Grace $20.00, Alan $0.00.

use std::rc::Rc;

use jiff::{Zoned, civil::date, tz::TimeZone};
use rusty_money::{Money, iso};
use testresult::TestResult;

use epos::prelude::*;

fn at(day: i8, hour: i8) -> TestResult<Zoned> {
    Ok(date(2024, 6, day).at(hour, 0, 0, 0).to_zoned(TimeZone::UTC)?)
}

fn trading_day() -> TestResult<Register<Rc<FixedClock>>> {
    let catalog = Fixture::with_base_path(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures"))
        .load_catalog("default")?;
    let clock = Rc::new(FixedClock::new(at(4, 15)?));
    let mut register = Register::new(catalog, Rc::clone(&clock))?;

    register.add_to_cart(ProductId(3), Quantity::parse("2")?)?;
    register.checkout_for(CustomerId(1))?;

    clock.set(at(12, 9)?);

    for product in [2, 3, 1] {
        register.add_to_cart(ProductId(product), Quantity::ONE)?;
    }

    register.checkout_for(CustomerId(2))?;

    register.add_to_cart(ProductId(1), Quantity::ONE)?;
    register.checkout_for(CustomerId(3))?;

    clock.set(at(12, 17)?);

    Ok(register)
}

#[test]
fn buckets_overlap_by_period() -> TestResult {
    let register = trading_day()?;
    let summary = register.sales_summary()?;

    assert_eq!(summary.get(Period::Today), Money::from_minor(11_000, iso::USD));
    assert_eq!(summary.get(Period::ThisWeek), Money::from_minor(11_000, iso::USD));
    assert_eq!(summary.get(Period::ThisMonth), Money::from_minor(19_000, iso::USD));
    assert_eq!(summary.get(Period::ThisYear), Money::from_minor(19_000, iso::USD));

    Ok(())
}

#[test]
fn ranking_lists_every_customer() -> TestResult {
    let register = trading_day()?;

    let ranking: Vec<(String, i64)> = register
        .customer_ranking()?
        .into_iter()
        .map(|spend| (spend.name, spend.total.to_minor_units()))
        .collect();

    assert_eq!(
        ranking,
        [
            ("Ada Lovelace".to_string(), 9000),
            ("Walk-in".to_string(), 8000),
            ("Grace Hopper".to_string(), 2000),
            ("Alan Turing".to_string(), 0),
        ]
    );

    Ok(())
}

#[test]
fn moving_a_sale_changes_its_bucket() -> TestResult {
    let mut register = trading_day()?;

    let oldest = register
        .transactions()
        .first()
        .map(Transaction::id)
        .ok_or("first sale")?;

    register.begin_edit(oldest)?;
    register.edit_date(oldest, at(12, 8)?.timestamp())?;
    register.save_edit(oldest)?;

    let summary = register.sales_summary()?;

    assert_eq!(summary.today, Money::from_minor(19_000, iso::USD));

    Ok(())
}
