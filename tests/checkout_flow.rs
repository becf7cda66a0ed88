//! End-to-end register flow over the default catalog fixture.
//!
//! The default catalog prices Burger at $20.00, Pizza at $30.00 and Soft Drink at $40.00.
//!
//! 1. Add Burger, Burger, then Pizza ×2 and check out:
//!    - Lines: Burger ×2 ($40.00), Pizza ×2 ($60.00)
//!    - Grand total: $100.00, cart empty afterwards
//!
//! 2. Edit the sale to three Burgers and cancel: the stored sale is unchanged.
//!
//! 3. Edit again to three Burgers and save: the grand total becomes $120.00.

use std::rc::Rc;

use jiff::{civil::date, tz::TimeZone};
use rusty_money::{Money, iso};
use testresult::TestResult;

use epos::prelude::*;

fn register() -> TestResult<Register<Rc<FixedClock>>> {
    let catalog = Fixture::with_base_path(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures"))
        .load_catalog("default")?;

    let now = date(2024, 6, 12).at(12, 30, 0, 0).to_zoned(TimeZone::UTC)?;

    Ok(Register::new(catalog, Rc::new(FixedClock::new(now)))?)
}

fn summarise(transaction: &Transaction) -> Vec<(String, u32, i64, i64)> {
    transaction
        .order_lines()
        .iter()
        .map(|line| {
            (
                line.name().to_string(),
                line.quantity().get(),
                line.unit_price().to_minor_units(),
                line.total_price().to_minor_units(),
            )
        })
        .collect()
}

#[test]
fn checkout_then_edit_and_save() -> TestResult {
    let mut register = register()?;

    register.add_to_cart(ProductId(1), Quantity::ONE)?;
    register.add_to_cart(ProductId(1), Quantity::ONE)?;
    register.add_to_cart_raw(ProductId(2), true, "2")?;

    assert_eq!(register.cart().len(), 2);
    assert_eq!(register.cart_total()?, Money::from_minor(10_000, iso::USD));

    let id = register.checkout()?;

    assert!(register.cart().is_empty());
    assert_eq!(register.transactions().len(), 1);

    let committed = register.transaction(id).cloned().ok_or("sale recorded")?;

    assert_eq!(committed.grand_total(), Money::from_minor(10_000, iso::USD));
    assert_eq!(
        summarise(&committed),
        [
            ("Burger".to_string(), 2, 2000, 4000),
            ("Pizza".to_string(), 2, 3000, 6000),
        ]
    );

    register.begin_edit(id)?;
    register.edit_quantity(id, 0, Quantity::parse("3")?)?;
    register.cancel_edit(id)?;

    assert_eq!(register.transaction(id), Some(&committed));

    register.begin_edit(id)?;
    register.edit_quantity(id, 0, Quantity::parse("3")?)?;

    let saved = register.save_edit(id)?;

    assert_eq!(saved.id(), id);
    assert_eq!(saved.grand_total(), Money::from_minor(12_000, iso::USD));
    assert_eq!(
        summarise(saved).first(),
        Some(&("Burger".to_string(), 3, 2000, 6000))
    );

    Ok(())
}

#[test]
fn rejected_operations_leave_state_alone() -> TestResult {
    let mut register = register()?;

    register.add_to_cart(ProductId(3), Quantity::ONE)?;

    assert!(register.add_to_cart(ProductId(404), Quantity::ONE).is_err());
    assert!(register.add_to_cart_raw(ProductId(3), true, "two").is_err());
    assert!(register.select_customer(CustomerId(404)).is_err());
    assert!(register.delete_transaction(TransactionId(1)).is_err());

    assert_eq!(register.cart().item_count(), 1);
    assert!(register.transactions().is_empty());

    register.clear_cart();

    assert!(register.cart().is_empty());

    Ok(())
}
