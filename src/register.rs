//! Register
//!
//! The single entry point a front end drives. It owns the catalog, the open cart, the
//! ledger and any open edits, and reads "now" from a [`Clock`].

use jiff::{Timestamp, tz::TimeZone};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    cart::{Cart, CartError, CartLine},
    catalog::Catalog,
    checkout::{CheckoutError, checkout},
    clock::{Clock, SystemClock},
    customers::{Customer, CustomerId},
    editing::{Draft, EditError, Editor},
    ledger::{Ledger, LedgerError},
    pricing::PricingError,
    products::ProductId,
    quantity::{Quantity, QuantityError},
    sales::{CustomerSpend, SalesAggregator, SalesSummary},
    transactions::{Transaction, TransactionId},
};

/// Errors returned by register operations.
///
/// Every error leaves the register as it was before the call.
#[derive(Debug, Error, PartialEq)]
pub enum RegisterError {
    /// The catalog has no customers to sell to.
    #[error("catalog has no customers")]
    NoCustomers,

    /// The customer id is not in the catalog.
    #[error("unknown customer {0}")]
    UnknownCustomer(CustomerId),

    /// Raw quantity text could not be used.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(#[from] QuantityError),

    /// Cart error.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Checkout error.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Ledger error.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Edit error.
    #[error(transparent)]
    Edit(#[from] EditError),

    /// A transaction is priced in a currency other than the catalog's.
    #[error("currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch {
        /// Catalog currency code
        expected: &'static str,

        /// Currency code of the rejected transaction
        found: &'static str,
    },

    /// Error totalling sales.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Point-of-sale register.
#[derive(Debug)]
pub struct Register<C = SystemClock> {
    catalog: Catalog,
    cart: Cart,
    ledger: Ledger,
    editor: Editor,
    selected_customer: CustomerId,
    clock: C,
}

impl<C: Clock> Register<C> {
    /// Open a register over `catalog`, with the first customer selected.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::NoCustomers`] if the catalog lists no customers.
    pub fn new(catalog: Catalog, clock: C) -> Result<Self, RegisterError> {
        let selected_customer = catalog
            .customers()
            .first()
            .map(|customer| customer.id)
            .ok_or(RegisterError::NoCustomers)?;

        Ok(Self {
            cart: Cart::new(catalog.currency()),
            catalog,
            ledger: Ledger::new(),
            editor: Editor::new(),
            selected_customer,
            clock,
        })
    }

    /// The catalog being sold from.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The open cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Running total of the open cart.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the total overflows.
    pub fn cart_total(&self) -> Result<Money<'static, Currency>, PricingError> {
        self.cart.total()
    }

    /// All committed transactions, oldest first.
    pub fn transactions(&self) -> &[Transaction] {
        self.ledger.all()
    }

    /// Look up a committed transaction.
    pub fn transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.ledger.get(id)
    }

    /// The customer the next checkout is charged to.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::UnknownCustomer`] if the selection is not in the catalog.
    pub fn selected_customer(&self) -> Result<&Customer, RegisterError> {
        self.catalog
            .customer(self.selected_customer)
            .ok_or(RegisterError::UnknownCustomer(self.selected_customer))
    }

    /// The open draft for a transaction, if it is being edited.
    pub fn draft(&self, id: TransactionId) -> Option<&Draft> {
        self.editor.draft(id)
    }

    /// Check whether a transaction is being edited.
    pub fn is_editing(&self, id: TransactionId) -> bool {
        self.editor.is_editing(id)
    }

    /// The zone dates are shown and bucketed in.
    pub fn time_zone(&self) -> TimeZone {
        self.clock.now().time_zone().clone()
    }

    /// Add `quantity` units of a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`RegisterError::Cart`] if the product is unknown or the line quantity
    /// would overflow.
    pub fn add_to_cart(
        &mut self,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<CartLine, RegisterError> {
        Ok(self.cart.add(&self.catalog, product_id, quantity)?)
    }

    /// Add a product using the quantity as typed.
    ///
    /// A single add ignores `raw_quantity` and adds one unit; a multiple add parses it.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::InvalidQuantity`] for unusable text, or a
    /// [`RegisterError::Cart`] if the add is rejected.
    pub fn add_to_cart_raw(
        &mut self,
        product_id: ProductId,
        is_multiple: bool,
        raw_quantity: &str,
    ) -> Result<CartLine, RegisterError> {
        let quantity = if is_multiple {
            Quantity::parse(raw_quantity)?
        } else {
            Quantity::ONE
        };

        self.add_to_cart(product_id, quantity)
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    /// Charge future checkouts to another customer.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::UnknownCustomer`] if the id is not in the catalog; the
    /// selection is unchanged.
    pub fn select_customer(&mut self, customer_id: CustomerId) -> Result<&Customer, RegisterError> {
        let customer = self
            .catalog
            .customer(customer_id)
            .ok_or(RegisterError::UnknownCustomer(customer_id))?;

        self.selected_customer = customer_id;

        debug!(customer = %customer.name, "selected customer");

        Ok(customer)
    }

    /// Check out the cart to the selected customer.
    ///
    /// # Errors
    ///
    /// Returns a [`RegisterError`] if the selected customer is missing or a total
    /// overflows.
    pub fn checkout(&mut self) -> Result<TransactionId, RegisterError> {
        self.checkout_for(self.selected_customer)
    }

    /// Check out the cart to a specific customer.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::UnknownCustomer`] if the id is not in the catalog, or a
    /// [`RegisterError::Checkout`] if a total overflows.
    pub fn checkout_for(&mut self, customer_id: CustomerId) -> Result<TransactionId, RegisterError> {
        let customer = self
            .catalog
            .customer(customer_id)
            .ok_or(RegisterError::UnknownCustomer(customer_id))?;

        let now = self.clock.now().timestamp();

        Ok(checkout(&mut self.cart, &mut self.ledger, customer, now)?)
    }

    /// Replace a stored transaction wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::CurrencyMismatch`] if it is not priced in the catalog
    /// currency, or a [`RegisterError::Ledger`] if no transaction has the same id.
    pub fn update_transaction(
        &mut self,
        transaction: Transaction,
    ) -> Result<&Transaction, RegisterError> {
        let expected = self.catalog.currency();
        let found = transaction.grand_total().currency();

        if found != expected {
            return Err(RegisterError::CurrencyMismatch {
                expected: expected.iso_alpha_code,
                found: found.iso_alpha_code,
            });
        }

        let updated = self.ledger.update(transaction)?;

        info!(transaction_id = %updated.id(), "replaced transaction");

        Ok(updated)
    }

    /// Delete a transaction that is not being edited.
    ///
    /// # Errors
    ///
    /// Returns a [`RegisterError::Edit`] if it is being edited or does not exist.
    pub fn delete_transaction(&mut self, id: TransactionId) -> Result<Transaction, RegisterError> {
        Ok(self.editor.delete(&mut self.ledger, id)?)
    }

    /// Start editing a transaction.
    ///
    /// # Errors
    ///
    /// Returns a [`RegisterError::Edit`] if it does not exist or is already being edited.
    pub fn begin_edit(&mut self, id: TransactionId) -> Result<&Draft, RegisterError> {
        Ok(self.editor.begin(&self.ledger, id)?)
    }

    /// Change the quantity of one line of a draft.
    ///
    /// # Errors
    ///
    /// Returns a [`RegisterError::Edit`] if no draft is open or the line does not exist.
    pub fn edit_quantity(
        &mut self,
        id: TransactionId,
        line: usize,
        quantity: Quantity,
    ) -> Result<&Draft, RegisterError> {
        let draft = self.editor.draft_mut(id)?;

        draft.set_quantity(line, quantity)?;

        Ok(draft)
    }

    /// Change the quantity of one line of a draft using the quantity as typed.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::InvalidQuantity`] for unusable text, otherwise as
    /// [`Register::edit_quantity`].
    pub fn edit_quantity_raw(
        &mut self,
        id: TransactionId,
        line: usize,
        raw_quantity: &str,
    ) -> Result<&Draft, RegisterError> {
        let quantity = Quantity::parse(raw_quantity)?;

        self.edit_quantity(id, line, quantity)
    }

    /// Charge a draft to another catalog customer.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::UnknownCustomer`] if the id is not in the catalog, or a
    /// [`RegisterError::Edit`] if no draft is open.
    pub fn edit_customer(
        &mut self,
        id: TransactionId,
        customer_id: CustomerId,
    ) -> Result<&Draft, RegisterError> {
        let customer = self
            .catalog
            .customer(customer_id)
            .ok_or(RegisterError::UnknownCustomer(customer_id))?;

        let draft = self.editor.draft_mut(id)?;

        draft.set_customer(customer);

        Ok(draft)
    }

    /// Move a draft to another date.
    ///
    /// # Errors
    ///
    /// Returns a [`RegisterError::Edit`] if no draft is open.
    pub fn edit_date(&mut self, id: TransactionId, date: Timestamp) -> Result<&Draft, RegisterError> {
        let draft = self.editor.draft_mut(id)?;

        draft.set_date(date);

        Ok(draft)
    }

    /// Save a draft over the stored transaction.
    ///
    /// # Errors
    ///
    /// Returns a [`RegisterError::Edit`] if no draft is open or the save is rejected; the
    /// draft stays open.
    pub fn save_edit(&mut self, id: TransactionId) -> Result<&Transaction, RegisterError> {
        Ok(self.editor.save(&mut self.ledger, id)?)
    }

    /// Throw a draft away.
    ///
    /// # Errors
    ///
    /// Returns a [`RegisterError::Edit`] if no draft is open.
    pub fn cancel_edit(&mut self, id: TransactionId) -> Result<(), RegisterError> {
        Ok(self.editor.cancel(id)?)
    }

    /// Revenue for today, this week, this month and this year.
    ///
    /// # Errors
    ///
    /// Returns a [`RegisterError::Pricing`] if a bucket cannot be summed.
    pub fn sales_summary(&self) -> Result<SalesSummary<'static>, RegisterError> {
        let now = self.clock.now();

        Ok(self.aggregator().summary(&now)?)
    }

    /// Lifetime spend per catalog customer, highest first.
    ///
    /// # Errors
    ///
    /// Returns a [`RegisterError::Pricing`] if a total cannot be summed.
    pub fn customer_ranking(&self) -> Result<Vec<CustomerSpend<'static>>, RegisterError> {
        Ok(self.aggregator().customer_ranking(self.catalog.customers())?)
    }

    fn aggregator(&self) -> SalesAggregator<'_> {
        SalesAggregator::new(self.ledger.all(), self.catalog.currency())
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use jiff::{Zoned, civil::date};
    use rusty_money::iso;
    use testresult::TestResult;

    use crate::{clock::FixedClock, products::Product, transactions::OrderLine};

    use super::*;

    fn catalog() -> TestResult<Catalog> {
        Ok(Catalog::new(
            [
                Product::new(1, "Burger", Money::from_minor(2000, iso::USD)),
                Product::new(2, "Pizza", Money::from_minor(3000, iso::USD)),
                Product::new(3, "Soft Drink", Money::from_minor(4000, iso::USD)),
            ],
            [
                Customer::new(1, "Walk-in"),
                Customer::new(2, "Ada"),
                Customer::new(3, "Grace"),
            ],
            iso::USD,
        )?)
    }

    fn at(day: i8, hour: i8) -> TestResult<Zoned> {
        Ok(date(2024, 6, day).at(hour, 0, 0, 0).to_zoned(TimeZone::UTC)?)
    }

    fn register() -> TestResult<(Register<Rc<FixedClock>>, Rc<FixedClock>)> {
        let clock = Rc::new(FixedClock::new(at(12, 10)?));
        let register = Register::new(catalog()?, Rc::clone(&clock))?;

        Ok((register, clock))
    }

    fn usd(minor: i64) -> Money<'static, Currency> {
        Money::from_minor(minor, iso::USD)
    }

    #[test]
    fn first_customer_is_selected_by_default() -> TestResult {
        let (register, _clock) = register()?;

        assert_eq!(register.selected_customer()?.name, "Walk-in");

        Ok(())
    }

    #[test]
    fn catalog_without_customers_is_rejected() -> TestResult {
        let catalog = Catalog::new(
            [Product::new(1, "Burger", usd(2000))],
            Vec::<Customer>::new(),
            iso::USD,
        )?;

        let result = Register::new(catalog, FixedClock::new(at(12, 10)?));

        assert!(matches!(result, Err(RegisterError::NoCustomers)));

        Ok(())
    }

    #[test]
    fn single_add_ignores_raw_quantity() -> TestResult {
        let (mut register, _clock) = register()?;

        register.add_to_cart_raw(ProductId(1), false, "abc")?;

        let line = register.add_to_cart_raw(ProductId(1), true, "3")?;

        assert_eq!(line.quantity.get(), 4);

        Ok(())
    }

    #[test]
    fn multiple_add_rejects_bad_quantity_and_keeps_cart() -> TestResult {
        let (mut register, _clock) = register()?;

        register.add_to_cart(ProductId(2), Quantity::ONE)?;

        for raw in ["abc", "0", "-2", "1.5"] {
            let result = register.add_to_cart_raw(ProductId(2), true, raw);

            assert!(
                matches!(result, Err(RegisterError::InvalidQuantity(_))),
                "{raw:?} should be rejected"
            );
        }

        assert_eq!(register.cart().item_count(), 1);

        Ok(())
    }

    #[test]
    fn unknown_product_is_rejected() -> TestResult {
        let (mut register, _clock) = register()?;

        let result = register.add_to_cart(ProductId(99), Quantity::ONE);

        assert_eq!(
            result.err(),
            Some(RegisterError::Cart(CartError::UnknownProduct(ProductId(99))))
        );
        assert!(register.cart().is_empty());

        Ok(())
    }

    #[test]
    fn checkout_uses_selected_customer_and_clock() -> TestResult {
        let (mut register, clock) = register()?;

        register.select_customer(CustomerId(2))?;
        register.add_to_cart(ProductId(1), Quantity::parse("2")?)?;
        register.add_to_cart(ProductId(2), Quantity::parse("2")?)?;

        assert_eq!(register.cart_total()?, usd(10_000));

        let id = register.checkout()?;
        let transaction = register.transaction(id).ok_or("checkout should record")?;

        assert_eq!(transaction.customer_name(), "Ada");
        assert_eq!(transaction.date(), clock.now().timestamp());
        assert_eq!(transaction.grand_total(), usd(10_000));
        assert!(register.cart().is_empty());

        Ok(())
    }

    #[test]
    fn selecting_unknown_customer_keeps_selection() -> TestResult {
        let (mut register, _clock) = register()?;

        let result = register.select_customer(CustomerId(42));

        assert!(matches!(
            result,
            Err(RegisterError::UnknownCustomer(CustomerId(42)))
        ));
        assert_eq!(register.selected_customer()?.id, CustomerId(1));

        Ok(())
    }

    #[test]
    fn checkout_for_unknown_customer_leaves_cart() -> TestResult {
        let (mut register, _clock) = register()?;

        register.add_to_cart(ProductId(1), Quantity::ONE)?;

        let result = register.checkout_for(CustomerId(42));

        assert!(matches!(result, Err(RegisterError::UnknownCustomer(_))));
        assert_eq!(register.cart().len(), 1);
        assert!(register.transactions().is_empty());

        Ok(())
    }

    #[test]
    fn edit_cycle_recomputes_totals_on_save() -> TestResult {
        let (mut register, _clock) = register()?;

        register.add_to_cart(ProductId(1), Quantity::ONE)?;

        let id = register.checkout()?;

        register.begin_edit(id)?;
        register.edit_quantity_raw(id, 0, "5")?;
        register.edit_customer(id, CustomerId(3))?;

        let new_date = at(1, 9)?.timestamp();

        register.edit_date(id, new_date)?;

        let saved = register.save_edit(id)?;

        assert_eq!(saved.grand_total(), usd(10_000));
        assert_eq!(saved.customer_name(), "Grace");
        assert_eq!(saved.date(), new_date);
        assert!(!register.is_editing(id));

        Ok(())
    }

    #[test]
    fn cancel_leaves_transaction_untouched() -> TestResult {
        let (mut register, _clock) = register()?;

        register.add_to_cart(ProductId(2), Quantity::ONE)?;

        let id = register.checkout()?;
        let before = register.transaction(id).cloned();

        register.begin_edit(id)?;
        register.edit_quantity(id, 0, Quantity::parse("9")?)?;
        register.cancel_edit(id)?;

        assert_eq!(register.transaction(id).cloned(), before);
        assert!(register.draft(id).is_none());

        Ok(())
    }

    #[test]
    fn delete_is_refused_while_editing() -> TestResult {
        let (mut register, _clock) = register()?;

        let id = register.checkout()?;

        register.begin_edit(id)?;

        assert_eq!(
            register.delete_transaction(id).err(),
            Some(RegisterError::Edit(EditError::Editing(id)))
        );

        register.cancel_edit(id)?;
        register.delete_transaction(id)?;

        assert!(register.transactions().is_empty());

        Ok(())
    }

    #[test]
    fn deleting_unknown_transaction_is_not_found() -> TestResult {
        let (mut register, _clock) = register()?;

        register.checkout()?;

        let missing = TransactionId(1);

        assert_eq!(
            register.delete_transaction(missing).err(),
            Some(RegisterError::Edit(EditError::Ledger(LedgerError::NotFound(
                missing
            ))))
        );
        assert_eq!(register.transactions().len(), 1);

        Ok(())
    }

    #[test]
    fn update_replaces_by_id() -> TestResult {
        let (mut register, _clock) = register()?;

        register.add_to_cart(ProductId(1), Quantity::ONE)?;

        let id = register.checkout()?;
        let original = register.transaction(id).cloned().ok_or("recorded")?;

        let replacement = Transaction::new(
            id,
            original.date(),
            "Ada",
            original.order_lines().to_vec(),
            iso::USD,
        )?;

        register.update_transaction(replacement)?;

        assert_eq!(
            register.transaction(id).map(Transaction::customer_name),
            Some("Ada")
        );

        let stranger = Transaction::new(
            TransactionId(7),
            original.date(),
            "Ada",
            Vec::<crate::transactions::OrderLine>::new(),
            iso::USD,
        )?;

        assert_eq!(
            register.update_transaction(stranger).err(),
            Some(RegisterError::Ledger(LedgerError::NotFound(TransactionId(7))))
        );

        Ok(())
    }

    #[test]
    fn update_in_another_currency_is_rejected() -> TestResult {
        let (mut register, _clock) = register()?;

        register.add_to_cart(ProductId(1), Quantity::ONE)?;

        let id = register.checkout()?;
        let before = register.transaction(id).cloned();
        let date = before.as_ref().map(Transaction::date).ok_or("recorded")?;

        let pounds = Transaction::new(
            id,
            date,
            "Ada",
            [OrderLine::new(
                "Burger",
                Quantity::ONE,
                Money::from_minor(2000, iso::GBP),
            )?],
            iso::GBP,
        )?;

        assert_eq!(
            register.update_transaction(pounds).err(),
            Some(RegisterError::CurrencyMismatch {
                expected: "USD",
                found: "GBP",
            })
        );
        assert_eq!(register.transaction(id).cloned(), before);
        assert_eq!(register.sales_summary()?.today, usd(2000));
        assert_eq!(register.customer_ranking()?.len(), 3);

        Ok(())
    }

    #[test]
    fn bad_line_quantity_is_rejected_and_keeps_draft() -> TestResult {
        let (mut register, _clock) = register()?;

        register.add_to_cart(ProductId(2), Quantity::parse("2")?)?;

        let id = register.checkout()?;

        register.begin_edit(id)?;

        let before = register.draft(id).cloned();

        for raw in ["0", "-1", "1.5", "abc"] {
            let result = register.edit_quantity_raw(id, 0, raw);

            assert!(
                matches!(result, Err(RegisterError::InvalidQuantity(_))),
                "{raw:?} should be rejected"
            );
        }

        assert_eq!(register.draft(id).cloned(), before);
        assert!(register.is_editing(id));

        Ok(())
    }

    #[test]
    fn sales_follow_the_clock() -> TestResult {
        let (mut register, clock) = register()?;

        register.add_to_cart(ProductId(1), Quantity::ONE)?;
        register.checkout()?;

        clock.set(at(3, 10)?);
        register.add_to_cart(ProductId(3), Quantity::ONE)?;
        register.checkout_for(CustomerId(3))?;

        clock.set(at(12, 18)?);

        let summary = register.sales_summary()?;

        assert_eq!(summary.today, usd(2000));
        assert_eq!(summary.this_week, usd(2000));
        assert_eq!(summary.this_month, usd(6000));

        let ranking = register.customer_ranking()?;
        let names: Vec<&str> = ranking.iter().map(|spend| spend.name.as_str()).collect();

        assert_eq!(names, ["Grace", "Walk-in", "Ada"]);

        Ok(())
    }
}
