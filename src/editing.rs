//! Transaction editing
//!
//! Each transaction is either being viewed or being edited. Starting an edit copies the
//! stored transaction into a [`Draft`]; the ledger is only touched again when the draft is
//! saved. Cancelling drops the draft.

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    customers::Customer,
    ledger::{Ledger, LedgerError},
    pricing::{PricingError, line_total},
    quantity::{Quantity, QuantityError},
    transactions::{OrderLine, Transaction, TransactionId},
};

/// Errors raised while editing transactions.
#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    /// The transaction does not exist.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// An edit is already open for the transaction.
    #[error("transaction {0} is already being edited")]
    AlreadyEditing(TransactionId),

    /// No edit is open for the transaction.
    #[error("transaction {0} is not being edited")]
    NotEditing(TransactionId),

    /// The transaction cannot be deleted while an edit is open.
    #[error("transaction {0} is being edited; save or cancel first")]
    Editing(TransactionId),

    /// The line index is out of range for the draft.
    #[error("transaction {0} has no line {1}")]
    NoSuchLine(TransactionId, usize),

    /// The replacement quantity is unusable.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(#[from] QuantityError),

    /// Error recomputing totals.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Working copy of one order line.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftLine {
    /// Item name
    pub name: String,

    /// Units, as currently edited
    pub quantity: Quantity,

    /// Price of a single unit
    pub unit_price: Money<'static, Currency>,
}

impl DraftLine {
    /// The total this line would have if saved now.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the total overflows.
    pub fn implied_total(&self) -> Result<Money<'static, Currency>, PricingError> {
        line_total(self.unit_price, self.quantity)
    }
}

impl From<&OrderLine> for DraftLine {
    fn from(line: &OrderLine) -> Self {
        Self {
            name: line.name().to_string(),
            quantity: line.quantity(),
            unit_price: line.unit_price(),
        }
    }
}

/// Working copy of a transaction under edit.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    id: TransactionId,
    date: Timestamp,
    customer_name: String,
    lines: Vec<DraftLine>,
    currency: &'static Currency,
}

impl Draft {
    /// Snapshot a stored transaction.
    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            id: transaction.id(),
            date: transaction.date(),
            customer_name: transaction.customer_name().to_string(),
            lines: transaction
                .order_lines()
                .iter()
                .map(DraftLine::from)
                .collect(),
            currency: transaction.grand_total().currency(),
        }
    }

    /// Change the quantity of one line.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::NoSuchLine`] if `index` is out of range.
    pub fn set_quantity(&mut self, index: usize, quantity: Quantity) -> Result<(), EditError> {
        let line = self
            .lines
            .get_mut(index)
            .ok_or(EditError::NoSuchLine(self.id, index))?;

        line.quantity = quantity;

        Ok(())
    }

    /// Reassign the sale to another customer.
    pub fn set_customer(&mut self, customer: &Customer) {
        self.customer_name.clone_from(&customer.name);
    }

    /// Move the sale to another instant.
    pub fn set_date(&mut self, date: Timestamp) {
        self.date = date;
    }

    /// Transaction being edited
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Edited date
    pub fn date(&self) -> Timestamp {
        self.date
    }

    /// Edited customer name
    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    /// Edited lines
    pub fn lines(&self) -> &[DraftLine] {
        &self.lines
    }

    /// Build the replacement transaction, recomputing every total from unit prices and
    /// quantities.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if a total overflows.
    pub fn to_transaction(&self) -> Result<Transaction, PricingError> {
        let order_lines = self
            .lines
            .iter()
            .map(|line| OrderLine::new(line.name.clone(), line.quantity, line.unit_price))
            .collect::<Result<Vec<_>, _>>()?;

        Transaction::new(
            self.id,
            self.date,
            self.customer_name.clone(),
            order_lines,
            self.currency,
        )
    }
}

/// Tracks which transactions are being edited.
///
/// A transaction with no open draft is being viewed.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    drafts: FxHashMap<TransactionId, Draft>,
}

impl Editor {
    /// Create an editor with nothing open.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a draft of a stored transaction.
    ///
    /// # Errors
    ///
    /// - [`EditError::Ledger`]: the transaction does not exist.
    /// - [`EditError::AlreadyEditing`]: a draft is already open; it is kept as is.
    pub fn begin(&mut self, ledger: &Ledger, id: TransactionId) -> Result<&mut Draft, EditError> {
        if self.drafts.contains_key(&id) {
            return Err(EditError::AlreadyEditing(id));
        }

        let transaction = ledger.get(id).ok_or(LedgerError::NotFound(id))?;

        debug!(transaction_id = %id, "began editing transaction");

        Ok(self
            .drafts
            .entry(id)
            .or_insert_with(|| Draft::from_transaction(transaction)))
    }

    /// Check whether a transaction is being edited.
    pub fn is_editing(&self, id: TransactionId) -> bool {
        self.drafts.contains_key(&id)
    }

    /// The open draft for a transaction.
    pub fn draft(&self, id: TransactionId) -> Option<&Draft> {
        self.drafts.get(&id)
    }

    /// The open draft for a transaction, for changing.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::NotEditing`] if no draft is open.
    pub fn draft_mut(&mut self, id: TransactionId) -> Result<&mut Draft, EditError> {
        self.drafts.get_mut(&id).ok_or(EditError::NotEditing(id))
    }

    /// Write the draft back to the ledger and close it.
    ///
    /// # Errors
    ///
    /// - [`EditError::NotEditing`]: no draft is open.
    /// - [`EditError::Ledger`]: the transaction has gone from the ledger.
    /// - [`EditError::Pricing`]: a recomputed total overflows.
    ///
    /// The draft stays open on error.
    pub fn save<'l>(
        &mut self,
        ledger: &'l mut Ledger,
        id: TransactionId,
    ) -> Result<&'l Transaction, EditError> {
        let draft = self.drafts.get(&id).ok_or(EditError::NotEditing(id))?;
        let replacement = draft.to_transaction()?;

        let saved = ledger.update(replacement)?;

        self.drafts.remove(&id);

        info!(
            transaction_id = %id,
            grand_total = %saved.grand_total(),
            "saved transaction edit"
        );

        Ok(saved)
    }

    /// Discard the draft without touching the ledger.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::NotEditing`] if no draft is open.
    pub fn cancel(&mut self, id: TransactionId) -> Result<(), EditError> {
        if self.drafts.remove(&id).is_none() {
            return Err(EditError::NotEditing(id));
        }

        debug!(transaction_id = %id, "cancelled transaction edit");

        Ok(())
    }

    /// Delete a transaction that is being viewed.
    ///
    /// # Errors
    ///
    /// - [`EditError::Editing`]: a draft is open for it.
    /// - [`EditError::Ledger`]: the transaction does not exist.
    pub fn delete(&self, ledger: &mut Ledger, id: TransactionId) -> Result<Transaction, EditError> {
        if self.is_editing(id) {
            return Err(EditError::Editing(id));
        }

        let removed = ledger.delete(id)?;

        info!(transaction_id = %id, "deleted transaction");

        Ok(removed)
    }
}
