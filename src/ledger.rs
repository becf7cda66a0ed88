//! Ledger

use jiff::Timestamp;
use thiserror::Error;

use crate::transactions::{Transaction, TransactionId};

/// Errors raised by ledger updates.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// No transaction has the given id.
    #[error("transaction {0} not found")]
    NotFound(TransactionId),
}

/// Ordered record of every committed transaction in the session.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    transactions: Vec<Transaction>,
    last_id: Option<TransactionId>,
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// The id for a transaction checked out at `now`.
    ///
    /// Ids are the checkout time in milliseconds, nudged forward when needed so that each
    /// id is strictly greater than any id appended so far.
    pub fn next_id(&self, now: Timestamp) -> TransactionId {
        let millis = now.as_millisecond();

        match self.last_id {
            Some(TransactionId(last)) if millis <= last => TransactionId(last.saturating_add(1)),
            _ => TransactionId(millis),
        }
    }

    /// Add a transaction to the end of the ledger.
    pub fn append(&mut self, transaction: Transaction) {
        if self.last_id.is_none_or(|last| transaction.id() > last) {
            self.last_id = Some(transaction.id());
        }

        self.transactions.push(transaction);
    }

    /// Replace the transaction with the same id, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if no transaction has that id.
    pub fn update(&mut self, transaction: Transaction) -> Result<&Transaction, LedgerError> {
        let id = transaction.id();

        let slot = self
            .transactions
            .iter_mut()
            .find(|existing| existing.id() == id)
            .ok_or(LedgerError::NotFound(id))?;

        *slot = transaction;

        Ok(&*slot)
    }

    /// Remove the transaction with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if no transaction has that id.
    pub fn delete(&mut self, id: TransactionId) -> Result<Transaction, LedgerError> {
        let idx = self
            .transactions
            .iter()
            .position(|transaction| transaction.id() == id)
            .ok_or(LedgerError::NotFound(id))?;

        Ok(self.transactions.remove(idx))
    }

    /// Get a transaction by id.
    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions
            .iter()
            .find(|transaction| transaction.id() == id)
    }

    /// Every transaction in insertion order.
    pub fn all(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Iterate over transactions in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.transactions.iter()
    }

    /// Get the number of transactions.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Check if the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
