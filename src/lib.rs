//! EPOS
//!
//! EPOS is the core of a single-till point-of-sale register: a cart priced from a fixed
//! catalog, checkout into an in-memory transaction ledger, per-transaction editing, and
//! sales reporting by calendar period and by customer.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod clock;
pub mod customers;
pub mod editing;
pub mod fixtures;
pub mod ledger;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod quantity;
pub mod receipt;
pub mod register;
pub mod sales;
pub mod shell;
pub mod transactions;
