//! EPOS prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartLine},
    catalog::{Catalog, CatalogError},
    checkout::{CheckoutError, checkout},
    clock::{Clock, FixedClock, SystemClock},
    customers::{Customer, CustomerId},
    editing::{Draft, DraftLine, EditError, Editor},
    fixtures::{Fixture, FixtureError},
    ledger::{Ledger, LedgerError},
    pricing::PricingError,
    products::{Product, ProductId},
    quantity::{Quantity, QuantityError},
    receipt::{Receipt, ReceiptError},
    register::{Register, RegisterError},
    sales::{CustomerSpend, Period, SalesAggregator, SalesSummary},
    shell::{Command, Shell, ShellError},
    transactions::{OrderLine, Transaction, TransactionId},
};
