//! Catalog
//!
//! The read-only set of products and customers a register sells to. Both lists keep the
//! order they were supplied in; lookups go through an id index.

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    customers::{Customer, CustomerId},
    products::{Product, ProductId},
};

/// Errors raised while assembling a catalog.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// Two products share an id.
    #[error("duplicate product id {0}")]
    DuplicateProduct(ProductId),

    /// Two customers share an id.
    #[error("duplicate customer id {0}")]
    DuplicateCustomer(CustomerId),

    /// A product is priced in a different currency to the catalog (product, found, expected).
    #[error("product {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),

    /// A product has a negative price.
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),
}

/// Catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    customers: Vec<Customer>,
    product_index: FxHashMap<ProductId, usize>,
    customer_index: FxHashMap<CustomerId, usize>,
    currency: &'static Currency,
}

impl Catalog {
    /// Build a catalog from ordered product and customer lists.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if ids repeat, or a product is negatively priced or
    /// priced in a currency other than `currency`.
    pub fn new(
        products: impl Into<Vec<Product>>,
        customers: impl Into<Vec<Customer>>,
        currency: &'static Currency,
    ) -> Result<Self, CatalogError> {
        let products = products.into();
        let customers = customers.into();

        let mut product_index = FxHashMap::default();

        for (idx, product) in products.iter().enumerate() {
            let product_currency = product.price.currency();

            if product_currency != currency {
                return Err(CatalogError::CurrencyMismatch(
                    product.id,
                    product_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ));
            }

            if product.price.to_minor_units() < 0 {
                return Err(CatalogError::NegativePrice(product.id));
            }

            if product_index.insert(product.id, idx).is_some() {
                return Err(CatalogError::DuplicateProduct(product.id));
            }
        }

        let mut customer_index = FxHashMap::default();

        for (idx, customer) in customers.iter().enumerate() {
            if customer_index.insert(customer.id, idx).is_some() {
                return Err(CatalogError::DuplicateCustomer(customer.id));
            }
        }

        Ok(Self {
            products,
            customers,
            product_index,
            customer_index,
            currency,
        })
    }

    /// Look up a product by id.
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        let idx = *self.product_index.get(&id)?;

        self.products.get(idx)
    }

    /// Look up a customer by id.
    pub fn customer(&self, id: CustomerId) -> Option<&Customer> {
        let idx = *self.customer_index.get(&id)?;

        self.customers.get(idx)
    }

    /// Products in catalog order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Customers in catalog order.
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// Currency every price in the catalog is expressed in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
