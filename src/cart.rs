//! Cart

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::Catalog,
    pricing::{PricingError, line_total, sum},
    products::ProductId,
    quantity::{Quantity, QuantityError},
};

/// Errors related to cart changes or totals.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// The product id is not in the catalog.
    #[error("unknown product {0}")]
    UnknownProduct(ProductId),

    /// The requested quantity is unusable.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(#[from] QuantityError),

    /// Error calculating the cart total.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// One product in the cart and how many of it.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    /// Product the line was created from
    pub product_id: ProductId,

    /// Product name at the time it was added
    pub name: String,

    /// Unit price at the time it was added
    pub price: Money<'static, Currency>,

    /// Number of units
    pub quantity: Quantity,
}

impl CartLine {
    /// `price × quantity` for this line.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the total overflows.
    pub fn total(&self) -> Result<Money<'static, Currency>, PricingError> {
        line_total(self.price, self.quantity)
    }
}

/// The in-progress selection for the current sale.
///
/// Holds at most one line per product, in the order products were first added.
#[derive(Debug, Clone)]
pub struct Cart {
    lines: Vec<CartLine>,
    currency: &'static Currency,
}

impl Cart {
    /// Create an empty cart.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            lines: Vec::new(),
            currency,
        }
    }

    /// Add `quantity` units of a catalog product, merging into its existing line, and
    /// return the line as it now stands.
    ///
    /// # Errors
    ///
    /// - [`CartError::UnknownProduct`]: `product_id` is not in `catalog`.
    /// - [`CartError::InvalidQuantity`]: the merged quantity would overflow.
    ///
    /// The cart is unchanged on error.
    pub fn add(
        &mut self,
        catalog: &Catalog,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<CartLine, CartError> {
        let product = catalog
            .product(product_id)
            .ok_or(CartError::UnknownProduct(product_id))?;

        let line = if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
        {
            line.quantity = line.quantity.checked_add(quantity)?;

            line.clone()
        } else {
            let line = CartLine {
                product_id,
                name: product.name.clone(),
                price: product.price,
                quantity,
            };

            self.lines.push(line.clone());

            line
        };

        debug!(
            product_id = %product_id,
            added = %quantity,
            quantity = %line.quantity,
            "added to cart"
        );

        Ok(line)
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();

        debug!("cleared cart");
    }

    /// Sum of `price × quantity` over every line.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if a line total or the sum overflows.
    pub fn total(&self) -> Result<Money<'static, Currency>, PricingError> {
        let line_totals = self
            .lines
            .iter()
            .map(CartLine::total)
            .collect::<Result<Vec<_>, _>>()?;

        sum(line_totals, self.currency)
    }

    /// Lines in the order their products were first added.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for a product, if it is in the cart.
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity.get()))
            .sum()
    }

    /// Get the number of lines in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
