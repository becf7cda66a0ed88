//! Catalog Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{
    catalog::Catalog,
    customers::{Customer, CustomerId},
    fixtures::FixtureError,
    products::{Product, ProductId},
};

/// Catalog file contents
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Products in display order
    #[serde(default)]
    pub products: Vec<ProductFixture>,

    /// Customers in display order
    #[serde(default)]
    pub customers: Vec<CustomerFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product id
    pub id: u32,

    /// Product name
    pub name: String,

    /// Product price (e.g., "20.00 USD")
    pub price: String,

    /// Optional image reference
    #[serde(default)]
    pub image: Option<String>,
}

/// Customer Fixture
#[derive(Debug, Deserialize)]
pub struct CustomerFixture {
    /// Customer id
    pub id: u32,

    /// Customer name
    pub name: String,
}

impl TryFrom<ProductFixture> for Product {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;

        Ok(Product {
            id: ProductId(fixture.id),
            name: fixture.name,
            price: Money::from_minor(minor_units, currency),
            image: fixture.image,
        })
    }
}

impl From<CustomerFixture> for Customer {
    fn from(fixture: CustomerFixture) -> Self {
        Customer {
            id: CustomerId(fixture.id),
            name: fixture.name,
        }
    }
}

impl CatalogFixture {
    /// Validate the fixture and build a [`Catalog`].
    ///
    /// The catalog currency is taken from the first product.
    ///
    /// # Errors
    ///
    /// Returns an error if either list is empty, a price is malformed, currencies are
    /// mixed, or the catalog rejects the entries.
    pub fn try_into_catalog(self) -> Result<Catalog, FixtureError> {
        if self.products.is_empty() {
            return Err(FixtureError::NoProducts);
        }

        if self.customers.is_empty() {
            return Err(FixtureError::NoCustomers);
        }

        let mut currency: Option<&'static Currency> = None;
        let mut products = Vec::with_capacity(self.products.len());

        for product_fixture in self.products {
            let product = Product::try_from(product_fixture)?;
            let product_currency = product.price.currency();

            if let Some(existing_currency) = currency {
                if existing_currency != product_currency {
                    return Err(FixtureError::CurrencyMismatch(
                        existing_currency.iso_alpha_code.to_string(),
                        product_currency.iso_alpha_code.to_string(),
                    ));
                }
            } else {
                currency = Some(product_currency);
            }

            products.push(product);
        }

        let currency = currency.ok_or(FixtureError::NoProducts)?;
        let customers: Vec<Customer> = self.customers.into_iter().map(Customer::from).collect();

        Ok(Catalog::new(products, customers, currency)?)
    }
}

/// Parse price string (e.g., "2.99 GBP") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u32, price: &str) -> ProductFixture {
        ProductFixture {
            id,
            name: format!("Product {id}"),
            price: price.to_string(),
            image: None,
        }
    }

    fn walk_in() -> CustomerFixture {
        CustomerFixture {
            id: 1,
            name: "Walk-in".to_string(),
        }
    }

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("2.99GBP");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_price_accepts_usd_and_eur() -> Result<(), FixtureError> {
        let (usd_minor, usd) = parse_price("20.00 USD")?;
        let (eur_minor, eur) = parse_price("2.50 EUR")?;

        assert_eq!(usd_minor, 2000);
        assert_eq!(usd, USD);
        assert_eq!(eur_minor, 250);
        assert_eq!(eur, EUR);

        Ok(())
    }

    #[test]
    fn mixed_currencies_are_rejected() {
        let fixture = CatalogFixture {
            products: vec![product(1, "1.00 USD"), product(2, "1.00 GBP")],
            customers: vec![walk_in()],
        };

        assert!(matches!(
            fixture.try_into_catalog(),
            Err(FixtureError::CurrencyMismatch(expected, found)) if expected == "USD" && found == "GBP"
        ));
    }

    #[test]
    fn empty_lists_are_rejected() {
        let no_products = CatalogFixture {
            products: Vec::new(),
            customers: vec![walk_in()],
        };

        let no_customers = CatalogFixture {
            products: vec![product(1, "1.00 USD")],
            customers: Vec::new(),
        };

        assert!(matches!(
            no_products.try_into_catalog(),
            Err(FixtureError::NoProducts)
        ));
        assert!(matches!(
            no_customers.try_into_catalog(),
            Err(FixtureError::NoCustomers)
        ));
    }

    #[test]
    fn catalog_keeps_fixture_order() -> Result<(), FixtureError> {
        let fixture = CatalogFixture {
            products: vec![product(3, "1.00 GBP"), product(1, "2.00 GBP")],
            customers: vec![walk_in()],
        };

        let catalog = fixture.try_into_catalog()?;
        let ids: Vec<ProductId> = catalog.products().iter().map(|p| p.id).collect();

        assert_eq!(ids, [ProductId(3), ProductId(1)]);
        assert_eq!(catalog.currency(), GBP);

        Ok(())
    }
}
