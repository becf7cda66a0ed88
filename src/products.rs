//! Products

use std::{fmt, str::FromStr};

use rusty_money::{Money, iso::Currency};

/// Product identifier, unique within a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(pub u32);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Product price
    pub price: Money<'static, Currency>,

    /// Opaque image reference, passed through to whatever renders the catalog
    pub image: Option<String>,
}

impl Product {
    /// Create a product without an image.
    pub fn new(id: u32, name: impl Into<String>, price: Money<'static, Currency>) -> Self {
        Self {
            id: ProductId(id),
            name: name.into(),
            price,
            image: None,
        }
    }
}
