//! Customers

use std::{fmt, str::FromStr};

/// Customer identifier, unique within a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CustomerId(pub u32);

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CustomerId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Customer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    /// Customer id
    pub id: CustomerId,

    /// Display name, snapshotted onto transactions at checkout
    pub name: String,
}

impl Customer {
    /// Create a customer.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id: CustomerId(id),
            name: name.into(),
        }
    }
}
