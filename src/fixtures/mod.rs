//! Fixtures

use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogError},
    fixtures::catalog::CatalogFixture,
};

pub mod catalog;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// The fixture lists no products, so the currency is unknown
    #[error("Catalog has no products")]
    NoProducts,

    /// The fixture lists no customers to sell to
    #[error("Catalog has no customers")]
    NoCustomers,

    /// Catalog validation error
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Loads named fixture sets from a base directory.
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,
}

impl Fixture {
    /// Create a fixture loader rooted at `./fixtures`
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a fixture loader with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Load `catalog/<name>.yml` from the base path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load_catalog(&self, name: &str) -> Result<Catalog, FixtureError> {
        load_catalog(self.base_path.join("catalog").join(format!("{name}.yml")))
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a catalog from a YAML file
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog, FixtureError> {
    let contents = fs::read_to_string(path)?;

    parse_catalog(&contents)
}

/// Parse a catalog from YAML text
///
/// # Errors
///
/// Returns an error if the YAML is malformed or the catalog is invalid.
pub fn parse_catalog(contents: &str) -> Result<Catalog, FixtureError> {
    let fixture: CatalogFixture = serde_norway::from_str(contents)?;

    fixture.try_into_catalog()
}
