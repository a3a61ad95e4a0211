//! Fixtures
//!
//! Catalogs and carts described in YAML. Catalogs live in
//! `<base>/catalogs/<name>.yml` and carts in `<base>/carts/<name>.yml`.

use std::{fs, path::PathBuf};

use thiserror::Error;

use crate::{
    cart::{Cart, CartError},
    catalog::{Catalog, CatalogError},
    fixtures::{carts::CartFixture, products::CatalogFixture},
};

pub mod carts;
pub mod products;

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

    /// Product is neither a cake nor a pastry, or is both
    #[error("Invalid product {0}: exactly one of `cake` or `pastry` must be set")]
    InvalidProduct(String),

    /// Currency mismatch between a cart and its lines
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Catalog construction error
    #[error("Failed to build catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// Cart construction error
    #[error("Failed to create cart: {0}")]
    Cart(#[from] CartError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Products loaded so far
    catalog: Catalog<'static>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: Catalog::new(),
        }
    }

    /// Load products from a YAML catalog file into the fixture's catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if a product is
    /// malformed, or if ids or currencies clash with products already loaded.
    pub fn load_catalog(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("catalogs").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CatalogFixture = serde_norway::from_str(&contents)?;

        for product_fixture in fixture.products {
            self.catalog.insert(product_fixture.try_into()?)?;
        }

        Ok(self)
    }

    /// Load a cart from a YAML file, resolving lines against the loaded catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a line is malformed.
    pub fn cart(&self, name: &str) -> Result<Cart<'static>, FixtureError> {
        let file_path = self.base_path.join("carts").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CartFixture = serde_norway::from_str(&contents)?;

        fixture.into_cart(&self.catalog)
    }

    /// Load a catalog by name from the default fixture directory
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_catalog(name)?;

        Ok(fixture)
    }

    /// Products loaded so far
    pub fn catalog(&self) -> &Catalog<'static> {
        &self.catalog
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
