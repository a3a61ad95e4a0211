//! Catalog

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use slotmap::SlotMap;
use thiserror::Error;

use crate::products::{Product, ProductKey};

/// Category slug that matches every product.
pub const ALL_CATEGORIES: &str = "all";

/// Errors raised while building a catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Two products share an id.
    #[error("duplicate product id: {0}")]
    DuplicateId(String),

    /// A product is priced in a different currency to the rest of the catalog.
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(&'static str, &'static str),
}

/// Immutable set of products, indexed by id.
#[derive(Debug, Default)]
pub struct Catalog<'a> {
    products: SlotMap<ProductKey, Product<'a>>,
    ids: FxHashMap<String, ProductKey>,
    currency: Option<&'a Currency>,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self {
            products: SlotMap::with_key(),
            ids: FxHashMap::default(),
            currency: None,
        }
    }

    /// Build a catalog from products.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] on duplicate ids or mixed currencies.
    pub fn with_products(
        products: impl IntoIterator<Item = Product<'a>>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();

        for product in products {
            catalog.insert(product)?;
        }

        Ok(catalog)
    }

    /// Add a product.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the id is taken or the product's currency
    /// differs from the catalog's.
    pub fn insert(&mut self, product: Product<'a>) -> Result<ProductKey, CatalogError> {
        if self.ids.contains_key(&product.id) {
            return Err(CatalogError::DuplicateId(product.id));
        }

        let currency = product.price.currency();

        match self.currency {
            Some(existing) if existing != currency => {
                return Err(CatalogError::CurrencyMismatch(
                    existing.iso_alpha_code,
                    currency.iso_alpha_code,
                ));
            }
            Some(_) => {}
            None => self.currency = Some(currency),
        }

        let id = product.id.clone();
        let key = self.products.insert(product);

        self.ids.insert(id, key);

        Ok(key)
    }

    /// Look up a product by its catalog id.
    pub fn get(&self, id: &str) -> Option<&Product<'a>> {
        self.ids.get(id).and_then(|key| self.products.get(*key))
    }

    /// Look up a product by key.
    pub fn get_by_key(&self, key: ProductKey) -> Option<&Product<'a>> {
        self.products.get(key)
    }

    /// Products in `category`; [`ALL_CATEGORIES`] matches every product.
    pub fn by_category<'c>(&'c self, category: &'c str) -> impl Iterator<Item = &'c Product<'a>> {
        self.iter()
            .filter(move |product| category == ALL_CATEGORIES || product.category == category)
    }

    /// Featured products.
    pub fn featured(&self) -> impl Iterator<Item = &Product<'a>> {
        self.iter().filter(|product| product.featured)
    }

    /// Iterate over every product, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Product<'a>> {
        self.products.values()
    }

    /// Currency shared by every product, once one has been added.
    pub fn currency(&self) -> Option<&'a Currency> {
        self.currency
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{
        Money,
        iso::{GBP, USD},
    };
    use testresult::TestResult;

    use crate::products::{PastryProduct, ProductKind};

    use super::*;

    fn pastry<'a>(id: &str, category: &str, featured: bool, currency: &'a Currency) -> Product<'a> {
        Product {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            category: category.to_string(),
            image_url: String::new(),
            price: Money::from_minor(100, currency),
            available: true,
            featured,
            kind: ProductKind::Pastry(PastryProduct::default()),
        }
    }

    #[test]
    fn lookup_by_id() -> TestResult {
        let catalog = Catalog::with_products([
            pastry("pastry-1", "meat-pies", true, GBP),
            pastry("pastry-2", "puff-puffs", false, GBP),
        ])?;

        assert_eq!(catalog.get("pastry-2").map(|p| p.category.as_str()), Some("puff-puffs"));
        assert!(catalog.get("pastry-9").is_none());
        assert_eq!(catalog.currency(), Some(GBP));

        Ok(())
    }

    #[test]
    fn category_filter_and_all() -> TestResult {
        let catalog = Catalog::with_products([
            pastry("pastry-1", "meat-pies", true, GBP),
            pastry("pastry-2", "puff-puffs", false, GBP),
            pastry("pastry-4", "meat-pies", false, GBP),
        ])?;

        let pies: Vec<&str> = catalog.by_category("meat-pies").map(|p| p.id.as_str()).collect();

        assert_eq!(pies, vec!["pastry-1", "pastry-4"]);
        assert_eq!(catalog.by_category(ALL_CATEGORIES).count(), 3);
        assert_eq!(catalog.by_category("cakes").count(), 0);

        Ok(())
    }

    #[test]
    fn featured_only_lists_featured_products() -> TestResult {
        let catalog = Catalog::with_products([
            pastry("pastry-1", "meat-pies", true, GBP),
            pastry("pastry-2", "puff-puffs", false, GBP),
        ])?;

        let featured: Vec<&str> = catalog.featured().map(|p| p.id.as_str()).collect();

        assert_eq!(featured, vec!["pastry-1"]);

        Ok(())
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = Catalog::with_products([
            pastry("pastry-1", "meat-pies", true, GBP),
            pastry("pastry-1", "puff-puffs", false, GBP),
        ]);

        assert!(matches!(result, Err(CatalogError::DuplicateId(id)) if id == "pastry-1"));
    }

    #[test]
    fn mixed_currencies_are_rejected() {
        let result = Catalog::with_products([
            pastry("pastry-1", "meat-pies", true, GBP),
            pastry("pastry-2", "puff-puffs", false, USD),
        ]);

        assert!(matches!(
            result,
            Err(CatalogError::CurrencyMismatch("GBP", "USD"))
        ));
    }
}
