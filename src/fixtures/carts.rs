//! Cart Fixtures

use serde::Deserialize;

use crate::{
    cart::{Cart, CartItem, Customizations},
    catalog::Catalog,
    fixtures::{
        FixtureError,
        products::{parse_currency, parse_money},
    },
    products::ProductKind,
};

/// Categories whose lines count as packs when a saved line doesn't say.
pub const PACK_CATEGORIES: [&str; 3] = ["meat-pies", "puff-puffs", "sausage-rolls"];

/// Wrapper for a cart in YAML
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// Cart currency code
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Cart lines, in the order they were added
    #[serde(default)]
    pub items: Vec<CartItemFixture>,
}

/// Cart line in YAML
#[derive(Debug, Deserialize)]
pub struct CartItemFixture {
    /// Catalog id of the product
    pub product_id: String,

    /// Product name snapshot
    pub name: String,

    /// Image snapshot
    #[serde(default)]
    pub image_url: String,

    /// Units on the line
    pub quantity: u32,

    /// Base price snapshot (e.g., "1.00 GBP")
    pub base_price: String,

    /// Price of the whole line (e.g., "20.00 GBP")
    pub total_price: String,

    /// Shopper's options
    #[serde(default)]
    pub customizations: Customizations,

    /// Whether the line counts towards the pack discount
    pub pack_eligible: Option<bool>,

    /// Category snapshot, used only when eligibility isn't recorded
    pub category: Option<String>,
}

fn default_currency() -> String {
    "GBP".to_string()
}

impl CartItemFixture {
    /// Resolve pack eligibility for a saved line.
    ///
    /// An explicit flag wins. Otherwise the product family decides when the
    /// product is still in the catalog, and a pack size or pastry category on
    /// the line decides when it isn't.
    pub fn pack_eligible(&self, catalog: &Catalog<'_>) -> bool {
        if let Some(pack_eligible) = self.pack_eligible {
            return pack_eligible;
        }

        if let Some(product) = catalog.get(&self.product_id) {
            return matches!(product.kind, ProductKind::Pastry(_));
        }

        self.customizations.pack_size.is_some()
            || self
                .category
                .as_deref()
                .is_some_and(|category| PACK_CATEGORIES.contains(&category))
    }
}

impl CartFixture {
    /// Build the cart, resolving each line against `catalog`.
    ///
    /// # Errors
    ///
    /// Returns an error if a price or currency cannot be parsed, a line is
    /// priced in a different currency to the cart, or a line is invalid.
    pub fn into_cart(self, catalog: &Catalog<'_>) -> Result<Cart<'static>, FixtureError> {
        let currency = parse_currency(&self.currency)?;

        let items = self
            .items
            .into_iter()
            .map(|fixture| {
                let pack_eligible = fixture.pack_eligible(catalog);
                let base_price = parse_money(&fixture.base_price)?;
                let total_price = parse_money(&fixture.total_price)?;

                if total_price.currency() != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        currency.iso_alpha_code.to_string(),
                        total_price.currency().iso_alpha_code.to_string(),
                    ));
                }

                Ok(CartItem::new(
                    fixture.product_id,
                    fixture.name,
                    fixture.quantity,
                    base_price,
                    total_price,
                )?
                .with_image_url(fixture.image_url)
                .with_customizations(fixture.customizations)
                .with_pack_eligible(pack_eligible))
            })
            .collect::<Result<Vec<_>, FixtureError>>()?;

        Ok(Cart::with_items(items, currency)?)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::GBP};
    use testresult::TestResult;

    use crate::{
        cart::CakeSize,
        products::{CakeProduct, CakeShape, PastrySize, Product},
    };

    use super::*;

    fn cart_fixture(yaml: &str) -> Result<CartFixture, serde_norway::Error> {
        serde_norway::from_str(yaml)
    }

    fn cake_catalog() -> Result<Catalog<'static>, crate::catalog::CatalogError> {
        Catalog::with_products([Product {
            id: "cake-1".to_string(),
            name: "Classic Vanilla Celebration Cake".to_string(),
            description: String::new(),
            category: "cakes".to_string(),
            image_url: String::new(),
            price: Money::from_minor(1_500, GBP),
            available: true,
            featured: true,
            kind: ProductKind::Cake(CakeProduct {
                shape: CakeShape::Round,
                base_size_inches: 6,
                max_layers: 4,
                flavors: vec!["Vanilla".to_string()],
                frostings: vec![],
                decor_options: vec![],
            }),
        }])
    }

    #[test]
    fn pack_size_or_category_marks_unknown_products_eligible() -> TestResult {
        let fixture = cart_fixture(
            r#"
items:
  - product_id: pastry-1
    name: Meat Pie
    quantity: 12
    base_price: "1.00 GBP"
    total_price: "12.00 GBP"
    customizations:
      pack_size: small
  - product_id: pastry-3
    name: Sausage Roll
    quantity: 8
    base_price: "1.00 GBP"
    total_price: "8.00 GBP"
    category: sausage-rolls
  - product_id: cake-1
    name: Classic Vanilla Celebration Cake
    quantity: 1
    base_price: "15.00 GBP"
    total_price: "25.00 GBP"
    customizations:
      size: 8
      layers: 1
"#,
        )?;

        let cart = fixture.into_cart(&Catalog::new())?;
        let eligible: Vec<bool> = cart.iter().map(CartItem::pack_eligible).collect();

        assert_eq!(eligible, vec![true, true, false]);
        assert_eq!(cart.summary()?.eligible_packs(), 20);

        Ok(())
    }

    #[test]
    fn catalog_family_wins_over_line_hints() -> TestResult {
        let fixture = cart_fixture(
            r#"
items:
  - product_id: cake-1
    name: Classic Vanilla Celebration Cake
    quantity: 1
    base_price: "15.00 GBP"
    total_price: "15.00 GBP"
    category: meat-pies
"#,
        )?;

        let cart = fixture.into_cart(&cake_catalog()?)?;

        assert_eq!(cart.iter().filter(|item| item.pack_eligible()).count(), 0);

        Ok(())
    }

    #[test]
    fn explicit_flag_wins() -> TestResult {
        let fixture = cart_fixture(
            r#"
items:
  - product_id: cake-1
    name: Classic Vanilla Celebration Cake
    quantity: 1
    base_price: "15.00 GBP"
    total_price: "15.00 GBP"
    pack_eligible: true
"#,
        )?;

        let cart = fixture.into_cart(&cake_catalog()?)?;

        assert_eq!(cart.iter().filter(|item| item.pack_eligible()).count(), 1);

        Ok(())
    }

    #[test]
    fn custom_text_size_is_kept() -> TestResult {
        let fixture = cart_fixture(
            r#"
items:
  - product_id: cake-3
    name: Wedding Cake
    quantity: 1
    base_price: "100.00 GBP"
    total_price: "115.00 GBP"
    customizations:
      shape: round
      size: "three tier"
      pack_size: null
"#,
        )?;

        let cart = fixture.into_cart(&Catalog::new())?;
        let line = cart.items().first().ok_or("missing line")?;

        assert_eq!(
            line.customizations().size,
            Some(CakeSize::Custom("three tier".to_string()))
        );
        assert_eq!(line.customizations().pack_size, None::<PastrySize>);

        Ok(())
    }

    #[test]
    fn line_in_another_currency_is_rejected() -> TestResult {
        let fixture = cart_fixture(
            r#"
currency: GBP
items:
  - product_id: pastry-1
    name: Meat Pie
    quantity: 1
    base_price: "1.00 USD"
    total_price: "1.00 USD"
"#,
        )?;

        assert!(matches!(
            fixture.into_cart(&Catalog::new()),
            Err(FixtureError::CurrencyMismatch(expected, found)) if expected == "GBP" && found == "USD"
        ));

        Ok(())
    }

    #[test]
    fn zero_quantity_line_is_rejected() -> TestResult {
        let fixture = cart_fixture(
            r#"
items:
  - product_id: pastry-1
    name: Meat Pie
    quantity: 0
    base_price: "1.00 GBP"
    total_price: "0.00 GBP"
"#,
        )?;

        assert!(matches!(
            fixture.into_cart(&Catalog::new()),
            Err(FixtureError::Cart(_))
        ));

        Ok(())
    }
}
