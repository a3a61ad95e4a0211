//! Product Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    products::{
        CakeProduct, CakeShape, PastryProduct, PastrySize, PastrySizes, Product, ProductKind,
        SizeOption,
    },
};

/// Wrapper for a catalog in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Products, in display order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Catalog id
    pub id: String,

    /// Product name
    pub name: String,

    /// Product description
    #[serde(default)]
    pub description: String,

    /// Category slug
    pub category: String,

    /// Image URL
    #[serde(default)]
    pub image_url: String,

    /// Base price (e.g., "15.00 GBP")
    pub price: String,

    /// Whether the product can be ordered
    #[serde(default = "default_available")]
    pub available: bool,

    /// Whether the product is featured
    #[serde(default)]
    pub featured: bool,

    /// Cake attributes
    pub cake: Option<CakeFixture>,

    /// Pastry attributes
    pub pastry: Option<PastryFixture>,
}

/// Cake attributes in YAML
#[derive(Debug, Deserialize)]
pub struct CakeFixture {
    /// Shape
    pub shape: CakeShape,

    /// Size at which the base price applies
    pub base_size_inches: u32,

    /// Most layers a shopper may pick
    pub max_layers: u32,

    /// Flavours
    pub flavors: Vec<String>,

    /// Frostings
    #[serde(default)]
    pub frostings: Vec<String>,

    /// Decorations
    #[serde(default)]
    pub decor_options: Vec<String>,
}

/// Pastry attributes in YAML
#[derive(Debug, Default, Deserialize)]
pub struct PastryFixture {
    /// Per-size options, keyed by size
    #[serde(default)]
    pub sizes: Option<SizesFixture>,

    /// Pieces per pack
    #[serde(default)]
    pub pack_quantity: Option<u32>,
}

/// Per-size options in YAML
#[derive(Debug, Default, Deserialize)]
pub struct SizesFixture {
    /// Small
    pub small: Option<SizeOptionFixture>,

    /// Midi
    pub midi: Option<SizeOptionFixture>,

    /// Large
    pub large: Option<SizeOptionFixture>,
}

/// One size option in YAML
#[derive(Debug, Deserialize)]
pub struct SizeOptionFixture {
    /// Whether the size can be ordered
    #[serde(default = "default_available")]
    pub available: bool,

    /// Unit price (e.g., "1.50 GBP")
    pub price: String,
}

fn default_available() -> bool {
    true
}

impl TryFrom<ProductFixture> for Product<'_> {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let price = parse_money(&fixture.price)?;

        let kind = match (fixture.cake, fixture.pastry) {
            (Some(cake), None) => {
                if cake.flavors.is_empty() {
                    return Err(FixtureError::InvalidProduct(fixture.id));
                }

                ProductKind::Cake(CakeProduct {
                    shape: cake.shape,
                    base_size_inches: cake.base_size_inches,
                    max_layers: cake.max_layers,
                    flavors: cake.flavors,
                    frostings: cake.frostings,
                    decor_options: cake.decor_options,
                })
            }
            (None, Some(pastry)) => ProductKind::Pastry(PastryProduct {
                sizes: pastry.sizes.map(pastry_sizes).transpose()?,
                pack_quantity: pastry.pack_quantity,
            }),
            _ => return Err(FixtureError::InvalidProduct(fixture.id)),
        };

        Ok(Product {
            id: fixture.id,
            name: fixture.name,
            description: fixture.description,
            category: fixture.category,
            image_url: fixture.image_url,
            price,
            available: fixture.available,
            featured: fixture.featured,
            kind,
        })
    }
}

fn pastry_sizes<'a>(fixture: SizesFixture) -> Result<PastrySizes<'a>, FixtureError> {
    let entries = [
        (PastrySize::Small, fixture.small),
        (PastrySize::Midi, fixture.midi),
        (PastrySize::Large, fixture.large),
    ];

    entries.into_iter().try_fold(
        PastrySizes::default(),
        |sizes, (size, option)| -> Result<PastrySizes<'a>, FixtureError> {
            let Some(option) = option else {
                return Ok(sizes);
            };

            Ok(sizes.with(
                size,
                SizeOption {
                    available: option.available,
                    price: parse_money(&option.price)?,
                },
            ))
        },
    )
}

/// Parse a price string (e.g., "2.99 GBP") into money
///
/// # Errors
///
/// Returns an error if the price cannot be parsed.
pub fn parse_money(s: &str) -> Result<Money<'static, Currency>, FixtureError> {
    let (minor_units, currency) = parse_price(s)?;

    Ok(Money::from_minor(minor_units, currency))
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
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, parse_currency(currency_code)?))
}

/// Parse an ISO currency code
///
/// # Errors
///
/// Returns an error if the currency code is not recognized.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}
