//! Cart
//!
//! Cart lines are snapshots taken when the shopper adds a configured product.
//! Every operation on a [`Cart`] returns a new cart and leaves the original
//! untouched, so whatever persists the cart decides when a change is committed.

use std::{convert::Infallible, fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    pricing::CUSTOM_SIZE_FALLBACK_INCHES,
    products::{CakeShape, PastrySize},
    summary::{OrderSummary, SummaryError},
};

pub mod selection;

/// Errors related to cart construction and updates.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// An item's currency differs from the cart currency (index, item currency, cart currency).
    #[error("Item {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// Quantities start at one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// No line at the given index.
    #[error("no cart line at index {index}; cart has {len} lines")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of lines in the cart
        len: usize,
    },

    /// A rescaled line total does not fit in minor units.
    #[error("line total overflowed")]
    Overflow,
}

/// Cake size chosen by the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CakeSize {
    /// Size in inches
    Inches(u32),

    /// Free-text size agreed with the bakery
    Custom(String),
}

impl CakeSize {
    /// Size to price the cake at; free-text sizes use [`CUSTOM_SIZE_FALLBACK_INCHES`].
    pub fn inches_or_default(&self) -> u32 {
        match self {
            CakeSize::Inches(inches) => *inches,
            CakeSize::Custom(_) => CUSTOM_SIZE_FALLBACK_INCHES,
        }
    }
}

impl fmt::Display for CakeSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CakeSize::Inches(inches) => write!(f, "{inches} inches"),
            CakeSize::Custom(text) => f.write_str(text),
        }
    }
}

impl FromStr for CakeSize {
    type Err = Infallible;

    /// Whole numbers are read as inches; anything else is kept as free text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        Ok(s.parse()
            .map_or_else(|_err| CakeSize::Custom(s.to_string()), CakeSize::Inches))
    }
}

/// Options the shopper picked for a cart line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Customizations {
    /// Cake shape
    pub shape: Option<CakeShape>,

    /// Cake size
    pub size: Option<CakeSize>,

    /// Number of cake layers
    pub layers: Option<u32>,

    /// Flavour
    pub flavor: Option<String>,

    /// Frosting
    pub frosting: Option<String>,

    /// Decorations
    pub decorations: Option<String>,

    /// Pastry size or pack selection
    pub pack_size: Option<PastrySize>,
}

impl Customizations {
    /// Human-readable `Label: value` lines for the options that were set.
    pub fn describe(&self) -> SmallVec<[String; 7]> {
        let mut lines = SmallVec::new();

        if let Some(shape) = self.shape {
            lines.push(format!("Shape: {shape}"));
        }

        if let Some(size) = &self.size {
            lines.push(format!("Size: {size}"));
        }

        if let Some(layers) = self.layers {
            lines.push(format!("Layers: {layers}"));
        }

        if let Some(flavor) = &self.flavor {
            lines.push(format!("Flavor: {flavor}"));
        }

        if let Some(frosting) = &self.frosting {
            lines.push(format!("Frosting: {frosting}"));
        }

        if let Some(decorations) = &self.decorations {
            lines.push(format!("Decorations: {decorations}"));
        }

        if let Some(pack_size) = self.pack_size {
            lines.push(format!("Size: {pack_size}"));
        }

        lines
    }
}

/// A line in the shopping cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem<'a> {
    product_id: String,
    name: String,
    image_url: String,
    quantity: u32,
    base_price: Money<'a, Currency>,
    total_price: Money<'a, Currency>,
    customizations: Customizations,
    pack_eligible: bool,
}

impl<'a> CartItem<'a> {
    /// Creates a cart line. `total_price` covers the whole `quantity`.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: `quantity` is zero.
    pub fn new(
        product_id: impl Into<String>,
        name: impl Into<String>,
        quantity: u32,
        base_price: Money<'a, Currency>,
        total_price: Money<'a, Currency>,
    ) -> Result<Self, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        Ok(Self {
            product_id: product_id.into(),
            name: name.into(),
            image_url: String::new(),
            quantity,
            base_price,
            total_price,
            customizations: Customizations::default(),
            pack_eligible: false,
        })
    }

    /// Sets the image shown for the line.
    #[must_use]
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    /// Sets the shopper's options.
    #[must_use]
    pub fn with_customizations(mut self, customizations: Customizations) -> Self {
        self.customizations = customizations;
        self
    }

    /// Marks whether the line's quantity counts towards the pack discount.
    #[must_use]
    pub fn with_pack_eligible(mut self, pack_eligible: bool) -> Self {
        self.pack_eligible = pack_eligible;
        self
    }

    /// Returns a copy of the line with a new quantity and a rescaled total.
    ///
    /// The total keeps the line's per-unit price; any fraction of a minor unit
    /// is rounded half away from zero.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: `quantity` is zero.
    /// - [`CartError::Overflow`]: the new total does not fit in minor units.
    pub fn with_quantity(&self, quantity: u32) -> Result<Self, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        let total_minor = Decimal::from(self.total_price.to_minor_units())
            .checked_mul(Decimal::from(quantity))
            .and_then(|scaled| scaled.checked_div(Decimal::from(self.quantity)))
            .map(|scaled| scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|scaled| scaled.to_i64())
            .ok_or(CartError::Overflow)?;

        Ok(Self {
            quantity,
            total_price: Money::from_minor(total_minor, self.total_price.currency()),
            ..self.clone()
        })
    }

    /// Catalog id of the product this line was made from.
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// Product name at the time the line was added.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Product image at the time the line was added.
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    /// Number of units on the line.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Product base price at the time the line was added.
    pub fn base_price(&self) -> &Money<'a, Currency> {
        &self.base_price
    }

    /// Price of the whole line.
    pub fn total_price(&self) -> &Money<'a, Currency> {
        &self.total_price
    }

    /// Shopper's options.
    pub fn customizations(&self) -> &Customizations {
        &self.customizations
    }

    /// Whether the line counts towards the pack discount.
    pub fn pack_eligible(&self) -> bool {
        self.pack_eligible
    }
}

/// Cart
#[derive(Debug, Clone, PartialEq)]
pub struct Cart<'a> {
    items: Vec<CartItem<'a>>,
    currency: &'a Currency,
}

impl<'a> Cart<'a> {
    /// Create an empty cart.
    pub fn new(currency: &'a Currency) -> Self {
        Cart {
            items: Vec::new(),
            currency,
        }
    }

    /// Create a new cart with the given items.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if there was a currency mismatch error.
    pub fn with_items(
        items: impl Into<Vec<CartItem<'a>>>,
        currency: &'a Currency,
    ) -> Result<Self, CartError> {
        let items = items.into();

        items
            .iter()
            .enumerate()
            .try_for_each(|(i, item)| check_currency(i, item, currency))?;

        Ok(Cart { items, currency })
    }

    /// Returns a new cart with `item` appended.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if the item's currency differs from the cart's.
    pub fn with_item(&self, item: CartItem<'a>) -> Result<Self, CartError> {
        check_currency(self.items.len(), &item, self.currency)?;

        let mut items = self.items.clone();
        items.push(item);

        Ok(Cart {
            items,
            currency: self.currency,
        })
    }

    /// Returns a new cart with the quantity of line `index` changed.
    ///
    /// # Errors
    ///
    /// - [`CartError::IndexOutOfRange`]: there is no such line.
    /// - [`CartError::InvalidQuantity`]: `quantity` is zero.
    /// - [`CartError::Overflow`]: the new line total does not fit in minor units.
    pub fn with_quantity(&self, index: usize, quantity: u32) -> Result<Self, CartError> {
        let updated = self.line(index)?.with_quantity(quantity)?;

        let items = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                if i == index {
                    updated.clone()
                } else {
                    item.clone()
                }
            })
            .collect();

        Ok(Cart {
            items,
            currency: self.currency,
        })
    }

    /// Returns a new cart without line `index`.
    ///
    /// # Errors
    ///
    /// - [`CartError::IndexOutOfRange`]: there is no such line.
    pub fn without_item(&self, index: usize) -> Result<Self, CartError> {
        self.line(index)?;

        let items = self
            .items
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, item)| item.clone())
            .collect();

        Ok(Cart {
            items,
            currency: self.currency,
        })
    }

    /// Returns an empty cart in the same currency.
    #[must_use]
    pub fn cleared(&self) -> Self {
        Cart::new(self.currency)
    }

    /// Cart lines, in the order they were added.
    pub fn items(&self) -> &[CartItem<'a>] {
        &self.items
    }

    /// Iterate over the cart lines.
    pub fn iter(&self) -> impl Iterator<Item = &CartItem<'a>> {
        self.items.iter()
    }

    /// Get the number of lines in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    /// Calculate the order summary for the cart.
    ///
    /// # Errors
    ///
    /// Returns a `SummaryError` if the totals cannot be calculated.
    pub fn summary(&self) -> Result<OrderSummary<'a>, SummaryError> {
        OrderSummary::from_items(&self.items, self.currency)
    }

    fn line(&self, index: usize) -> Result<&CartItem<'a>, CartError> {
        self.items.get(index).ok_or(CartError::IndexOutOfRange {
            index,
            len: self.items.len(),
        })
    }
}

fn check_currency(index: usize, item: &CartItem<'_>, currency: &Currency) -> Result<(), CartError> {
    let item_currency = item.total_price().currency();

    if item_currency == currency {
        Ok(())
    } else {
        Err(CartError::CurrencyMismatch(
            index,
            item_currency.iso_alpha_code,
            currency.iso_alpha_code,
        ))
    }
}
