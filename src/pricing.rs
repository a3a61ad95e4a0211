//! Pricing
//!
//! Unit price calculation for cakes and pastries. All arithmetic is done in
//! minor currency units, so prices are exact and never rounded here.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::products::{CakeShape, PastrySize, PastrySizes};

/// Size, in inches, at which a cake's base price applies.
pub const BASE_SIZE_INCHES: u32 = 6;

/// Surcharge per inch above [`BASE_SIZE_INCHES`], in minor units (£5).
pub const SIZE_SURCHARGE_PER_INCH: i64 = 500;

/// Minimum price per layer for any non-round cake, in minor units (£20).
pub const SHAPED_CAKE_MINIMUM_PER_LAYER: i64 = 2_000;

/// Size substituted for a free-text "custom" cake size.
pub const CUSTOM_SIZE_FALLBACK_INCHES: u32 = 8;

/// Errors that can occur while pricing an item.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A cake needs at least one layer.
    #[error("a cake needs at least one layer")]
    InvalidLayers,

    /// Quantities start at one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// Base prices can't be negative.
    #[error("base price must not be negative, got {0} minor units")]
    NegativePrice(i64),

    /// The price does not fit in minor units.
    #[error("price overflowed")]
    Overflow,
}

/// Calculates the price of one cake.
///
/// Starts from `base_price` (6 inches, 1 layer), adds [`SIZE_SURCHARGE_PER_INCH`]
/// for every inch above [`BASE_SIZE_INCHES`], multiplies by `layers`, then lifts
/// non-round shapes to [`SHAPED_CAKE_MINIMUM_PER_LAYER`] per layer.
///
/// # Errors
///
/// - [`PricingError::InvalidLayers`]: `layers` is zero.
/// - [`PricingError::NegativePrice`]: `base_price` is below zero.
/// - [`PricingError::Overflow`]: the price does not fit in minor units.
pub fn cake_price<'a>(
    base_price: Money<'a, Currency>,
    shape: CakeShape,
    size_inches: u32,
    layers: u32,
) -> Result<Money<'a, Currency>, PricingError> {
    if layers == 0 {
        return Err(PricingError::InvalidLayers);
    }

    let base_minor = non_negative_minor(&base_price)?;
    let layers = i64::from(layers);

    let surcharge = i64::from(size_inches.saturating_sub(BASE_SIZE_INCHES))
        .checked_mul(SIZE_SURCHARGE_PER_INCH)
        .ok_or(PricingError::Overflow)?;

    let mut price = base_minor
        .checked_add(surcharge)
        .and_then(|price| price.checked_mul(layers))
        .ok_or(PricingError::Overflow)?;

    if shape.has_minimum_price() {
        let floor = SHAPED_CAKE_MINIMUM_PER_LAYER
            .checked_mul(layers)
            .ok_or(PricingError::Overflow)?;

        price = price.max(floor);
    }

    Ok(Money::from_minor(price, base_price.currency()))
}

/// Calculates the price of `quantity` pastries at `size`.
///
/// The unit price is the `sizes` entry for `size` when there is one, and
/// `base_price` otherwise. Availability is not checked here.
///
/// # Errors
///
/// - [`PricingError::InvalidQuantity`]: `quantity` is zero.
/// - [`PricingError::NegativePrice`]: the unit price is below zero.
/// - [`PricingError::Overflow`]: the total does not fit in minor units.
pub fn pastry_price<'a>(
    base_price: Money<'a, Currency>,
    size: PastrySize,
    quantity: u32,
    sizes: Option<&PastrySizes<'a>>,
) -> Result<Money<'a, Currency>, PricingError> {
    if quantity == 0 {
        return Err(PricingError::InvalidQuantity);
    }

    let unit_price = match sizes.and_then(|sizes| sizes.get(size)) {
        Some(option) => option.price,
        None => {
            debug!(%size, "no price for pastry size, using base price");
            base_price
        }
    };

    let total = non_negative_minor(&unit_price)?
        .checked_mul(i64::from(quantity))
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(total, unit_price.currency()))
}

/// Multiplies a unit price by a quantity.
///
/// # Errors
///
/// - [`PricingError::InvalidQuantity`]: `quantity` is zero.
/// - [`PricingError::Overflow`]: the total does not fit in minor units.
pub fn line_total<'a>(
    unit_price: Money<'a, Currency>,
    quantity: u32,
) -> Result<Money<'a, Currency>, PricingError> {
    if quantity == 0 {
        return Err(PricingError::InvalidQuantity);
    }

    let total = unit_price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(total, unit_price.currency()))
}

fn non_negative_minor(price: &Money<'_, Currency>) -> Result<i64, PricingError> {
    let minor = price.to_minor_units();

    if minor < 0 {
        Err(PricingError::NegativePrice(minor))
    } else {
        Ok(minor)
    }
}
