//! Selections
//!
//! Turns a product and the options a shopper picked into a priced cart line.
//! Pack eligibility is decided here, once, from the product family.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    cart::{CakeSize, CartError, CartItem, Customizations},
    pricing::{PricingError, cake_price, line_total, pastry_price},
    products::{PastrySize, Product, ProductKind},
};

/// Errors raised while turning a selection into a cart line.
#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    /// The product can't currently be ordered.
    #[error("{0} is not available")]
    Unavailable(String),

    /// The selection is for a different product family.
    #[error("{product} is a {family}, but the selection is for a {selected}")]
    KindMismatch {
        /// Product id
        product: String,
        /// Family of the product
        family: &'static str,
        /// Family of the selection
        selected: &'static str,
    },

    /// More layers than the cake allows.
    #[error("{product} allows at most {max} layers, got {layers}")]
    TooManyLayers {
        /// Product id
        product: String,
        /// Requested layers
        layers: u32,
        /// Allowed layers
        max: u32,
    },

    /// Price calculation error.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Cart line construction error.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Options picked for a cake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CakeSelection {
    /// Size
    pub size: CakeSize,

    /// Number of layers
    pub layers: u32,

    /// Flavour; the product's first flavour when unset
    pub flavor: Option<String>,

    /// Frosting
    pub frosting: Option<String>,

    /// Decorations
    pub decorations: Option<String>,
}

impl CakeSelection {
    /// One-layer cake of the given size with default options.
    pub fn new(size: CakeSize, layers: u32) -> Self {
        Self {
            size,
            layers,
            flavor: None,
            frosting: None,
            decorations: None,
        }
    }
}

/// Options picked for a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Cake options
    Cake(CakeSelection),

    /// Pastry size
    Pastry(PastrySize),
}

impl Selection {
    fn family(&self) -> &'static str {
        match self {
            Selection::Cake(_) => "cake",
            Selection::Pastry(_) => "pastry",
        }
    }
}

/// Price `quantity` units of `product` configured with `selection`.
///
/// # Errors
///
/// Returns a [`SelectionError`] if the selection does not fit the product or
/// the price cannot be calculated.
pub fn quote<'a>(
    product: &Product<'a>,
    selection: &Selection,
    quantity: u32,
) -> Result<Money<'a, Currency>, SelectionError> {
    match (&product.kind, selection) {
        (ProductKind::Cake(cake), Selection::Cake(options)) => {
            if options.layers > cake.max_layers {
                return Err(SelectionError::TooManyLayers {
                    product: product.id.clone(),
                    layers: options.layers,
                    max: cake.max_layers,
                });
            }

            let unit_price = cake_price(
                product.price,
                cake.shape,
                options.size.inches_or_default(),
                options.layers,
            )?;

            Ok(line_total(unit_price, quantity)?)
        }
        (ProductKind::Pastry(pastry), Selection::Pastry(size)) => Ok(pastry_price(
            product.price,
            *size,
            quantity,
            pastry.sizes.as_ref(),
        )?),
        _ => Err(SelectionError::KindMismatch {
            product: product.id.clone(),
            family: product.family(),
            selected: selection.family(),
        }),
    }
}

impl<'a> CartItem<'a> {
    /// Build a cart line for `quantity` units of `product` configured with `selection`.
    ///
    /// Pastry lines count towards the pack discount; cake lines don't.
    ///
    /// # Errors
    ///
    /// Returns a [`SelectionError`] if the product is unavailable, the selection
    /// does not fit the product, or the price cannot be calculated.
    pub fn from_selection(
        product: &Product<'a>,
        selection: &Selection,
        quantity: u32,
    ) -> Result<Self, SelectionError> {
        if !product.available {
            return Err(SelectionError::Unavailable(product.id.clone()));
        }

        let total_price = quote(product, selection, quantity)?;

        let (customizations, pack_eligible) = match (&product.kind, selection) {
            (ProductKind::Cake(cake), Selection::Cake(options)) => (
                Customizations {
                    shape: Some(cake.shape),
                    size: Some(options.size.clone()),
                    layers: Some(options.layers),
                    flavor: options
                        .flavor
                        .clone()
                        .or_else(|| cake.flavors.first().cloned()),
                    frosting: options.frosting.clone(),
                    decorations: options.decorations.clone(),
                    pack_size: None,
                },
                false,
            ),
            (_, Selection::Pastry(size)) => (
                Customizations {
                    pack_size: Some(*size),
                    ..Customizations::default()
                },
                true,
            ),
            (_, Selection::Cake(_)) => (Customizations::default(), false),
        };

        Ok(
            CartItem::new(&product.id, &product.name, quantity, product.price, total_price)?
                .with_image_url(&product.image_url)
                .with_customizations(customizations)
                .with_pack_eligible(pack_eligible),
        )
    }
}
