//! Products
//!
//! Catalog records for the two product families the bakery sells. A product is
//! either a [`CakeProduct`] or a [`PastryProduct`]; the family is fixed when the
//! product is built and carried as the [`ProductKind`] discriminant.

use std::{fmt, str::FromStr};

use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use slotmap::new_key_type;
use thiserror::Error;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// A string could not be parsed into one of the fixed product options.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownOption {
    kind: &'static str,
    value: String,
}

/// Cake shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CakeShape {
    /// Round
    Round,

    /// Square
    Square,

    /// Heart
    Heart,

    /// Custom shape, agreed with the bakery
    Custom,
}

impl CakeShape {
    /// Lowercase name of the shape.
    pub const fn as_str(self) -> &'static str {
        match self {
            CakeShape::Round => "round",
            CakeShape::Square => "square",
            CakeShape::Heart => "heart",
            CakeShape::Custom => "custom",
        }
    }

    /// Whether the per-layer minimum price applies to this shape.
    pub const fn has_minimum_price(self) -> bool {
        !matches!(self, CakeShape::Round)
    }
}

impl fmt::Display for CakeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CakeShape {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "round" => Ok(CakeShape::Round),
            "square" => Ok(CakeShape::Square),
            "heart" => Ok(CakeShape::Heart),
            "custom" => Ok(CakeShape::Custom),
            _ => Err(UnknownOption {
                kind: "cake shape",
                value: s.to_string(),
            }),
        }
    }
}

/// Pastry size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PastrySize {
    /// Small
    Small,

    /// Midi
    Midi,

    /// Large
    Large,
}

impl PastrySize {
    /// Every size, smallest first.
    pub const ALL: [PastrySize; 3] = [PastrySize::Small, PastrySize::Midi, PastrySize::Large];

    /// Lowercase name of the size.
    pub const fn as_str(self) -> &'static str {
        match self {
            PastrySize::Small => "small",
            PastrySize::Midi => "midi",
            PastrySize::Large => "large",
        }
    }
}

impl fmt::Display for PastrySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PastrySize {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(PastrySize::Small),
            "midi" => Ok(PastrySize::Midi),
            "large" => Ok(PastrySize::Large),
            _ => Err(UnknownOption {
                kind: "pastry size",
                value: s.to_string(),
            }),
        }
    }
}

/// Price and availability of one pastry size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeOption<'a> {
    /// Whether the size can currently be ordered
    pub available: bool,

    /// Unit price at this size
    pub price: Money<'a, Currency>,
}

/// Per-size prices of a pastry. Any size may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PastrySizes<'a> {
    /// Small
    pub small: Option<SizeOption<'a>>,

    /// Midi
    pub midi: Option<SizeOption<'a>>,

    /// Large
    pub large: Option<SizeOption<'a>>,
}

impl<'a> PastrySizes<'a> {
    /// Look up the option for a size.
    pub fn get(&self, size: PastrySize) -> Option<&SizeOption<'a>> {
        match size {
            PastrySize::Small => self.small.as_ref(),
            PastrySize::Midi => self.midi.as_ref(),
            PastrySize::Large => self.large.as_ref(),
        }
    }

    /// Set the option for a size, returning the updated map.
    #[must_use]
    pub fn with(mut self, size: PastrySize, option: SizeOption<'a>) -> Self {
        match size {
            PastrySize::Small => self.small = Some(option),
            PastrySize::Midi => self.midi = Some(option),
            PastrySize::Large => self.large = Some(option),
        }

        self
    }

    /// Sizes a shopper can currently pick, smallest first.
    pub fn available(&self) -> impl Iterator<Item = (PastrySize, &SizeOption<'a>)> {
        PastrySize::ALL.into_iter().filter_map(|size| {
            self.get(size)
                .filter(|option| option.available)
                .map(|option| (size, option))
        })
    }
}

/// Cake-specific product attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct CakeProduct {
    /// Shape the cake is baked in
    pub shape: CakeShape,

    /// Size, in inches, at which the base price applies
    pub base_size_inches: u32,

    /// Upper bound on the selectable number of layers
    pub max_layers: u32,

    /// Selectable flavours, in display order
    pub flavors: Vec<String>,

    /// Selectable frostings
    pub frostings: Vec<String>,

    /// Selectable decorations
    pub decor_options: Vec<String>,
}

/// Pastry-specific product attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PastryProduct<'a> {
    /// Per-size prices, when the pastry comes in sizes
    pub sizes: Option<PastrySizes<'a>>,

    /// Pieces per sellable pack
    pub pack_quantity: Option<u32>,
}

/// Product family
#[derive(Debug, Clone, PartialEq)]
pub enum ProductKind<'a> {
    /// Configurable cake
    Cake(CakeProduct),

    /// Pastry sold by size or by pack
    Pastry(PastryProduct<'a>),
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    /// Catalog identifier, e.g. `cake-1`
    pub id: String,

    /// Display name
    pub name: String,

    /// Display description
    pub description: String,

    /// Category slug, e.g. `cakes` or `meat-pies`
    pub category: String,

    /// Image shown for the product
    pub image_url: String,

    /// Base unit price at the product's minimal configuration
    pub price: Money<'a, Currency>,

    /// Whether the product can be ordered
    pub available: bool,

    /// Whether the product is featured on the storefront
    pub featured: bool,

    /// Family-specific attributes
    pub kind: ProductKind<'a>,
}

impl<'a> Product<'a> {
    /// Cake attributes, if this product is a cake.
    pub fn as_cake(&self) -> Option<&CakeProduct> {
        match &self.kind {
            ProductKind::Cake(cake) => Some(cake),
            ProductKind::Pastry(_) => None,
        }
    }

    /// Pastry attributes, if this product is a pastry.
    pub fn as_pastry(&self) -> Option<&PastryProduct<'a>> {
        match &self.kind {
            ProductKind::Pastry(pastry) => Some(pastry),
            ProductKind::Cake(_) => None,
        }
    }

    /// Name of the product family.
    pub fn family(&self) -> &'static str {
        match self.kind {
            ProductKind::Cake(_) => "cake",
            ProductKind::Pastry(_) => "pastry",
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use super::*;

    fn meat_pie_sizes<'a>() -> PastrySizes<'a> {
        PastrySizes::default()
            .with(
                PastrySize::Small,
                SizeOption {
                    available: true,
                    price: Money::from_minor(100, GBP),
                },
            )
            .with(
                PastrySize::Large,
                SizeOption {
                    available: false,
                    price: Money::from_minor(200, GBP),
                },
            )
    }

    #[test]
    fn only_round_cakes_skip_the_minimum_price() {
        assert!(!CakeShape::Round.has_minimum_price());
        assert!(CakeShape::Square.has_minimum_price());
        assert!(CakeShape::Heart.has_minimum_price());
        assert!(CakeShape::Custom.has_minimum_price());
    }

    #[test]
    fn cake_shape_parses_case_insensitively() -> TestResult {
        assert_eq!("Heart".parse::<CakeShape>()?, CakeShape::Heart);
        assert_eq!(" square ".parse::<CakeShape>()?, CakeShape::Square);

        Ok(())
    }

    #[test]
    fn unknown_pastry_size_is_rejected() {
        let result = "jumbo".parse::<PastrySize>();

        assert_eq!(
            result,
            Err(UnknownOption {
                kind: "pastry size",
                value: "jumbo".to_string(),
            })
        );
    }

    #[test]
    fn sizes_lookup_returns_configured_entries_only() {
        let sizes = meat_pie_sizes();

        assert_eq!(
            sizes.get(PastrySize::Small).map(|option| option.price),
            Some(Money::from_minor(100, GBP))
        );
        assert!(sizes.get(PastrySize::Midi).is_none());
    }

    #[test]
    fn available_sizes_skip_unavailable_entries() {
        let sizes = meat_pie_sizes();

        let available: Vec<PastrySize> = sizes.available().map(|(size, _)| size).collect();

        assert_eq!(available, vec![PastrySize::Small]);
    }

    #[test]
    fn family_matches_kind() {
        let product = Product {
            id: "pastry-2".to_string(),
            name: "Puff-Puff".to_string(),
            description: String::new(),
            category: "puff-puffs".to_string(),
            image_url: String::new(),
            price: Money::from_minor(100, GBP),
            available: true,
            featured: false,
            kind: ProductKind::Pastry(PastryProduct {
                sizes: None,
                pack_quantity: Some(5),
            }),
        };

        assert_eq!(product.family(), "pastry");
        assert!(product.as_cake().is_none());
        assert_eq!(product.as_pastry().and_then(|p| p.pack_quantity), Some(5));
    }
}
