//! Order Summary
//!
//! Folds cart lines into a subtotal, applies the pack discount and derives the
//! total. The summary is recomputed whenever it is needed and never stored.

use decimal_percentage::Percentage;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::CartItem,
    discounts::{
        DiscountError, pack_discount, pack_discount_points, packs_to_next_discount,
        percent_of_minor,
    },
};

/// Errors that can occur while summarising an order.
#[derive(Debug, Error, PartialEq)]
pub enum SummaryError {
    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Discount calculation error.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Too many packs to count.
    #[error("eligible pack count overflowed")]
    PackCountOverflow,
}

/// Subtotal, bulk discount and total for a set of cart lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderSummary<'a> {
    subtotal: Money<'a, Currency>,
    discount_percentage: Percentage,
    discount: Money<'a, Currency>,
    total: Money<'a, Currency>,
    eligible_packs: u32,
}

impl<'a> OrderSummary<'a> {
    /// Summarise cart lines.
    ///
    /// The subtotal is the sum of every line's total price. Lines marked as pack
    /// eligible contribute their quantity to the pack count that selects the
    /// discount percentage. The discount is rounded to a whole minor unit and
    /// the total is the subtotal less that discount. An empty slice gives an
    /// all-zero summary in `currency`.
    ///
    /// # Errors
    ///
    /// - [`SummaryError::Money`]: a line is priced in a different currency.
    /// - [`SummaryError::Discount`]: the discount cannot be represented in minor units.
    /// - [`SummaryError::PackCountOverflow`]: the pack count does not fit in a `u32`.
    pub fn from_items(
        items: &[CartItem<'a>],
        currency: &'a Currency,
    ) -> Result<Self, SummaryError> {
        let subtotal = items.iter().try_fold(
            Money::from_minor(0, currency),
            |acc, item| acc.add(*item.total_price()),
        )?;

        let eligible_packs = items
            .iter()
            .filter(|item| item.pack_eligible())
            .try_fold(0u32, |acc, item| acc.checked_add(item.quantity()))
            .ok_or(SummaryError::PackCountOverflow)?;

        let discount_percentage = pack_discount(eligible_packs);
        let discount = Money::from_minor(
            percent_of_minor(&discount_percentage, subtotal.to_minor_units())?,
            currency,
        );
        let total = subtotal.sub(discount)?;

        debug!(
            lines = items.len(),
            eligible_packs,
            subtotal = subtotal.to_minor_units(),
            discount = discount.to_minor_units(),
            "summarised order"
        );

        Ok(Self {
            subtotal,
            discount_percentage,
            discount,
            total,
            eligible_packs,
        })
    }

    /// Sum of every line's total price.
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Discount applied to the subtotal, as a fraction.
    pub fn discount_percentage(&self) -> Percentage {
        self.discount_percentage
    }

    /// Discount applied to the subtotal, in percent points (0 to 20).
    pub fn discount_points(&self) -> rust_decimal::Decimal {
        pack_discount_points(self.eligible_packs)
    }

    /// Amount taken off the subtotal.
    pub fn discount(&self) -> Money<'a, Currency> {
        self.discount
    }

    /// Amount payable.
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Number of pack-eligible units the discount was based on.
    pub fn eligible_packs(&self) -> u32 {
        self.eligible_packs
    }

    /// Whether any discount was applied.
    pub fn has_discount(&self) -> bool {
        self.discount.to_minor_units() > 0
    }

    /// Further packs needed to reach the next discount step, if there is one.
    pub fn packs_to_next_discount(&self) -> Option<u32> {
        packs_to_next_discount(self.eligible_packs)
    }
}
