//! Checkout

use std::fmt;

use clap::ValueEnum;
use rusty_money::{Money, MoneyError, iso::Currency};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    cart::Cart,
    summary::{OrderSummary, SummaryError},
};

/// Express delivery charge, in minor units of the order currency (£5.99).
pub const EXPRESS_DELIVERY_CHARGE: i64 = 599;

/// Errors that can occur while totalling a checkout.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// Order summary error.
    #[error(transparent)]
    Summary(#[from] SummaryError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Nothing to check out.
    #[error("cart is empty")]
    EmptyCart,
}

/// How the order reaches the shopper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    /// Free standard delivery
    #[default]
    Standard,

    /// Next-day delivery for a flat charge
    Express,
}

impl DeliveryMethod {
    /// Charge for this delivery method in `currency`.
    pub fn charge(self, currency: &Currency) -> Money<'_, Currency> {
        match self {
            DeliveryMethod::Standard => Money::from_minor(0, currency),
            DeliveryMethod::Express => Money::from_minor(EXPRESS_DELIVERY_CHARGE, currency),
        }
    }
}

impl fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryMethod::Standard => f.write_str("Standard"),
            DeliveryMethod::Express => f.write_str("Express"),
        }
    }
}

/// Order total plus the delivery charge.
///
/// # Errors
///
/// Returns a [`MoneyError`] if the addition fails.
pub fn checkout_total<'a>(
    summary: &OrderSummary<'a>,
    delivery: DeliveryMethod,
) -> Result<Money<'a, Currency>, MoneyError> {
    let total = summary.total();

    total.add(delivery.charge(total.currency()))
}

/// Everything the checkout page shows for a cart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Checkout<'a> {
    summary: OrderSummary<'a>,
    delivery: DeliveryMethod,
    delivery_charge: Money<'a, Currency>,
    grand_total: Money<'a, Currency>,
    item_count: u64,
}

impl<'a> Checkout<'a> {
    /// Total up `cart` for delivery by `delivery`.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`]: the cart has no lines.
    /// - [`CheckoutError::Summary`]: the cart cannot be summarised.
    /// - [`CheckoutError::Money`]: the delivery charge cannot be added.
    pub fn new(cart: &Cart<'a>, delivery: DeliveryMethod) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let summary = cart.summary()?;
        let grand_total = checkout_total(&summary, delivery)?;

        Ok(Self {
            summary,
            delivery,
            delivery_charge: delivery.charge(cart.currency()),
            grand_total,
            item_count: cart.item_count(),
        })
    }

    /// Summary of the cart being checked out.
    pub fn summary(&self) -> &OrderSummary<'a> {
        &self.summary
    }

    /// Chosen delivery method.
    pub fn delivery(&self) -> DeliveryMethod {
        self.delivery
    }

    /// Charge for the chosen delivery method.
    pub fn delivery_charge(&self) -> Money<'a, Currency> {
        self.delivery_charge
    }

    /// Amount payable, delivery included.
    pub fn grand_total(&self) -> Money<'a, Currency> {
        self.grand_total
    }

    /// Units across all lines.
    pub fn item_count(&self) -> u64 {
        self.item_count
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use crate::cart::CartItem;

    use super::*;

    fn gbp<'a>(minor: i64) -> Money<'a, Currency> {
        Money::from_minor(minor, GBP)
    }

    fn puff_puffs<'a>(quantity: u32) -> Result<Cart<'a>, crate::cart::CartError> {
        let line = CartItem::new(
            "pastry-2",
            "Puff-Puff",
            quantity,
            gbp(100),
            gbp(100 * i64::from(quantity)),
        )?
        .with_pack_eligible(true);

        Cart::new(GBP).with_item(line)
    }

    #[test]
    fn standard_delivery_is_free() -> TestResult {
        let summary = puff_puffs(3)?.summary()?;

        assert_eq!(checkout_total(&summary, DeliveryMethod::Standard)?, gbp(300));

        Ok(())
    }

    #[test]
    fn express_delivery_adds_flat_charge() -> TestResult {
        let summary = puff_puffs(20)?.summary()?;

        // £20.00 less 10% plus £5.99
        assert_eq!(checkout_total(&summary, DeliveryMethod::Express)?, gbp(2_399));

        Ok(())
    }

    #[test]
    fn checkout_carries_counts_and_charges() -> TestResult {
        let checkout = Checkout::new(&puff_puffs(4)?, DeliveryMethod::Express)?;

        assert_eq!(checkout.item_count(), 4);
        assert_eq!(checkout.delivery(), DeliveryMethod::Express);
        assert_eq!(checkout.delivery_charge(), gbp(599));
        assert_eq!(checkout.grand_total(), gbp(999));
        assert_eq!(checkout.summary().total(), gbp(400));

        Ok(())
    }

    #[test]
    fn empty_cart_cannot_be_checked_out() {
        assert_eq!(
            Checkout::new(&Cart::new(GBP), DeliveryMethod::Standard),
            Err(CheckoutError::EmptyCart)
        );
    }
}
