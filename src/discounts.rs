//! Discounts
//!
//! The bulk pack discount: ordering 20 or more discount-eligible packs earns
//! 10% off, rising by 2.5 points for every further complete block of 20 packs
//! and capped at 20%.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use thiserror::Error;

/// Packs needed before any discount applies.
pub const PACK_DISCOUNT_THRESHOLD: u32 = 20;

/// Size of each further block of packs that raises the discount.
pub const PACK_DISCOUNT_STEP: u32 = 20;

/// Discount earned at the threshold, in percent points.
const BASE_DISCOUNT_POINTS: Decimal = Decimal::TEN;

/// Discount added per complete step, in percent points (2.5).
const STEP_DISCOUNT_POINTS: Decimal = Decimal::from_parts(25, 0, 0, false, 1);

/// Highest discount, in percent points.
const MAX_DISCOUNT_POINTS: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,
}

/// Discount for a number of eligible packs, in percent points (0 to 20).
pub fn pack_discount_points(total_packs: u32) -> Decimal {
    let Some(extra_packs) = total_packs.checked_sub(PACK_DISCOUNT_THRESHOLD) else {
        return Decimal::ZERO;
    };

    let steps = Decimal::from(extra_packs / PACK_DISCOUNT_STEP);

    (BASE_DISCOUNT_POINTS + steps * STEP_DISCOUNT_POINTS).min(MAX_DISCOUNT_POINTS)
}

/// Discount for a number of eligible packs, as a fraction.
pub fn pack_discount(total_packs: u32) -> Percentage {
    Percentage::from(pack_discount_points(total_packs) / Decimal::ONE_HUNDRED)
}

/// Packs still needed to reach the next discount step.
///
/// Returns `None` once the maximum discount has been reached.
pub fn packs_to_next_discount(total_packs: u32) -> Option<u32> {
    if pack_discount_points(total_packs) >= MAX_DISCOUNT_POINTS {
        return None;
    }

    let Some(extra_packs) = total_packs.checked_sub(PACK_DISCOUNT_THRESHOLD) else {
        return Some(PACK_DISCOUNT_THRESHOLD - total_packs);
    };

    Some(PACK_DISCOUNT_STEP - extra_packs % PACK_DISCOUNT_STEP)
}

/// Converts a fractional percentage to percent points for display.
pub fn percent_points(percent: Percentage) -> Decimal {
    // decimal_percentage doesn't expose the underlying Decimal
    ((percent * Decimal::ONE) * Decimal::ONE_HUNDRED).normalize()
}

/// Calculate the discount amount in minor units based on a percentage and a minor unit amount.
///
/// The result is rounded to a whole minor unit, half away from zero.
///
/// # Errors
///
/// Returns an error if:
/// - The percentage calculation overflows or cannot be safely represented (`DiscountError::PercentConversion`).
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}
