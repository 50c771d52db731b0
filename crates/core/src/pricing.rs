//! Pricing
//!
//! Amounts are whole currency units. The marketplace currency has no fractional
//! sub-unit, so every computation here stays in checked `u64` arithmetic.

use serde::Serialize;
use thiserror::Error;

use crate::errors::ErrorKind;

/// Errors that can occur while pricing a cart or an order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// Quantity was zero or negative.
    #[error("quantity must be greater than zero, got {0}")]
    InvalidQuantity(i64),

    /// Quantity above [`MAX_QUANTITY`].
    #[error("quantity must be at most {MAX_QUANTITY}, got {0}")]
    QuantityTooLarge(i64),

    /// An intermediate amount did not fit in a `u64`.
    #[error("amount overflowed while pricing")]
    Overflow,

    /// A discount larger than the amount it applies to.
    #[error("discount of {discount} exceeds subtotal of {subtotal}")]
    DiscountExceedsSubtotal {
        /// Discount that was requested.
        discount: u64,

        /// Subtotal it was applied to.
        subtotal: u64,
    },
}

impl PricingError {
    /// Error category.
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidInput
    }
}

/// Largest quantity a single line may hold. Line quantities are stored as
/// signed 32-bit integers.
pub const MAX_QUANTITY: u32 = i32::MAX.unsigned_abs();

/// Validate a caller-supplied quantity.
///
/// # Errors
///
/// - [`PricingError::InvalidQuantity`] if `quantity` is not strictly positive.
/// - [`PricingError::QuantityTooLarge`] if `quantity` exceeds [`MAX_QUANTITY`].
pub fn validate_quantity(quantity: i64) -> Result<u32, PricingError> {
    if quantity <= 0 {
        return Err(PricingError::InvalidQuantity(quantity));
    }

    u32::try_from(quantity)
        .ok()
        .filter(|quantity| *quantity <= MAX_QUANTITY)
        .ok_or(PricingError::QuantityTooLarge(quantity))
}

/// Add `more` units to a line already holding `current`.
///
/// # Errors
///
/// Returns [`PricingError::QuantityTooLarge`] if the sum exceeds [`MAX_QUANTITY`].
pub fn add_quantity(current: u32, more: u32) -> Result<u32, PricingError> {
    let total = i64::from(current) + i64::from(more);

    u32::try_from(total)
        .ok()
        .filter(|total| *total <= MAX_QUANTITY)
        .ok_or(PricingError::QuantityTooLarge(total))
}

/// Price of `quantity` units at `unit_price`.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the product does not fit in a `u64`.
pub fn line_total(unit_price: u64, quantity: u32) -> Result<u64, PricingError> {
    unit_price
        .checked_mul(u64::from(quantity))
        .ok_or(PricingError::Overflow)
}

/// Sum of `(unit_price, quantity)` lines.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if any line or the running sum overflows.
pub fn subtotal<I>(lines: I) -> Result<u64, PricingError>
where
    I: IntoIterator<Item = (u64, u32)>,
{
    lines.into_iter().try_fold(0_u64, |acc, (unit_price, quantity)| {
        acc.checked_add(line_total(unit_price, quantity)?)
            .ok_or(PricingError::Overflow)
    })
}

/// Snapshotted money fields of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderTotals {
    /// Sum of frozen line prices, before delivery and discount.
    pub subtotal: u64,

    /// Restaurant delivery fee.
    pub delivery_fee: u64,

    /// Voucher discount, applied to `subtotal` only.
    pub voucher_discount: u64,

    /// `subtotal + delivery_fee - voucher_discount`
    pub total: u64,
}

impl OrderTotals {
    /// Compute order totals.
    ///
    /// The discount never touches the delivery fee: it must fit inside `subtotal`.
    ///
    /// # Errors
    ///
    /// - [`PricingError::DiscountExceedsSubtotal`] if `voucher_discount > subtotal`.
    /// - [`PricingError::Overflow`] if the total does not fit in a `u64`.
    pub fn new(subtotal: u64, delivery_fee: u64, voucher_discount: u64) -> Result<Self, PricingError> {
        let discounted = subtotal.checked_sub(voucher_discount).ok_or(
            PricingError::DiscountExceedsSubtotal {
                discount: voucher_discount,
                subtotal,
            },
        )?;

        let total = discounted
            .checked_add(delivery_fee)
            .ok_or(PricingError::Overflow)?;

        Ok(Self {
            subtotal,
            delivery_fee,
            voucher_discount,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn validate_quantity_rejects_zero_and_negative() {
        assert_eq!(validate_quantity(0), Err(PricingError::InvalidQuantity(0)));
        assert_eq!(validate_quantity(-3), Err(PricingError::InvalidQuantity(-3)));
    }

    #[test]
    fn validate_quantity_rejects_values_beyond_the_column_limit() {
        let too_many = i64::from(i32::MAX) + 1;

        assert_eq!(
            validate_quantity(too_many),
            Err(PricingError::QuantityTooLarge(too_many))
        );
        assert_eq!(
            validate_quantity(i64::from(u32::MAX) + 1),
            Err(PricingError::QuantityTooLarge(i64::from(u32::MAX) + 1))
        );
        assert_eq!(validate_quantity(i64::from(i32::MAX)), Ok(MAX_QUANTITY));
        assert_eq!(
            PricingError::QuantityTooLarge(too_many).kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn add_quantity_stays_within_the_column_limit() {
        assert_eq!(add_quantity(2, 3), Ok(5));
        assert_eq!(add_quantity(MAX_QUANTITY - 1, 1), Ok(MAX_QUANTITY));
        assert_eq!(
            add_quantity(MAX_QUANTITY, 1),
            Err(PricingError::QuantityTooLarge(i64::from(i32::MAX) + 1))
        );
    }

    #[test]
    fn subtotal_sums_lines() -> TestResult {
        assert_eq!(subtotal([(450, 2), (300, 1)])?, 1200);
        assert_eq!(subtotal(std::iter::empty())?, 0);

        Ok(())
    }

    #[test]
    fn subtotal_reports_overflow() {
        assert_eq!(subtotal([(u64::MAX, 2)]), Err(PricingError::Overflow));
        assert_eq!(
            subtotal([(u64::MAX, 1), (1, 1)]),
            Err(PricingError::Overflow)
        );
    }

    #[test]
    fn totals_apply_discount_to_subtotal_only() -> TestResult {
        let totals = OrderTotals::new(800, 200, 800)?;

        assert_eq!(totals.total, 200);
        assert_eq!(totals.voucher_discount, 800);

        Ok(())
    }

    #[test]
    fn totals_reject_discount_larger_than_subtotal() {
        let result = OrderTotals::new(800, 200, 900);

        assert_eq!(
            result,
            Err(PricingError::DiscountExceedsSubtotal {
                discount: 900,
                subtotal: 800
            })
        );
    }
}
