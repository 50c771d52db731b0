//! Vouchers
//!
//! Discount evaluation for voucher codes. Evaluation never mutates a voucher: there
//! are no usage counters, so the same code may be redeemed any number of times.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::Serialize;
use thiserror::Error;

use crate::{errors::ErrorKind, pricing::PricingError};

/// Errors raised when a voucher cannot be applied.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VoucherError {
    /// No voucher exists with the supplied code.
    #[error("voucher code is not valid")]
    UnknownCode,

    /// The voucher has been switched off.
    #[error("voucher is no longer active")]
    Inactive,

    /// The voucher expired before the evaluation instant.
    #[error("voucher expired at {expired_at}")]
    Expired {
        /// Expiry instant of the voucher.
        expired_at: Timestamp,
    },

    /// The order subtotal does not reach the voucher threshold.
    #[error("voucher requires a minimum order of {minimum}, subtotal is {subtotal}")]
    BelowMinimumOrder {
        /// Voucher minimum order value.
        minimum: u64,

        /// Subtotal the voucher was evaluated against.
        subtotal: u64,
    },

    /// The discount could not be computed exactly.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

impl VoucherError {
    /// Error category.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownCode => ErrorKind::NotFound,
            Self::Inactive | Self::Expired { .. } => ErrorKind::Unavailable,
            Self::BelowMinimumOrder { .. } => ErrorKind::PolicyViolation,
            Self::Pricing(error) => error.kind(),
        }
    }
}

/// How a voucher value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// `value` is a percentage of the subtotal.
    Percentage,

    /// `value` is an absolute amount.
    Fixed,
}

impl DiscountType {
    /// Stable identifier, as stored.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
        }
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised discount type identifier.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown discount type `{0}`")]
pub struct UnknownDiscountType(pub String);

impl FromStr for DiscountType {
    type Err = UnknownDiscountType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(Self::Percentage),
            "fixed" => Ok(Self::Fixed),
            other => Err(UnknownDiscountType(other.to_string())),
        }
    }
}

/// The evaluable part of a voucher definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoucherTerms {
    /// Discount type.
    pub discount_type: DiscountType,

    /// Percentage (for [`DiscountType::Percentage`]) or amount (for [`DiscountType::Fixed`]).
    pub value: u64,

    /// Optional cap on the computed discount.
    pub max_discount: Option<u64>,

    /// Subtotal floor below which the voucher does not apply.
    pub min_order_value: u64,

    /// Whether the voucher is switched on.
    pub is_active: bool,

    /// Last instant at which the voucher is still valid.
    pub expires_at: Timestamp,
}

/// Outcome of a successful evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoucherDiscount {
    /// Discount amount, never larger than the subtotal.
    pub amount: u64,

    /// Subtotal after the discount.
    pub discounted_subtotal: u64,
}

/// Evaluate a voucher against a delivery-fee-exclusive subtotal.
///
/// Percentage discounts are rounded half away from zero to whole units and capped at
/// `max_discount`. Every discount is additionally capped at the subtotal.
///
/// # Errors
///
/// - [`VoucherError::Inactive`] if the voucher is switched off.
/// - [`VoucherError::Expired`] if `now` is past `expires_at`.
/// - [`VoucherError::BelowMinimumOrder`] if `subtotal < min_order_value`.
/// - [`VoucherError::Pricing`] if the percentage cannot be computed exactly.
pub fn evaluate(
    terms: &VoucherTerms,
    subtotal: u64,
    now: Timestamp,
) -> Result<VoucherDiscount, VoucherError> {
    if !terms.is_active {
        return Err(VoucherError::Inactive);
    }

    if terms.expires_at < now {
        return Err(VoucherError::Expired {
            expired_at: terms.expires_at,
        });
    }

    if subtotal < terms.min_order_value {
        return Err(VoucherError::BelowMinimumOrder {
            minimum: terms.min_order_value,
            subtotal,
        });
    }

    let raw = match terms.discount_type {
        DiscountType::Percentage => {
            let discount = percent_of(subtotal, terms.value)?;

            terms
                .max_discount
                .map_or(discount, |cap| discount.min(cap))
        }
        DiscountType::Fixed => terms.value,
    };

    let amount = raw.min(subtotal);

    Ok(VoucherDiscount {
        amount,
        discounted_subtotal: subtotal - amount,
    })
}

/// `amount * percent / 100`, rounded half away from zero.
fn percent_of(amount: u64, percent: u64) -> Result<u64, PricingError> {
    Decimal::from(amount)
        .checked_mul(Decimal::from(percent))
        .and_then(|applied| applied.checked_div(Decimal::ONE_HUNDRED))
        .ok_or(PricingError::Overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or(PricingError::Overflow)
}
