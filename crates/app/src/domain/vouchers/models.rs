//! Voucher Models

use jiff::Timestamp;
use platter::vouchers::{DiscountType, VoucherDiscount, VoucherTerms};
use serde::Serialize;

use crate::uuids::TypedUuid;

/// Voucher UUID
pub type VoucherUuid = TypedUuid<Voucher>;

/// Voucher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voucher {
    pub uuid: VoucherUuid,
    pub code: String,
    pub description: Option<String>,
    pub terms: VoucherTerms,
    pub created_at: Timestamp,
}

/// The customer-facing part of a voucher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoucherSummary {
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: u64,
    pub max_discount: Option<u64>,
    pub min_order_value: u64,
    pub expires_at: Timestamp,
}

impl From<&Voucher> for VoucherSummary {
    fn from(voucher: &Voucher) -> Self {
        Self {
            code: voucher.code.clone(),
            description: voucher.description.clone(),
            discount_type: voucher.terms.discount_type,
            discount_value: voucher.terms.value,
            max_discount: voucher.terms.max_discount,
            min_order_value: voucher.terms.min_order_value,
            expires_at: voucher.terms.expires_at,
        }
    }
}

/// Outcome of checking a code against a subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoucherValidation {
    pub voucher: VoucherSummary,
    pub discount: u64,
    pub new_total: u64,
}

/// A voucher that applied to an order being placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AppliedVoucher {
    pub uuid: VoucherUuid,
    pub code: String,
    pub discount: u64,
}

impl AppliedVoucher {
    pub(crate) fn new(voucher: &Voucher, discount: VoucherDiscount) -> Self {
        Self {
            uuid: voucher.uuid,
            code: voucher.code.clone(),
            discount: discount.amount,
        }
    }
}
