//! Platter prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{CartLine, CartTotals, merged_notes, summarize},
    errors::ErrorKind,
    pricing::{
        MAX_QUANTITY, OrderTotals, PricingError, add_quantity, line_total, subtotal,
        validate_quantity,
    },
    status::{OrderStatus, TransitionError},
    tracking::{
        DriverLocation, DriverPosition, StatusStamp, TimelineStep, TrackingInput,
        TrackingProjection, project,
    },
    vouchers::{DiscountType, VoucherDiscount, VoucherError, VoucherTerms, evaluate},
};
