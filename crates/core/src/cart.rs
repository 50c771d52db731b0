//! Cart
//!
//! Summary arithmetic for a single-restaurant cart whose lines carry frozen prices.

use serde::Serialize;

use crate::pricing::{PricingError, line_total};

/// A cart line as needed for summarising.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    /// Price frozen when the food was added.
    pub unit_price: u64,

    /// Quantity, at least one.
    pub quantity: u32,

    /// Whether the food can currently be ordered.
    pub is_available: bool,
}

/// Cart amounts shown to the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartTotals {
    /// Sum over available lines only.
    pub subtotal: u64,

    /// Restaurant delivery fee.
    pub delivery_fee: u64,

    /// `subtotal + delivery_fee`
    pub total: u64,

    /// Sum of quantities over every line.
    pub items_count: u64,

    /// Number of lines whose food is unavailable.
    pub unavailable_items: usize,

    /// Restaurant minimum order.
    pub minimum_order: u64,

    /// `subtotal >= minimum_order`, and false for an empty cart.
    pub meets_minimum: bool,
}

impl CartTotals {
    /// Totals for a cart that does not exist.
    pub const fn empty() -> Self {
        Self {
            subtotal: 0,
            delivery_fee: 0,
            total: 0,
            items_count: 0,
            unavailable_items: 0,
            minimum_order: 0,
            meets_minimum: false,
        }
    }
}

/// Summarise cart lines.
///
/// Unavailable lines are counted but never priced.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if an amount does not fit in a `u64`.
pub fn summarize(
    lines: &[CartLine],
    delivery_fee: u64,
    minimum_order: u64,
) -> Result<CartTotals, PricingError> {
    if lines.is_empty() {
        return Ok(CartTotals::empty());
    }

    let mut subtotal = 0_u64;
    let mut items_count = 0_u64;
    let mut unavailable_items = 0;

    for line in lines {
        items_count += u64::from(line.quantity);

        if line.is_available {
            subtotal = subtotal
                .checked_add(line_total(line.unit_price, line.quantity)?)
                .ok_or(PricingError::Overflow)?;
        } else {
            unavailable_items += 1;
        }
    }

    let total = subtotal
        .checked_add(delivery_fee)
        .ok_or(PricingError::Overflow)?;

    Ok(CartTotals {
        subtotal,
        delivery_fee,
        total,
        items_count,
        unavailable_items,
        minimum_order,
        meets_minimum: subtotal >= minimum_order,
    })
}

/// Notes kept on a line after the same food is added again.
///
/// Non-empty new notes replace the old ones; anything else keeps them.
pub fn merged_notes(existing: Option<String>, incoming: Option<String>) -> Option<String> {
    match incoming {
        Some(notes) if !notes.trim().is_empty() => Some(notes),
        _ => existing,
    }
}
