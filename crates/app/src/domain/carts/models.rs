//! Cart Models

use jiff::Timestamp;
use platter::cart::CartTotals;
use serde::Serialize;

use crate::{
    domain::{
        catalog::models::{FoodUuid, RestaurantUuid},
        users::UserUuid,
    },
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<Cart>;

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItem>;

/// Cart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    pub uuid: CartUuid,
    pub user_uuid: UserUuid,
    pub restaurant_uuid: RestaurantUuid,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Cart Item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub uuid: CartItemUuid,
    pub cart_uuid: CartUuid,
    pub food_uuid: FoodUuid,
    pub quantity: u32,

    /// Price frozen when the line was created or last synced.
    pub unit_price: u64,

    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A cart item joined with its live catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineDetails {
    pub item: CartItem,
    pub food_name: String,
    pub current_price: u64,
    pub is_available: bool,
}

/// Customer-facing cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub uuid: Option<CartUuid>,
    pub restaurant: Option<CartRestaurant>,
    pub items: Vec<CartViewItem>,

    #[serde(flatten)]
    pub totals: CartTotals,
}

impl CartView {
    /// What a user without a cart sees.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            uuid: None,
            restaurant: None,
            items: Vec::new(),
            totals: CartTotals::empty(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartRestaurant {
    pub uuid: RestaurantUuid,
    pub name: String,
    pub minimum_order: u64,
    pub delivery_fee: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartViewItem {
    pub uuid: CartItemUuid,
    pub food_uuid: FoodUuid,
    pub name: String,
    pub quantity: u32,
    pub unit_price: u64,
    pub current_price: u64,
    pub price_changed: bool,
    pub line_total: u64,
    pub is_available: bool,
    pub notes: Option<String>,
}
