//! Cart Data

use crate::domain::{
    carts::models::{CartItemUuid, CartUuid},
    catalog::models::FoodUuid,
};

/// Add a food to the caller's cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddCartItem {
    pub food: FoodUuid,
    pub quantity: i64,
    pub notes: Option<String>,
}

/// Change the quantity of a line. Zero or less removes it; `None` notes keep
/// the current ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCartItem {
    pub food: FoodUuid,
    pub quantity: i64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NewCartItem {
    pub uuid: CartItemUuid,
    pub cart_uuid: CartUuid,
    pub food_uuid: FoodUuid,
    pub quantity: u32,
    pub unit_price: u64,
    pub notes: Option<String>,
}
