//! Catalog Models

use crate::uuids::TypedUuid;

/// Restaurant UUID
pub type RestaurantUuid = TypedUuid<Restaurant>;

/// Food UUID
pub type FoodUuid = TypedUuid<Food>;

/// Restaurant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restaurant {
    pub uuid: RestaurantUuid,
    pub name: String,

    /// Minimum pre-discount subtotal, zero when unset.
    pub minimum_order: u64,

    /// Flat delivery fee, zero when unset.
    pub delivery_fee: u64,

    pub is_active: bool,
}

/// Food
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Food {
    pub uuid: FoodUuid,
    pub restaurant_uuid: RestaurantUuid,
    pub name: String,
    pub price: u64,
    pub is_available: bool,
}
