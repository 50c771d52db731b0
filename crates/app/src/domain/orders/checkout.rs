//! Checkout
//!
//! Validation shared by the two ways of placing an order.

use platter::pricing::validate_quantity;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::domain::{
    carts::models::CartLineDetails,
    catalog::models::{Food, FoodUuid, RestaurantUuid},
    orders::{
        data::{DirectOrderItem, NewOrderItem},
        errors::OrdersServiceError,
        models::OrderItemUuid,
    },
};

/// Reject empty requests, non-positive quantities and repeated foods before
/// touching the store.
pub(super) fn validate_direct_items(items: &[DirectOrderItem]) -> Result<(), OrdersServiceError> {
    if items.is_empty() {
        return Err(OrdersServiceError::NoItems);
    }

    let mut seen = FxHashSet::default();

    for item in items {
        validate_quantity(item.quantity)?;

        if !seen.insert(item.food) {
            return Err(OrdersServiceError::DuplicateItem(item.food));
        }
    }

    Ok(())
}

/// Names of cart lines whose food can no longer be ordered.
pub(super) fn unavailable_cart_lines(lines: &[CartLineDetails]) -> Vec<String> {
    lines
        .iter()
        .filter(|line| !line.is_available)
        .map(|line| line.food_name.clone())
        .collect()
}

/// Requested foods that are unknown, belong to another restaurant or are
/// unavailable. Unknown foods are reported by id since they have no name.
pub(super) fn unorderable_items(
    items: &[DirectOrderItem],
    foods: &FxHashMap<FoodUuid, Food>,
    restaurant: RestaurantUuid,
) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| match foods.get(&item.food) {
            None => Some(item.food.to_string()),
            Some(food) if food.restaurant_uuid != restaurant || !food.is_available => {
                Some(food.name.clone())
            }
            Some(_) => None,
        })
        .collect()
}

/// Snapshot cart lines at their frozen prices.
pub(super) fn items_from_cart(lines: Vec<CartLineDetails>) -> Vec<NewOrderItem> {
    lines
        .into_iter()
        .map(|line| NewOrderItem {
            uuid: OrderItemUuid::new(),
            food_uuid: line.item.food_uuid,
            name: line.food_name,
            unit_price: line.item.unit_price,
            quantity: line.item.quantity,
            notes: line.item.notes,
        })
        .collect()
}

/// Snapshot requested foods at their current catalog prices. Every item must
/// already have passed [`unorderable_items`].
pub(super) fn items_from_catalog(
    items: Vec<DirectOrderItem>,
    foods: &FxHashMap<FoodUuid, Food>,
) -> Result<Vec<NewOrderItem>, OrdersServiceError> {
    items
        .into_iter()
        .map(|item| {
            let food = foods
                .get(&item.food)
                .ok_or_else(|| OrdersServiceError::ItemsUnavailable(vec![item.food.to_string()]))?;

            Ok(NewOrderItem {
                uuid: OrderItemUuid::new(),
                food_uuid: food.uuid,
                name: food.name.clone(),
                unit_price: food.price,
                quantity: validate_quantity(item.quantity)?,
                notes: item.notes,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use platter::{errors::ErrorKind, pricing::PricingError};

    use super::*;

    fn item(food: FoodUuid, quantity: i64) -> DirectOrderItem {
        DirectOrderItem {
            food,
            quantity,
            notes: None,
        }
    }

    fn food(restaurant: RestaurantUuid, name: &str, is_available: bool) -> Food {
        Food {
            uuid: FoodUuid::new(),
            restaurant_uuid: restaurant,
            name: name.to_string(),
            price: 1000,
            is_available,
        }
    }

    #[test]
    fn empty_requests_have_no_items() {
        let result = validate_direct_items(&[]);

        assert!(
            matches!(result, Err(OrdersServiceError::NoItems)),
            "expected NoItems, got {result:?}"
        );
    }

    #[test]
    fn repeated_foods_are_rejected() {
        let food = FoodUuid::new();

        let result = validate_direct_items(&[item(food, 1), item(FoodUuid::new(), 2), item(food, 3)]);

        assert!(
            matches!(result, Err(OrdersServiceError::DuplicateItem(duplicate)) if duplicate == food),
            "expected DuplicateItem, got {result:?}"
        );
    }

    #[test]
    fn zero_quantities_are_rejected() {
        let result = validate_direct_items(&[item(FoodUuid::new(), 0)]);

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::Pricing(PricingError::InvalidQuantity(0)))
            ),
            "expected InvalidQuantity, got {result:?}"
        );
    }

    #[test]
    fn quantities_beyond_the_column_limit_are_invalid_input() {
        let too_many = i64::from(i32::MAX) + 1;

        let result = validate_direct_items(&[item(FoodUuid::new(), too_many)]);

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::Pricing(PricingError::QuantityTooLarge(q))) if q == too_many
            ),
            "expected QuantityTooLarge, got {result:?}"
        );
        assert!(matches!(result, Err(ref error) if error.kind() == ErrorKind::InvalidInput));
    }

    #[test]
    fn unknown_foreign_and_unavailable_foods_are_all_reported() {
        let restaurant = RestaurantUuid::new();
        let ok = food(restaurant, "Soto", true);
        let off = food(restaurant, "Rendang", false);
        let foreign = food(RestaurantUuid::new(), "Pizza", true);
        let unknown = FoodUuid::new();

        let requested = vec![
            item(ok.uuid, 1),
            item(off.uuid, 1),
            item(foreign.uuid, 1),
            item(unknown, 1),
        ];

        let foods: FxHashMap<FoodUuid, Food> = [ok, off, foreign]
            .into_iter()
            .map(|food| (food.uuid, food))
            .collect();

        let missing = unorderable_items(&requested, &foods, restaurant);

        assert_eq!(
            missing,
            vec!["Rendang".to_string(), "Pizza".to_string(), unknown.to_string()]
        );
    }
}
