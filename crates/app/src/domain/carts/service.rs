//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use platter::{
    cart::{CartLine, merged_notes, summarize},
    pricing::{PricingError, add_quantity, line_total, validate_quantity},
};
use sqlx::{Postgres, Transaction};
use tracing::{Span, debug, info, warn};

use crate::{
    database::Db,
    domain::{
        carts::{
            data::{AddCartItem, NewCartItem, UpdateCartItem},
            errors::CartsServiceError,
            models::{Cart, CartItemUuid, CartRestaurant, CartUuid, CartView, CartViewItem},
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        catalog::{
            PgCatalogRepository,
            models::{FoodUuid, RestaurantUuid},
        },
        users::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts: PgCartsRepository,
    items: PgCartItemsRepository,
    catalog: PgCatalogRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts: PgCartsRepository::new(),
            items: PgCartItemsRepository::new(),
            catalog: PgCatalogRepository::new(),
        }
    }

    async fn load_view(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<CartView, CartsServiceError> {
        let Some(cart) = self.carts.find_cart_for_user(tx, user).await? else {
            return Ok(CartView::empty());
        };

        let restaurant = self.catalog.get_restaurant(tx, cart.restaurant_uuid).await?;
        let lines = self.items.get_cart_lines(tx, cart.uuid).await?;

        let summary_lines: Vec<CartLine> = lines
            .iter()
            .map(|line| CartLine {
                unit_price: line.item.unit_price,
                quantity: line.item.quantity,
                is_available: line.is_available,
            })
            .collect();

        let totals = summarize(
            &summary_lines,
            restaurant.delivery_fee,
            restaurant.minimum_order,
        )?;

        let items = lines
            .into_iter()
            .map(|line| {
                Ok(CartViewItem {
                    uuid: line.item.uuid,
                    food_uuid: line.item.food_uuid,
                    name: line.food_name,
                    quantity: line.item.quantity,
                    unit_price: line.item.unit_price,
                    current_price: line.current_price,
                    price_changed: line.item.unit_price != line.current_price,
                    line_total: line_total(line.item.unit_price, line.item.quantity)?,
                    is_available: line.is_available,
                    notes: line.item.notes,
                })
            })
            .collect::<Result<Vec<_>, PricingError>>()?;

        Ok(CartView {
            uuid: Some(cart.uuid),
            restaurant: Some(CartRestaurant {
                uuid: restaurant.uuid,
                name: restaurant.name,
                minimum_order: restaurant.minimum_order,
                delivery_fee: restaurant.delivery_fee,
            }),
            items,
            totals,
        })
    }

    /// Locks the user's cart, creating it for `restaurant` when missing.
    ///
    /// A concurrent first add makes our insert a no-op, in which case the
    /// winner's row is locked instead.
    async fn lock_or_create_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        restaurant: RestaurantUuid,
    ) -> Result<Cart, CartsServiceError> {
        loop {
            if let Some(cart) = self.carts.lock_cart_for_user(tx, user).await? {
                return Ok(cart);
            }

            if let Some(cart) = self
                .carts
                .create_cart(tx, CartUuid::new(), user, restaurant)
                .await?
            {
                return Ok(cart);
            }

            debug!(user_uuid = %user, "cart created concurrently, locking it");
        }
    }

    /// A cart row never outlives its last item. Called after every removal.
    async fn enforce_non_empty_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: &Cart,
    ) -> Result<(), CartsServiceError> {
        if self.carts.delete_cart_if_empty(tx, cart.uuid).await? > 0 {
            debug!(cart_uuid = %cart.uuid, "deleted empty cart");
        }

        Ok(())
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    #[tracing::instrument(name = "carts.service.view_cart", skip(self), fields(user_uuid = %user), err)]
    async fn view_cart(&self, user: UserUuid) -> Result<CartView, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let view = self.load_view(&mut tx, user).await?;

        tx.commit().await?;

        Ok(view)
    }

    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, item),
        fields(
            user_uuid = %user,
            food_uuid = %item.food,
            quantity = item.quantity,
            cart_uuid = tracing::field::Empty
        ),
        err
    )]
    async fn add_item(
        &self,
        user: UserUuid,
        item: AddCartItem,
    ) -> Result<CartView, CartsServiceError> {
        let quantity = validate_quantity(item.quantity)?;

        let mut tx = self.db.begin().await?;

        let food = self
            .catalog
            .find_food(&mut tx, item.food)
            .await?
            .ok_or(CartsServiceError::FoodNotFound)?;

        if !food.is_available {
            warn!(food_uuid = %food.uuid, "rejected unavailable food");

            return Err(CartsServiceError::FoodUnavailable { name: food.name });
        }

        let cart = self
            .lock_or_create_cart(&mut tx, user, food.restaurant_uuid)
            .await?;

        if cart.restaurant_uuid != food.restaurant_uuid {
            warn!(
                cart_restaurant_uuid = %cart.restaurant_uuid,
                food_restaurant_uuid = %food.restaurant_uuid,
                "rejected food from another restaurant"
            );

            return Err(CartsServiceError::MixedRestaurant);
        }

        Span::current().record("cart_uuid", tracing::field::display(cart.uuid));

        match self.items.find_cart_item(&mut tx, cart.uuid, food.uuid).await? {
            Some(existing) => {
                let quantity = add_quantity(existing.quantity, quantity)?;

                let notes = merged_notes(existing.notes, item.notes);

                self.items
                    .update_cart_item(&mut tx, existing.uuid, quantity, notes)
                    .await?;
            }
            None => {
                self.items
                    .create_cart_item(
                        &mut tx,
                        NewCartItem {
                            uuid: CartItemUuid::new(),
                            cart_uuid: cart.uuid,
                            food_uuid: food.uuid,
                            quantity,
                            unit_price: food.price,
                            notes: merged_notes(None, item.notes),
                        },
                    )
                    .await?;
            }
        }

        self.carts.touch_cart(&mut tx, cart.uuid).await?;

        let view = self.load_view(&mut tx, user).await?;

        tx.commit().await?;

        info!(cart_uuid = %cart.uuid, food_uuid = %food.uuid, "added item to cart");

        Ok(view)
    }

    #[tracing::instrument(
        name = "carts.service.update_item",
        skip(self, item),
        fields(user_uuid = %user, food_uuid = %item.food, quantity = item.quantity),
        err
    )]
    async fn update_item(
        &self,
        user: UserUuid,
        item: UpdateCartItem,
    ) -> Result<CartView, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self
            .carts
            .lock_cart_for_user(&mut tx, user)
            .await?
            .ok_or(CartsServiceError::ItemNotFound)?;

        let existing = self
            .items
            .find_cart_item(&mut tx, cart.uuid, item.food)
            .await?
            .ok_or(CartsServiceError::ItemNotFound)?;

        if item.quantity <= 0 {
            self.items
                .delete_cart_item(&mut tx, cart.uuid, item.food)
                .await?;

            self.enforce_non_empty_cart(&mut tx, &cart).await?;
        } else {
            let quantity = validate_quantity(item.quantity)?;
            let notes = item.notes.or(existing.notes);

            self.items
                .update_cart_item(&mut tx, existing.uuid, quantity, notes)
                .await?;

            self.carts.touch_cart(&mut tx, cart.uuid).await?;
        }

        let view = self.load_view(&mut tx, user).await?;

        tx.commit().await?;

        info!(cart_uuid = %cart.uuid, "updated cart item");

        Ok(view)
    }

    #[tracing::instrument(
        name = "carts.service.remove_item",
        skip(self),
        fields(user_uuid = %user, food_uuid = %food),
        err
    )]
    async fn remove_item(
        &self,
        user: UserUuid,
        food: FoodUuid,
    ) -> Result<CartView, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self
            .carts
            .lock_cart_for_user(&mut tx, user)
            .await?
            .ok_or(CartsServiceError::ItemNotFound)?;

        let rows_affected = self.items.delete_cart_item(&mut tx, cart.uuid, food).await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::ItemNotFound);
        }

        self.enforce_non_empty_cart(&mut tx, &cart).await?;

        let view = self.load_view(&mut tx, user).await?;

        tx.commit().await?;

        info!(cart_uuid = %cart.uuid, "removed cart item");

        Ok(view)
    }

    #[tracing::instrument(name = "carts.service.clear_cart", skip(self), fields(user_uuid = %user), err)]
    async fn clear_cart(&self, user: UserUuid) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        if let Some(cart) = self.carts.lock_cart_for_user(&mut tx, user).await? {
            self.items.delete_cart_items(&mut tx, cart.uuid).await?;
            self.carts.delete_cart(&mut tx, cart.uuid).await?;

            info!(cart_uuid = %cart.uuid, "cleared cart");
        }

        tx.commit().await?;

        Ok(())
    }

    #[tracing::instrument(
        name = "carts.service.sync_prices",
        skip(self),
        fields(user_uuid = %user, repriced_items = tracing::field::Empty),
        err
    )]
    async fn sync_prices(&self, user: UserUuid) -> Result<CartView, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        if let Some(cart) = self.carts.lock_cart_for_user(&mut tx, user).await? {
            let repriced = self.items.sync_cart_prices(&mut tx, cart.uuid).await?;

            Span::current().record("repriced_items", repriced);

            if repriced > 0 {
                self.carts.touch_cart(&mut tx, cart.uuid).await?;
            }
        }

        let view = self.load_view(&mut tx, user).await?;

        tx.commit().await?;

        Ok(view)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// The caller's cart, or an empty view when there is none.
    async fn view_cart(&self, user: UserUuid) -> Result<CartView, CartsServiceError>;

    /// Add a food, creating the cart on first use. Adding a food already in
    /// the cart sums the quantities and keeps the frozen price.
    async fn add_item(&self, user: UserUuid, item: AddCartItem)
    -> Result<CartView, CartsServiceError>;

    /// Set the quantity of a line; zero removes it.
    async fn update_item(
        &self,
        user: UserUuid,
        item: UpdateCartItem,
    ) -> Result<CartView, CartsServiceError>;

    /// Remove a line, dropping the cart once it is empty.
    async fn remove_item(&self, user: UserUuid, food: FoodUuid)
    -> Result<CartView, CartsServiceError>;

    /// Remove every line and the cart itself. Succeeds when there is no cart.
    async fn clear_cart(&self, user: UserUuid) -> Result<(), CartsServiceError>;

    /// Re-freeze every line at the current catalog price.
    async fn sync_prices(&self, user: UserUuid) -> Result<CartView, CartsServiceError>;
}
