//! Cart Items Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::{
        to_db_amount, to_db_quantity, try_get_amount, try_get_quantity, try_get_timestamp,
    },
    domain::{
        carts::{
            data::NewCartItem,
            models::{CartItem, CartItemUuid, CartLineDetails, CartUuid},
        },
        catalog::models::FoodUuid,
    },
};

const GET_CART_LINES_SQL: &str = include_str!("../sql/get_cart_lines.sql");
const FIND_CART_ITEM_SQL: &str = include_str!("../sql/find_cart_item.sql");
const CREATE_CART_ITEM_SQL: &str = include_str!("../sql/create_cart_item.sql");
const UPDATE_CART_ITEM_SQL: &str = include_str!("../sql/update_cart_item.sql");
const DELETE_CART_ITEM_SQL: &str = include_str!("../sql/delete_cart_item.sql");
const DELETE_CART_ITEMS_SQL: &str = include_str!("../sql/delete_cart_items.sql");
const SYNC_CART_PRICES_SQL: &str = include_str!("../sql/sync_cart_prices.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartItemsRepository;

impl PgCartItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Lines in the order they were added, with live catalog data.
    pub(crate) async fn get_cart_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Vec<CartLineDetails>, sqlx::Error> {
        query_as::<Postgres, CartLineDetails>(GET_CART_LINES_SQL)
            .bind(cart.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn find_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        food: FoodUuid,
    ) -> Result<Option<CartItem>, sqlx::Error> {
        query_as::<Postgres, CartItem>(FIND_CART_ITEM_SQL)
            .bind(cart.into_uuid())
            .bind(food.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: NewCartItem,
    ) -> Result<CartItem, sqlx::Error> {
        query_as::<Postgres, CartItem>(CREATE_CART_ITEM_SQL)
            .bind(item.uuid.into_uuid())
            .bind(item.cart_uuid.into_uuid())
            .bind(item.food_uuid.into_uuid())
            .bind(to_db_quantity(item.quantity)?)
            .bind(to_db_amount(item.unit_price)?)
            .bind(item.notes)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: CartItemUuid,
        quantity: u32,
        notes: Option<String>,
    ) -> Result<CartItem, sqlx::Error> {
        query_as::<Postgres, CartItem>(UPDATE_CART_ITEM_SQL)
            .bind(item.into_uuid())
            .bind(to_db_quantity(quantity)?)
            .bind(notes)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        food: FoodUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_ITEM_SQL)
            .bind(cart.into_uuid())
            .bind(food.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_ITEMS_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Re-freeze every line at the food's current price. Returns the number
    /// of lines whose price moved.
    pub(crate) async fn sync_cart_prices(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SYNC_CART_PRICES_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CartItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartItemUuid::from_uuid(row.try_get("uuid")?),
            cart_uuid: CartUuid::from_uuid(row.try_get("cart_uuid")?),
            food_uuid: FoodUuid::from_uuid(row.try_get("food_uuid")?),
            quantity: try_get_quantity(row, "quantity")?,
            unit_price: try_get_amount(row, "unit_price")?,
            notes: row.try_get("notes")?,
            created_at: try_get_timestamp(row, "created_at")?,
            updated_at: try_get_timestamp(row, "updated_at")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CartLineDetails {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            item: CartItem::from_row(row)?,
            food_name: row.try_get("food_name")?,
            current_price: try_get_amount(row, "current_price")?,
            is_available: row.try_get("is_available")?,
        })
    }
}
