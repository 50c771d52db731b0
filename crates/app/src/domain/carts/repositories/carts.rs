//! Carts Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::try_get_timestamp,
    domain::{
        carts::models::{Cart, CartUuid},
        catalog::models::RestaurantUuid,
        users::UserUuid,
    },
};

const FIND_CART_BY_USER_SQL: &str = include_str!("../sql/find_cart_by_user.sql");
const LOCK_CART_BY_USER_SQL: &str = include_str!("../sql/lock_cart_by_user.sql");
const CREATE_CART_SQL: &str = include_str!("../sql/create_cart.sql");
const TOUCH_CART_SQL: &str = include_str!("../sql/touch_cart.sql");
const DELETE_CART_SQL: &str = include_str!("../sql/delete_cart.sql");
const DELETE_CART_IF_EMPTY_SQL: &str = include_str!("../sql/delete_cart_if_empty.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn find_cart_for_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<Cart>, sqlx::Error> {
        query_as::<Postgres, Cart>(FIND_CART_BY_USER_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Like [`Self::find_cart_for_user`], holding the row lock until the
    /// transaction ends.
    pub(crate) async fn lock_cart_for_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<Cart>, sqlx::Error> {
        query_as::<Postgres, Cart>(LOCK_CART_BY_USER_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Returns `None` when the user already has a cart, including one
    /// committed by a concurrent transaction while this insert waited.
    pub(crate) async fn create_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: CartUuid,
        user: UserUuid,
        restaurant: RestaurantUuid,
    ) -> Result<Option<Cart>, sqlx::Error> {
        query_as::<Postgres, Cart>(CREATE_CART_SQL)
            .bind(uuid.into_uuid())
            .bind(user.into_uuid())
            .bind(restaurant.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn touch_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<(), sqlx::Error> {
        query(TOUCH_CART_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn delete_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Deletes the cart only when no items reference it.
    pub(crate) async fn delete_cart_if_empty(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_IF_EMPTY_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for Cart {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            restaurant_uuid: RestaurantUuid::from_uuid(row.try_get("restaurant_uuid")?),
            created_at: try_get_timestamp(row, "created_at")?,
            updated_at: try_get_timestamp(row, "updated_at")?,
        })
    }
}
