//! Catalog Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::{
    database::{try_get_amount, try_get_amount_or_zero},
    domain::catalog::models::{Food, FoodUuid, Restaurant, RestaurantUuid},
};

const GET_RESTAURANT_SQL: &str = include_str!("sql/get_restaurant.sql");
const GET_FOOD_SQL: &str = include_str!("sql/get_food.sql");
const GET_FOODS_SQL: &str = include_str!("sql/get_foods.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogRepository;

impl PgCatalogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Fails with [`sqlx::Error::RowNotFound`] for unknown restaurants.
    pub(crate) async fn get_restaurant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        restaurant: RestaurantUuid,
    ) -> Result<Restaurant, sqlx::Error> {
        query_as::<Postgres, Restaurant>(GET_RESTAURANT_SQL)
            .bind(restaurant.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_food(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        food: FoodUuid,
    ) -> Result<Option<Food>, sqlx::Error> {
        query_as::<Postgres, Food>(GET_FOOD_SQL)
            .bind(food.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Foods matching `foods`, in no particular relation to the input order.
    /// Unknown identifiers are simply absent from the result.
    pub(crate) async fn get_foods(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        foods: &[FoodUuid],
    ) -> Result<Vec<Food>, sqlx::Error> {
        let uuids: Vec<Uuid> = foods.iter().map(|food| food.into_uuid()).collect();

        query_as::<Postgres, Food>(GET_FOODS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Restaurant {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: RestaurantUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            minimum_order: try_get_amount_or_zero(row, "minimum_order")?,
            delivery_fee: try_get_amount_or_zero(row, "delivery_fee")?,
            is_active: row.try_get("is_active")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Food {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: FoodUuid::from_uuid(row.try_get("uuid")?),
            restaurant_uuid: RestaurantUuid::from_uuid(row.try_get("restaurant_uuid")?),
            name: row.try_get("name")?,
            price: try_get_amount(row, "price")?,
            is_available: row.try_get("is_available")?,
        })
    }
}
