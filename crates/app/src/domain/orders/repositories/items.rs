//! Order Items Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::{
    database::{to_db_amount, to_db_quantity, try_get_amount, try_get_quantity},
    domain::{
        catalog::models::FoodUuid,
        orders::{
            data::NewOrderItem,
            models::{OrderItem, OrderItemUuid, OrderUuid},
        },
    },
};

const CREATE_ORDER_ITEM_SQL: &str = include_str!("../sql/create_order_item.sql");
const GET_ORDER_ITEMS_SQL: &str = include_str!("../sql/get_order_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderItemsRepository;

impl PgOrderItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        items: &[NewOrderItem],
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        let mut created = Vec::with_capacity(items.len());

        for item in items {
            let row = query_as::<Postgres, OrderItem>(CREATE_ORDER_ITEM_SQL)
                .bind(item.uuid.into_uuid())
                .bind(order.into_uuid())
                .bind(item.food_uuid.into_uuid())
                .bind(&item.name)
                .bind(to_db_amount(item.unit_price)?)
                .bind(to_db_quantity(item.quantity)?)
                .bind(item.notes.as_deref())
                .fetch_one(&mut **tx)
                .await?;

            created.push(row);
        }

        Ok(created)
    }

    /// Items of every order in `orders`, in insertion order.
    pub(crate) async fn get_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[OrderUuid],
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        let uuids: Vec<Uuid> = orders.iter().map(|order| order.into_uuid()).collect();

        query_as::<Postgres, OrderItem>(GET_ORDER_ITEMS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            food_uuid: FoodUuid::from_uuid(row.try_get("food_uuid")?),
            name: row.try_get("name")?,
            unit_price: try_get_amount(row, "unit_price")?,
            quantity: try_get_quantity(row, "quantity")?,
            notes: row.try_get("notes")?,
        })
    }
}
