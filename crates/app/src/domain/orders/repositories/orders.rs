//! Orders Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use platter::{pricing::OrderTotals, status::OrderStatus};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};

use crate::{
    database::{
        to_db_amount, try_get_amount, try_get_optional_timestamp, try_get_parsed,
        try_get_timestamp,
    },
    domain::{
        addresses::AddressUuid,
        catalog::models::RestaurantUuid,
        orders::{
            data::NewOrder,
            models::{Order, OrderUuid},
        },
        users::UserUuid,
    },
};

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const FIND_ORDER_SQL: &str = include_str!("../sql/find_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("../sql/lock_order.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("../sql/update_order_status.sql");
const ASSIGN_DELIVERY_PERSON_SQL: &str = include_str!("../sql/assign_delivery_person.sql");
const LIST_USER_ORDERS_SQL: &str = include_str!("../sql/list_user_orders.sql");
const COUNT_USER_ORDERS_SQL: &str = include_str!("../sql/count_user_orders.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Inserts the order row in `pending`. Items and voucher are left empty.
    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrder,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.user.into_uuid())
            .bind(order.restaurant.into_uuid())
            .bind(order.address.into_uuid())
            .bind(to_db_amount(order.totals.subtotal)?)
            .bind(to_db_amount(order.totals.delivery_fee)?)
            .bind(to_db_amount(order.totals.voucher_discount)?)
            .bind(to_db_amount(order.totals.total)?)
            .bind(order.payment_method.as_str())
            .bind(order.notes.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Option<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(FIND_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Reads the order and locks its row until the transaction ends, so
    /// concurrent writers see each other's status.
    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Option<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(LOCK_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// `changed_at` becomes `updated_at`, and the terminal stamp when
    /// `status` is delivered or cancelled.
    pub(crate) async fn update_order_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
        changed_at: Timestamp,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(UPDATE_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .bind(SqlxTimestamp::from(changed_at))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn assign_delivery_person(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        delivery_person: UserUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(ASSIGN_DELIVERY_PERSON_SQL)
            .bind(order.into_uuid())
            .bind(delivery_person.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Newest first.
    pub(crate) async fn list_user_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        status: Option<OrderStatus>,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(LIST_USER_ORDERS_SQL)
            .bind(user.into_uuid())
            .bind(status.map(OrderStatus::as_str))
            .bind(i64::from(limit))
            .bind(i64::try_from(offset).map_err(|error| sqlx::Error::Encode(Box::new(error)))?)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_user_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        status: Option<OrderStatus>,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_USER_ORDERS_SQL)
            .bind(user.into_uuid())
            .bind(status.map(OrderStatus::as_str))
            .fetch_one(&mut **tx)
            .await?;

        u64::try_from(count).map_err(|error| sqlx::Error::Decode(Box::new(error)))
    }
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            restaurant_uuid: RestaurantUuid::from_uuid(row.try_get("restaurant_uuid")?),
            delivery_address_uuid: AddressUuid::from_uuid(row.try_get("delivery_address_uuid")?),
            status: try_get_parsed(row, "status")?,
            totals: OrderTotals {
                subtotal: try_get_amount(row, "subtotal")?,
                delivery_fee: try_get_amount(row, "delivery_fee")?,
                voucher_discount: try_get_amount(row, "voucher_discount")?,
                total: try_get_amount(row, "total")?,
            },
            payment_method: try_get_parsed(row, "payment_method")?,
            notes: row.try_get("notes")?,
            delivery_person_uuid: row
                .try_get::<Option<uuid::Uuid>, _>("delivery_person_uuid")?
                .map(UserUuid::from_uuid),
            created_at: try_get_timestamp(row, "created_at")?,
            updated_at: try_get_timestamp(row, "updated_at")?,
            delivered_at: try_get_optional_timestamp(row, "delivered_at")?,
            cancelled_at: try_get_optional_timestamp(row, "cancelled_at")?,
            items: Vec::new(),
            voucher: None,
        })
    }
}
