//! Order Vouchers Repository

use sqlx::{Postgres, Row, Transaction, postgres::PgRow, query};
use uuid::Uuid;

use crate::{
    database::{to_db_amount, try_get_amount},
    domain::{
        orders::models::{OrderUuid, OrderVoucher},
        vouchers::models::{AppliedVoucher, VoucherUuid},
    },
};

const LINK_VOUCHER_SQL: &str = include_str!("../sql/link_voucher.sql");
const GET_ORDER_VOUCHERS_SQL: &str = include_str!("../sql/get_order_vouchers.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderVouchersRepository;

impl PgOrderVouchersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn link_voucher(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        voucher: &AppliedVoucher,
    ) -> Result<OrderVoucher, sqlx::Error> {
        let row = query(LINK_VOUCHER_SQL)
            .bind(order.into_uuid())
            .bind(voucher.uuid.into_uuid())
            .bind(&voucher.code)
            .bind(to_db_amount(voucher.discount)?)
            .fetch_one(&mut **tx)
            .await?;

        Ok(order_voucher_from_row(&row)?.1)
    }

    pub(crate) async fn get_order_vouchers(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[OrderUuid],
    ) -> Result<Vec<(OrderUuid, OrderVoucher)>, sqlx::Error> {
        let uuids: Vec<Uuid> = orders.iter().map(|order| order.into_uuid()).collect();

        query(GET_ORDER_VOUCHERS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await?
            .iter()
            .map(order_voucher_from_row)
            .collect()
    }
}

fn order_voucher_from_row(row: &PgRow) -> sqlx::Result<(OrderUuid, OrderVoucher)> {
    Ok((
        OrderUuid::from_uuid(row.try_get("order_uuid")?),
        OrderVoucher {
            voucher_uuid: VoucherUuid::from_uuid(row.try_get("voucher_uuid")?),
            code: row.try_get("code")?,
            discount_applied: try_get_amount(row, "discount_applied")?,
        },
    ))
}
