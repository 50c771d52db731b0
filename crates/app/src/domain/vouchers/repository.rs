//! Vouchers Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use platter::vouchers::VoucherTerms;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::{try_get_amount, try_get_parsed, try_get_timestamp},
    domain::vouchers::models::{Voucher, VoucherUuid},
};

const FIND_VOUCHER_BY_CODE_SQL: &str = include_str!("sql/find_voucher_by_code.sql");
const LIST_ACTIVE_VOUCHERS_SQL: &str = include_str!("sql/list_active_vouchers.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgVouchersRepository;

impl PgVouchersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn find_voucher_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<Voucher>, sqlx::Error> {
        query_as::<Postgres, Voucher>(FIND_VOUCHER_BY_CODE_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_active_vouchers(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        point_in_time: Timestamp,
    ) -> Result<Vec<Voucher>, sqlx::Error> {
        query_as::<Postgres, Voucher>(LIST_ACTIVE_VOUCHERS_SQL)
            .bind(SqlxTimestamp::from(point_in_time))
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Voucher {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let max_discount = row
            .try_get::<Option<i64>, _>("max_discount")?
            .map(u64::try_from)
            .transpose()
            .map_err(|error| sqlx::Error::ColumnDecode {
                index: "max_discount".to_string(),
                source: Box::new(error),
            })?;

        Ok(Self {
            uuid: VoucherUuid::from_uuid(row.try_get("uuid")?),
            code: row.try_get("code")?,
            description: row.try_get("description")?,
            terms: VoucherTerms {
                discount_type: try_get_parsed(row, "discount_type")?,
                value: try_get_amount(row, "discount_value")?,
                max_discount,
                min_order_value: try_get_amount(row, "min_order_value")?,
                is_active: row.try_get("is_active")?,
                expires_at: try_get_timestamp(row, "expires_at")?,
            },
            created_at: try_get_timestamp(row, "created_at")?,
        })
    }
}
