//! Status Logs Repository
//!
//! Rows are only ever inserted; the schema rejects updates and deletes.

use platter::status::OrderStatus;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::{try_get_parsed, try_get_timestamp},
    domain::{
        orders::{
            data::NewStatusLogEntry,
            models::{OrderUuid, StatusLogEntry, StatusLogUuid},
        },
        users::UserUuid,
    },
};

const APPEND_STATUS_LOG_SQL: &str = include_str!("../sql/append_status_log.sql");
const GET_STATUS_LOGS_SQL: &str = include_str!("../sql/get_status_logs.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgStatusLogsRepository;

impl PgStatusLogsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn append_status_log(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        entry: NewStatusLogEntry,
    ) -> Result<StatusLogEntry, sqlx::Error> {
        query_as::<Postgres, StatusLogEntry>(APPEND_STATUS_LOG_SQL)
            .bind(StatusLogUuid::new().into_uuid())
            .bind(entry.order.into_uuid())
            .bind(entry.event.as_str())
            .bind(entry.from_status.map(OrderStatus::as_str))
            .bind(entry.to_status.as_str())
            .bind(entry.changed_by.into_uuid())
            .bind(entry.notes)
            .fetch_one(&mut **tx)
            .await
    }

    /// Oldest first.
    pub(crate) async fn get_status_logs(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<StatusLogEntry>, sqlx::Error> {
        query_as::<Postgres, StatusLogEntry>(GET_STATUS_LOGS_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for StatusLogEntry {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let from_status = row
            .try_get::<Option<String>, _>("from_status")?
            .map(|status| status.parse::<OrderStatus>())
            .transpose()
            .map_err(|error| sqlx::Error::ColumnDecode {
                index: "from_status".to_string(),
                source: Box::new(error),
            })?;

        Ok(Self {
            uuid: StatusLogUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            event: try_get_parsed(row, "event")?,
            from_status,
            to_status: try_get_parsed(row, "to_status")?,
            changed_by: UserUuid::from_uuid(row.try_get("changed_by")?),
            notes: row.try_get("notes")?,
            changed_at: try_get_timestamp(row, "changed_at")?,
        })
    }
}
