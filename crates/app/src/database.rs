//! Database connection management

use std::str::FromStr;

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{
    PgPool, Postgres, Row, Transaction,
    migrate::MigrateError,
    postgres::{PgPoolOptions, PgRow},
};

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction. Every service operation runs inside exactly one.
    ///
    /// # Errors
    ///
    /// Returns an error when no connection can be acquired.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Apply pending schema migrations.
///
/// # Errors
///
/// Returns an error if a migration fails or the recorded history diverges.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// Read a non-negative `BIGINT` money column.
pub(crate) fn try_get_amount(row: &PgRow, column: &str) -> sqlx::Result<u64> {
    let value = row.try_get::<i64, _>(column)?;

    u64::try_from(value).map_err(|error| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(error),
    })
}

/// Read a nullable money column, treating `NULL` as zero.
pub(crate) fn try_get_amount_or_zero(row: &PgRow, column: &str) -> sqlx::Result<u64> {
    match row.try_get::<Option<i64>, _>(column)? {
        Some(value) => u64::try_from(value).map_err(|error| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(error),
        }),
        None => Ok(0),
    }
}

/// Read an `INTEGER` quantity column.
pub(crate) fn try_get_quantity(row: &PgRow, column: &str) -> sqlx::Result<u32> {
    let value = row.try_get::<i32, _>(column)?;

    u32::try_from(value).map_err(|error| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(error),
    })
}

/// Read a text column holding an enum identifier.
pub(crate) fn try_get_parsed<T>(row: &PgRow, column: &str) -> sqlx::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    row.try_get::<String, _>(column)?
        .parse()
        .map_err(|error: T::Err| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(error),
        })
}

pub(crate) fn try_get_timestamp(row: &PgRow, column: &str) -> sqlx::Result<Timestamp> {
    Ok(row.try_get::<SqlxTimestamp, _>(column)?.to_jiff())
}

pub(crate) fn try_get_optional_timestamp(
    row: &PgRow,
    column: &str,
) -> sqlx::Result<Option<Timestamp>> {
    Ok(row
        .try_get::<Option<SqlxTimestamp>, _>(column)?
        .map(SqlxTimestamp::to_jiff))
}

/// Convert an amount for binding into a `BIGINT` column.
pub(crate) fn to_db_amount(amount: u64) -> sqlx::Result<i64> {
    i64::try_from(amount).map_err(|error| sqlx::Error::Encode(Box::new(error)))
}

/// Convert a quantity for binding into an `INTEGER` column.
pub(crate) fn to_db_quantity(quantity: u32) -> sqlx::Result<i32> {
    i32::try_from(quantity).map_err(|error| sqlx::Error::Encode(Box::new(error)))
}
