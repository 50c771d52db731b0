//! Addresses
//!
//! Delivery addresses belong to the customer's address book.

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{domain::users::UserUuid, uuids::TypedUuid};

const GET_OWNED_ADDRESS_SQL: &str = include_str!("sql/get_owned_address.sql");

/// Address UUID
pub type AddressUuid = TypedUuid<Address>;

/// Address
#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub uuid: AddressUuid,
    pub user_uuid: UserUuid,
    pub label: Option<String>,
    pub street: String,
    pub city: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAddressesRepository;

impl PgAddressesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// The address, provided `owner` owns it.
    pub(crate) async fn find_owned_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        address: AddressUuid,
        owner: UserUuid,
    ) -> Result<Option<Address>, sqlx::Error> {
        query_as::<Postgres, Address>(GET_OWNED_ADDRESS_SQL)
            .bind(address.into_uuid())
            .bind(owner.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Address {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: AddressUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            label: row.try_get("label")?,
            street: row.try_get("street")?,
            city: row.try_get("city")?,
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
        })
    }
}
