//! Delivery Profiles

use platter::tracking::DriverPosition;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::users::UserUuid;

const GET_PROFILE_SQL: &str = include_str!("sql/get_profile.sql");

/// A courier's availability and last reported position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliveryProfile {
    pub user_uuid: UserUuid,
    pub is_available: bool,
    pub current_latitude: Option<f64>,
    pub current_longitude: Option<f64>,
}

impl From<DeliveryProfile> for DriverPosition {
    fn from(profile: DeliveryProfile) -> Self {
        Self {
            latitude: profile.current_latitude,
            longitude: profile.current_longitude,
            is_available: profile.is_available,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgDeliveryProfilesRepository;

impl PgDeliveryProfilesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn find_profile(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<DeliveryProfile>, sqlx::Error> {
        query_as::<Postgres, DeliveryProfile>(GET_PROFILE_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for DeliveryProfile {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            is_available: row.try_get("is_available")?,
            current_latitude: row.try_get("current_latitude")?,
            current_longitude: row.try_get("current_longitude")?,
        })
    }
}
