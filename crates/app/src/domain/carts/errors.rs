//! Carts service errors.

use platter::{errors::ErrorKind, pricing::PricingError};
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind as DbErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("food not found")]
    FoodNotFound,

    #[error("{name} is currently unavailable")]
    FoodUnavailable { name: String },

    #[error("cart holds items from another restaurant; clear it first")]
    MixedRestaurant,

    #[error("item not found in cart")]
    ItemNotFound,

    #[error("cart already exists")]
    AlreadyExists,

    #[error("not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl CartsServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Pricing(error) => error.kind(),
            Self::FoodNotFound | Self::ItemNotFound | Self::NotFound | Self::InvalidReference => {
                ErrorKind::NotFound
            }
            Self::FoodUnavailable { .. } => ErrorKind::Unavailable,
            Self::MixedRestaurant | Self::AlreadyExists => ErrorKind::Conflict,
            Self::MissingRequiredData | Self::InvalidData => ErrorKind::InvalidInput,
            Self::Sql(_) => ErrorKind::TransactionFailed,
        }
    }
}

impl From<Error> for CartsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(DbErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(DbErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(DbErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(DbErrorKind::CheckViolation) => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}
