//! Orders service errors.

use platter::{errors::ErrorKind, pricing::PricingError, status::TransitionError};
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind as DbErrorKind},
};
use thiserror::Error;

use crate::domain::{catalog::models::FoodUuid, vouchers::VouchersServiceError};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Voucher(#[from] VouchersServiceError),

    #[error("cart is empty")]
    EmptyCart,

    #[error("order has no items")]
    NoItems,

    #[error("food {0} is listed more than once")]
    DuplicateItem(FoodUuid),

    #[error("some items are no longer available: {}", .0.join(", "))]
    ItemsUnavailable(Vec<String>),

    #[error("delivery address not found")]
    AddressNotFound,

    #[error("restaurant not found")]
    RestaurantNotFound,

    #[error("minimum order is {minimum}, subtotal is {subtotal}")]
    BelowMinimumOrder { minimum: u64, subtotal: u64 },

    #[error("order not found")]
    OrderNotFound,

    #[error("delivery person is not available")]
    DeliveryPersonUnavailable,

    #[error("page and limit must be at least 1")]
    InvalidPage,

    #[error("order already exists")]
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

impl OrdersServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Pricing(error) => error.kind(),
            Self::Transition(error) => error.kind(),
            Self::Voucher(error) => error.kind(),
            Self::EmptyCart
            | Self::NoItems
            | Self::DuplicateItem(_)
            | Self::InvalidPage
            | Self::MissingRequiredData
            | Self::InvalidData => ErrorKind::InvalidInput,
            Self::ItemsUnavailable(_) => ErrorKind::Unavailable,
            Self::AddressNotFound
            | Self::RestaurantNotFound
            | Self::OrderNotFound
            | Self::NotFound
            | Self::InvalidReference => ErrorKind::NotFound,
            Self::BelowMinimumOrder { .. } | Self::DeliveryPersonUnavailable => {
                ErrorKind::PolicyViolation
            }
            Self::AlreadyExists => ErrorKind::Conflict,
            Self::Sql(_) => ErrorKind::TransactionFailed,
        }
    }
}

impl From<Error> for OrdersServiceError {
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
