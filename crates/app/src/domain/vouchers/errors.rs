//! Vouchers service errors.

use platter::{errors::ErrorKind, vouchers::VoucherError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VouchersServiceError {
    #[error(transparent)]
    Invalid(#[from] VoucherError),

    #[error("storage error")]
    Sql(#[source] sqlx::Error),
}

impl VouchersServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Invalid(error) => error.kind(),
            Self::Sql(_) => ErrorKind::TransactionFailed,
        }
    }
}

impl From<sqlx::Error> for VouchersServiceError {
    fn from(error: sqlx::Error) -> Self {
        Self::Sql(error)
    }
}
