//! Vouchers

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::VouchersServiceError;
pub(crate) use repository::PgVouchersRepository;
pub use service::*;
