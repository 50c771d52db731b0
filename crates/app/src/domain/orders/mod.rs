//! Orders
//!
//! Order placement from a cart or an explicit item list, the status
//! lifecycle with its append-only audit log, and customer tracking.

mod checkout;
pub mod data;
pub mod errors;
pub mod models;
mod repositories;
pub mod service;
mod tracking;

pub use errors::OrdersServiceError;
pub use service::*;
