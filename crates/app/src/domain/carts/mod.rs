//! Carts
//!
//! One cart per user, holding lines from a single restaurant at frozen prices.

pub mod data;
pub mod errors;
pub mod models;
pub(crate) mod repositories;
pub mod service;

pub use errors::CartsServiceError;
pub use service::*;
