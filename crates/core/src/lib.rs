//! Platter
//!
//! Platter is the order lifecycle engine of a food-delivery marketplace: cart pricing,
//! voucher evaluation, the order status state machine and the tracking projection.
//!
//! Everything in this crate is pure. Persistence and transaction boundaries live in
//! `platter-app`, which calls into these modules from inside its store transactions.

pub mod cart;
pub mod errors;
pub mod pricing;
pub mod status;
pub mod tracking;
pub mod vouchers;

pub mod prelude;
