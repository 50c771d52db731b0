//! Users
//!
//! Customers, staff and couriers are authenticated upstream; only their
//! identifiers reach this crate.

use crate::uuids::TypedUuid;

/// Marker for an authenticated principal.
#[derive(Debug)]
pub struct User;

/// User UUID
pub type UserUuid = TypedUuid<User>;
