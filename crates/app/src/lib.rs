//! Postgres persistence and services for the Platter order engine.

pub mod context;
pub mod database;
pub mod domain;

#[cfg(test)]
mod test;

pub mod uuids;
