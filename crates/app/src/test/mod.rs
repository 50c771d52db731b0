//! Service test support.

mod context;
mod db;
pub(crate) mod fixtures;

pub(crate) use context::TestContext;
