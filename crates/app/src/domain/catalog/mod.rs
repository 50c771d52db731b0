//! Catalog
//!
//! Restaurants and foods are maintained by the catalog service. Orders and
//! carts read them inside their own transactions so prices and availability
//! are observed consistently with the writes that depend on them.

pub mod models;
mod repository;

pub(crate) use repository::PgCatalogRepository;
