//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        carts::{CartsService, PgCartsService},
        orders::{OrdersService, PgOrdersService},
        vouchers::service::{PgVouchersService, VouchersService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub carts: Arc<dyn CartsService>,
    pub vouchers: Arc<dyn VouchersService>,
    pub orders: Arc<dyn OrdersService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(url: &str, max_connections: u32) -> Result<Self, AppInitError> {
        let pool = database::connect(url, max_connections)
            .await
            .map_err(AppInitError::Database)?;

        Ok(Self::from_db(Db::new(pool)))
    }

    /// Wire every service onto one pool.
    pub fn from_db(db: Db) -> Self {
        Self {
            carts: Arc::new(PgCartsService::new(db.clone())),
            vouchers: Arc::new(PgVouchersService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db)),
        }
    }
}
