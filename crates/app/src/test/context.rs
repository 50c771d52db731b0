//! Test context for service-level integration tests.

use crate::{
    database::Db,
    domain::{carts::PgCartsService, orders::PgOrdersService, vouchers::PgVouchersService},
};

use super::db::TestDb;

pub struct TestContext {
    pub db: TestDb,
    pub carts: PgCartsService,
    pub vouchers: PgVouchersService,
    pub orders: PgOrdersService,
}

impl TestContext {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());

        Self {
            carts: PgCartsService::new(db.clone()),
            vouchers: PgVouchersService::new(db.clone()),
            orders: PgOrdersService::new(db),
            db: test_db,
        }
    }
}
