//! Test Fixtures
//!
//! Catalog, address book, courier and voucher rows are owned by other
//! services, so tests insert them directly.

use jiff::{Timestamp, ToSpan};
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{query, query_scalar};
use uuid::Uuid;

use crate::{
    domain::{
        addresses::AddressUuid,
        catalog::models::{FoodUuid, RestaurantUuid},
        users::UserUuid,
    },
    test::TestContext,
};

#[derive(Debug, Clone)]
pub(crate) struct NewTestVoucher {
    pub code: String,
    pub discount_type: &'static str,
    pub discount_value: i64,
    pub max_discount: Option<i64>,
    pub min_order_value: i64,
    pub is_active: bool,
    pub expires_at: Timestamp,
}

impl NewTestVoucher {
    pub(crate) fn percentage(code: &str, percent: i64) -> Self {
        Self::new(code, "percentage", percent)
    }

    pub(crate) fn fixed(code: &str, amount: i64) -> Self {
        Self::new(code, "fixed", amount)
    }

    fn new(code: &str, discount_type: &'static str, discount_value: i64) -> Self {
        Self {
            code: code.to_string(),
            discount_type,
            discount_value,
            max_discount: None,
            min_order_value: 0,
            is_active: true,
            expires_at: Timestamp::now()
                .checked_add(720.hours())
                .expect("expiry should be representable"),
        }
    }
}

impl TestContext {
    pub(crate) async fn create_restaurant(
        &self,
        minimum_order: Option<i64>,
        delivery_fee: Option<i64>,
    ) -> RestaurantUuid {
        let uuid = Uuid::now_v7();

        query(
            "INSERT INTO restaurants (uuid, name, minimum_order, delivery_fee) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(uuid)
        .bind(format!("Restaurant {uuid}"))
        .bind(minimum_order)
        .bind(delivery_fee)
        .execute(self.db.pool())
        .await
        .expect("Failed to create restaurant");

        RestaurantUuid::from_uuid(uuid)
    }

    pub(crate) async fn set_restaurant_active(&self, restaurant: RestaurantUuid, is_active: bool) {
        query("UPDATE restaurants SET is_active = $2 WHERE uuid = $1")
            .bind(restaurant.into_uuid())
            .bind(is_active)
            .execute(self.db.pool())
            .await
            .expect("Failed to update restaurant");
    }

    pub(crate) async fn create_food(
        &self,
        restaurant: RestaurantUuid,
        name: &str,
        price: i64,
    ) -> FoodUuid {
        let uuid = Uuid::now_v7();

        query("INSERT INTO foods (uuid, restaurant_uuid, name, price) VALUES ($1, $2, $3, $4)")
            .bind(uuid)
            .bind(restaurant.into_uuid())
            .bind(name)
            .bind(price)
            .execute(self.db.pool())
            .await
            .expect("Failed to create food");

        FoodUuid::from_uuid(uuid)
    }

    pub(crate) async fn set_food_price(&self, food: FoodUuid, price: i64) {
        query("UPDATE foods SET price = $2 WHERE uuid = $1")
            .bind(food.into_uuid())
            .bind(price)
            .execute(self.db.pool())
            .await
            .expect("Failed to update food price");
    }

    pub(crate) async fn set_food_available(&self, food: FoodUuid, is_available: bool) {
        query("UPDATE foods SET is_available = $2 WHERE uuid = $1")
            .bind(food.into_uuid())
            .bind(is_available)
            .execute(self.db.pool())
            .await
            .expect("Failed to update food availability");
    }

    pub(crate) async fn create_address(&self, user: UserUuid) -> AddressUuid {
        let uuid = Uuid::now_v7();

        query(
            "INSERT INTO addresses (uuid, user_uuid, label, street, city) \
             VALUES ($1, $2, 'Home', 'Jalan Merdeka 1', 'Bandung')",
        )
        .bind(uuid)
        .bind(user.into_uuid())
        .execute(self.db.pool())
        .await
        .expect("Failed to create address");

        AddressUuid::from_uuid(uuid)
    }

    pub(crate) async fn create_delivery_profile(
        &self,
        user: UserUuid,
        is_available: bool,
        position: Option<(f64, f64)>,
    ) {
        query(
            "INSERT INTO delivery_profiles (user_uuid, is_available, current_latitude, current_longitude) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(user.into_uuid())
        .bind(is_available)
        .bind(position.map(|(latitude, _)| latitude))
        .bind(position.map(|(_, longitude)| longitude))
        .execute(self.db.pool())
        .await
        .expect("Failed to create delivery profile");
    }

    pub(crate) async fn create_voucher(&self, voucher: NewTestVoucher) -> Uuid {
        let uuid = Uuid::now_v7();

        query(
            "INSERT INTO vouchers \
               (uuid, code, description, discount_type, discount_value, max_discount, \
                min_order_value, is_active, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(uuid)
        .bind(&voucher.code)
        .bind(format!("{} voucher", voucher.code))
        .bind(voucher.discount_type)
        .bind(voucher.discount_value)
        .bind(voucher.max_discount)
        .bind(voucher.min_order_value)
        .bind(voucher.is_active)
        .bind(SqlxTimestamp::from(voucher.expires_at))
        .execute(self.db.pool())
        .await
        .expect("Failed to create voucher");

        uuid
    }

    /// Run raw SQL, for tests that need to sabotage the schema.
    pub(crate) async fn execute(&self, sql: &str) {
        query(sql)
            .execute(self.db.pool())
            .await
            .expect("Failed to execute SQL");
    }

    pub(crate) async fn count_rows(&self, table: &str) -> i64 {
        query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(self.db.pool())
            .await
            .expect("Failed to count rows")
    }
}
