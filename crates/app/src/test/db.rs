//! Throwaway Postgres databases for service tests.
//!
//! One container is started per test binary. Every [`TestDb`] gets its own
//! freshly migrated database inside it, dropped in the background once the
//! handle goes out of scope.

use std::sync::atomic::{AtomicU64, Ordering};

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection, PgPool};
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use tokio::sync::{OnceCell, mpsc};

const USER: &str = "platter_test";
const PASSWORD: &str = "platter_test_password";

static POSTGRES_CONTAINER: Lazy<OnceCell<ContainerAsync<PostgresImage>>> = Lazy::new(OnceCell::new);

static DROP_SENDER: Lazy<OnceCell<mpsc::UnboundedSender<String>>> = Lazy::new(OnceCell::new);

static NEXT_DATABASE: AtomicU64 = AtomicU64::new(0);

async fn start_container() -> ContainerAsync<PostgresImage> {
    PostgresImage::default()
        .with_user(USER)
        .with_password(PASSWORD)
        .with_db_name(USER)
        .with_env_var("POSTGRES_INITDB_ARGS", "--auth-host=trust")
        .start()
        .await
        .expect("Failed to start PostgreSQL container")
}

async fn url_for(database: &str) -> Option<String> {
    let container = POSTGRES_CONTAINER.get()?;
    let port = container.get_host_port_ipv4(5432).await.ok()?;
    let host =
        std::env::var("TESTCONTAINERS_HOST_OVERRIDE").unwrap_or_else(|_| "localhost".to_string());

    Some(format!("postgresql://{USER}:{PASSWORD}@{host}:{port}/{database}"))
}

async fn start_drop_task() -> mpsc::UnboundedSender<String> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(name) = receiver.recv().await {
            let Some(url) = url_for("postgres").await else {
                continue;
            };

            if let Ok(mut conn) = PgConnection::connect(&url).await {
                let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{name}\""))
                    .execute(&mut conn)
                    .await;

                let _ = conn.close().await;
            }
        }
    });

    sender
}

/// Generated names only use `[a-z0-9_]`, so they are safe to interpolate.
fn unique_name() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();

    format!(
        "platter_test_{}_{nanos}_{}",
        std::process::id(),
        NEXT_DATABASE.fetch_add(1, Ordering::Relaxed)
    )
}

#[derive(Debug)]
pub struct TestDb {
    pool: PgPool,
    name: String,
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Some(sender) = DROP_SENDER.get() {
            let _ = sender.send(self.name.clone());
        }
    }
}

impl TestDb {
    pub async fn new() -> Self {
        DROP_SENDER.get_or_init(start_drop_task).await;
        POSTGRES_CONTAINER.get_or_init(start_container).await;

        let name = unique_name();

        let admin_url = url_for("postgres").await.expect("Failed to resolve container URL");
        let mut conn = PgConnection::connect(&admin_url)
            .await
            .expect("Failed to connect to postgres database");

        sqlx::query(&format!("CREATE DATABASE \"{name}\""))
            .execute(&mut conn)
            .await
            .expect("Failed to create test database");

        conn.close().await.expect("Failed to close admin connection");

        let url = url_for(&name).await.expect("Failed to resolve test database URL");
        let pool = PgPool::connect(&url)
            .await
            .expect("Failed to create pool for test database");

        crate::database::migrate(&pool)
            .await
            .expect("Failed to run migrations on test database");

        Self { pool, name }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_names_are_unique_and_plain() {
        let first = unique_name();
        let second = unique_name();

        assert_ne!(first, second);
        assert!(
            first
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
            "unexpected character in {first}"
        );
        assert!(first.len() <= 63, "{first} is too long for postgres");
    }

    #[tokio::test]
    async fn databases_start_migrated() {
        let test_db = TestDb::new().await;

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE table_schema = 'public' AND table_name IN ('carts', 'orders', 'vouchers')",
        )
        .fetch_one(test_db.pool())
        .await
        .expect("Failed to inspect schema");

        assert_eq!(tables, 3);
    }
}
