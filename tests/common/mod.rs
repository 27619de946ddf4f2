//! Common test utilities

use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};

/// Setup test database - create schema, truncate tables and seed currencies
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    // Unbound multi-statement SQL runs over the simple query protocol
    pool.execute(include_str!("../../migrations/0001_rate_locks.sql"))
        .await
        .expect("Failed to apply schema");

    let mut tx = pool.begin().await.expect("Failed to begin transaction");

    // Clean up DB for fresh state
    sqlx::query("TRUNCATE TABLE rate_locks, currencies")
        .execute(&mut *tx)
        .await
        .expect("Failed to clean up DB");

    let seed: [(&str, Option<Decimal>); 3] = [
        ("USD", Some(Decimal::ONE)),
        ("NGN", Some(Decimal::from(1500))),
        ("GHS", None),
    ];

    for (code, rate) in seed {
        sqlx::query("INSERT INTO currencies (code, rate) VALUES ($1, $2)")
            .bind(code)
            .bind(rate)
            .execute(&mut *tx)
            .await
            .expect("Failed to seed currency");
    }

    tx.commit().await.expect("Failed to commit transaction");

    pool
}
