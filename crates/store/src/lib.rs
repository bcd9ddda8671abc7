//! PostgreSQL collaborator for ShopScope.
//!
//! Owns the connection pool, the idempotent schema migration, the sample
//! data seed, and read-only execution of model-authored analytical queries.
//! The read-only guard lives in [`guard`] and is pure; execution here
//! assumes the statement already passed it.

pub mod guard;
pub mod models;
pub mod rows;
pub mod seed;

use serde_json::Value;
use shopscope_core::error::StoreError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info};

use models::{Product, Transaction, User};

/// Handle to the relational store. Cheap to clone; owned explicitly by the
/// capability registry rather than living in module-level state.
#[derive(Clone)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    /// Connect eagerly, failing fast if the database is unreachable.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Connection(format!("PostgreSQL connection failed: {e}")))?;

        info!("Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Create a pool without connecting. Connections are established on
    /// first use; until then no statement touches the database.
    pub fn connect_lazy(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .connect_lazy(database_url)
            .map_err(|e| StoreError::Connection(format!("Invalid database URL: {e}")))?;
        Ok(Self { pool })
    }

    /// Create from an existing connection pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run the schema migration.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        let migration_sql = include_str!("../migrations/001_create_schema.sql");

        sqlx::raw_sql(migration_sql)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::MigrationFailed(e.to_string()))?;

        info!("Schema migration complete");
        Ok(())
    }

    /// Execute an already-validated SELECT and decode every row into JSON,
    /// normalizing dates and decimals for the text-only transcript channel.
    pub async fn fetch_rows(&self, sql: &str) -> Result<Vec<Value>, StoreError> {
        debug!(sql, "Executing analytical query");

        let rows = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        rows.iter()
            .map(|row| rows::row_to_json(row).map(Value::Object))
            .collect()
    }

    /// Simple connectivity probe for the doctor command.
    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(())
    }

    /// All products, for the search index sync.
    pub async fn fetch_products(&self) -> Result<Vec<Product>, StoreError> {
        sqlx::query_as::<_, Product>(
            "SELECT product_id, name, category, brand, price FROM products",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(e.to_string()))
    }

    /// All users, for the search index sync.
    pub async fn fetch_users(&self) -> Result<Vec<User>, StoreError> {
        sqlx::query_as::<_, User>(
            "SELECT user_id, name, email, location, registration_date FROM users",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(e.to_string()))
    }

    /// Clear existing rows and insert a fresh sample dataset.
    /// Returns (users, products, transactions) counts.
    pub async fn seed(&self) -> Result<(usize, usize, usize), StoreError> {
        // ThreadRng is !Send; keep it out of scope before the first await.
        let (users, products, transactions) = {
            let mut rng = rand::rng();
            let users = seed::generate_users(&mut rng, 200);
            let products = seed::generate_products(&mut rng, 100);
            let transactions = seed::generate_transactions(&mut rng, &users, &products, 1000);
            (users, products, transactions)
        };

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        // Children first so the FKs allow the wipe.
        for table in ["transactions", "users", "products"] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await
                .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        }

        let mut builder = sqlx::QueryBuilder::new(
            "INSERT INTO users (user_id, name, email, location, registration_date) ",
        );
        builder.push_values(&users, |mut b, user| {
            b.push_bind(&user.user_id)
                .push_bind(&user.name)
                .push_bind(&user.email)
                .push_bind(&user.location)
                .push_bind(user.registration_date);
        });
        builder
            .build()
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        let mut builder = sqlx::QueryBuilder::new(
            "INSERT INTO products (product_id, name, category, brand, price) ",
        );
        builder.push_values(&products, |mut b, product| {
            b.push_bind(&product.product_id)
                .push_bind(&product.name)
                .push_bind(&product.category)
                .push_bind(&product.brand)
                .push_bind(product.price);
        });
        builder
            .build()
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        let mut builder = sqlx::QueryBuilder::new(
            "INSERT INTO transactions (order_id, user_id, product_id, amount, timestamp, status) ",
        );
        builder.push_values(&transactions, |mut b, txn: &Transaction| {
            b.push_bind(&txn.order_id)
                .push_bind(&txn.user_id)
                .push_bind(&txn.product_id)
                .push_bind(txn.amount)
                .push_bind(txn.timestamp)
                .push_bind(&txn.status);
        });
        builder
            .build()
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        info!(
            users = users.len(),
            products = products.len(),
            transactions = transactions.len(),
            "Sample data seeded"
        );
        Ok((users.len(), products.len(), transactions.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_lazy_does_not_touch_the_database() {
        // A lazy pool against an unreachable host must construct fine;
        // only actual statements would fail.
        let store = Store::connect_lazy("postgres://nobody@127.0.0.1:1/nonexistent");
        assert!(store.is_ok());
    }
}
