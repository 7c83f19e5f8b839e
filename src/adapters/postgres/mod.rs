//! PostgreSQL adapters - Database implementations for the persistence ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresPromoCodeStore` - Promo code CRUD with normalized code lookups
//! - `PostgresUsageLedger` - Append-only redemption records
//! - `PostgresAgencyStore` - Agencies with atomic commission aggregates

mod agency_store;
mod promo_code_store;
mod usage_ledger;

pub use agency_store::PostgresAgencyStore;
pub use promo_code_store::PostgresPromoCodeStore;
pub use usage_ledger::PostgresUsageLedger;

use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use crate::config::DatabaseConfig;
use crate::domain::foundation::DomainError;

/// Builds a connection pool from database configuration.
pub async fn connect_pool(config: &DatabaseConfig) -> Result<PgPool, DomainError> {
    PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .connect(&config.url)
        .await
        .map_err(|e| db_error(format!("Failed to connect to database: {}", e)))
}

/// Applies the bundled schema migrations when the configuration asks for it.
pub async fn run_migrations(pool: &PgPool, config: &DatabaseConfig) -> Result<(), DomainError> {
    if !config.run_migrations {
        return Ok(());
    }
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| db_error(format!("Failed to run migrations: {}", e)))
}

pub(crate) fn db_error(message: String) -> DomainError {
    DomainError::database(message)
}

pub(crate) fn col<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| db_error(format!("Failed to get {}: {}", name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_migrations_are_bundled() {
        let migrator = sqlx::migrate!("./migrations");
        assert!(migrator.iter().any(|m| m.description.contains("init")));
    }

    #[tokio::test]
    async fn run_migrations_is_a_no_op_when_disabled() {
        // connect_lazy parses the URL without opening a connection, so this
        // exercises the flag gate without a live database.
        let pool = PgPool::connect_lazy("postgres://localhost/promo_desk").unwrap();
        let config = DatabaseConfig::default();
        assert!(run_migrations(&pool, &config).await.is_ok());
    }
}
