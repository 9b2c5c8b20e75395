//! Embedded schema migrations.

use super::{DbError, DbPool};
use tracing::info;

/// Applies pending migrations for the pool's backend.
pub async fn run_migrations(pool: &DbPool) -> Result<(), DbError> {
    match pool {
        DbPool::Sqlite(pool) => {
            info!("Running SQLite migrations");
            sqlx::migrate!("src/db/migrations/sqlite").run(pool).await?;
        }
        DbPool::MySql(pool) => {
            info!("Running MySQL migrations");
            sqlx::migrate!("src/db/migrations/mysql").run(pool).await?;
        }
    }

    info!("Migrations completed successfully");
    Ok(())
}
