//! In-memory SQLite pools for unit tests.

use super::{run_migrations, DbPool};
use uuid::Uuid;

/// Creates an isolated, migrated in-memory database.
pub async fn memory_pool() -> DbPool {
    let url = format!("sqlite:file:gd_core_{}?mode=memory&cache=shared", Uuid::new_v4());
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("Failed to create SQLite pool");

    let pool = DbPool::Sqlite(pool);
    run_migrations(&pool).await.expect("Failed to run migrations");
    pool
}
