//! Database connection pool management.

use super::DbError;
use sqlx::{MySql, Pool, Sqlite};
use std::time::Duration;
use tracing::info;

/// Escapes LIKE wildcards in user input so they match literally.
///
/// `%`, `_` and the escape character `\` itself are prefixed with `\`.
/// Queries must declare the escape character (`ESCAPE '\'`).
///
/// ```
/// use gd_core::db::escape_like_pattern;
///
/// assert_eq!(escape_like_pattern("50%_off"), r"50\%\_off");
/// ```
pub fn escape_like_pattern(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len() * 2);
    for c in pattern.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Case-folded form of a name, stored alongside it for searching.
///
/// SQLite's `LIKE` folds ASCII only, so names are lowercased here with full
/// Unicode rules and searches compare folded values on both backends.
pub fn search_key(name: &str) -> String {
    name.to_lowercase()
}

/// Wraps an escaped search term in `%` so it matches anywhere.
pub fn make_like_pattern(search: &str) -> String {
    format!("%{}%", escape_like_pattern(search))
}

/// Connection pool for one of the supported backends.
#[derive(Clone)]
pub enum DbPool {
    /// SQLite (development and tests).
    Sqlite(Pool<Sqlite>),
    /// MySQL (production).
    MySql(Pool<MySql>),
}

/// Options for creating a database connection pool.
#[derive(Debug, Clone)]
pub struct PoolOptions {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub max_lifetime: Option<Duration>,
    pub idle_timeout: Option<Duration>,
}

impl Default for PoolOptions {
    fn default() -> Self {
        let max_connections = env_u64("DATABASE_MAX_CONNECTIONS").unwrap_or(10) as u32;
        let min_connections = env_u64("DATABASE_MIN_CONNECTIONS").unwrap_or(1) as u32;
        let acquire_timeout_secs = env_u64("DATABASE_ACQUIRE_TIMEOUT_SECS").unwrap_or(30);

        Self {
            max_connections,
            min_connections,
            acquire_timeout: Duration::from_secs(acquire_timeout_secs),
            max_lifetime: Some(Duration::from_secs(1800)),
            idle_timeout: Some(Duration::from_secs(600)),
        }
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

/// Creates a pool with [`PoolOptions::default`].
pub async fn create_pool(database_url: &str) -> Result<DbPool, DbError> {
    create_pool_with_options(database_url, PoolOptions::default()).await
}

/// Creates a pool, picking the backend from the URL scheme
/// (`sqlite:` or `mysql://`/`mariadb://`).
pub async fn create_pool_with_options(
    database_url: &str,
    options: PoolOptions,
) -> Result<DbPool, DbError> {
    if database_url.starts_with("sqlite:") {
        info!("Creating SQLite connection pool");
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(options.max_connections)
            .min_connections(options.min_connections)
            .acquire_timeout(options.acquire_timeout)
            .max_lifetime(options.max_lifetime)
            .idle_timeout(options.idle_timeout)
            .connect(database_url)
            .await?;
        Ok(DbPool::Sqlite(pool))
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        info!("Creating MySQL connection pool");
        let pool = sqlx::mysql::MySqlPoolOptions::new()
            .max_connections(options.max_connections)
            .min_connections(options.min_connections)
            .acquire_timeout(options.acquire_timeout)
            .max_lifetime(options.max_lifetime)
            .idle_timeout(options.idle_timeout)
            .connect(database_url)
            .await?;
        Ok(DbPool::MySql(pool))
    } else {
        Err(DbError::Configuration(format!(
            "Unsupported database URL scheme. Expected sqlite: or mysql://, got: {}",
            database_url.split(':').next().unwrap_or("unknown")
        )))
    }
}

impl DbPool {
    /// Returns the backend name.
    pub fn db_type(&self) -> &'static str {
        match self {
            DbPool::Sqlite(_) => "sqlite",
            DbPool::MySql(_) => "mysql",
        }
    }

    /// Checks if the database answers a trivial query.
    pub async fn is_healthy(&self) -> bool {
        match self {
            DbPool::Sqlite(pool) => sqlx::query("SELECT 1").fetch_one(pool).await.is_ok(),
            DbPool::MySql(pool) => sqlx::query("SELECT 1").fetch_one(pool).await.is_ok(),
        }
    }

    pub async fn close(&self) {
        match self {
            DbPool::Sqlite(pool) => pool.close().await,
            DbPool::MySql(pool) => pool.close().await,
        }
    }

    pub fn pool_size(&self) -> u32 {
        match self {
            DbPool::Sqlite(pool) => pool.size(),
            DbPool::MySql(pool) => pool.size(),
        }
    }

    pub fn idle_connections(&self) -> usize {
        match self {
            DbPool::Sqlite(pool) => pool.num_idle(),
            DbPool::MySql(pool) => pool.num_idle(),
        }
    }
}
