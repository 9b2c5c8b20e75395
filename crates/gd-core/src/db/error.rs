//! Database error types.

use thiserror::Error;

/// MySQL error numbers with a dedicated variant.
mod mysql_errno {
    pub const DUPLICATE_ENTRY: u16 = 1062;
    pub const BAD_NULL: u16 = 1048;
    pub const ROW_IS_REFERENCED: u16 = 1451;
    pub const NO_REFERENCED_ROW: u16 = 1452;
}

/// SQLite extended result codes for foreign key failures.
///
/// `ON DELETE RESTRICT` fires as a trigger constraint rather than a plain
/// foreign key constraint, so both codes are treated alike.
mod sqlite_code {
    pub const CONSTRAINT_FOREIGNKEY: &str = "787";
    pub const CONSTRAINT_TRIGGER: &str = "1811";
}

/// Errors that can occur during database operations.
#[derive(Error, Debug)]
pub enum DbError {
    /// Unique constraint violation.
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    /// Insert or update points at a row that does not exist.
    #[error("Foreign key violation: {0}")]
    ForeignKey(String),

    /// Delete blocked because other rows still reference the record.
    #[error("Record is referenced by other records: {0}")]
    Restricted(String),

    /// A required column was NULL.
    #[error("Missing required column: {0}")]
    NotNull(String),

    /// Record not found.
    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    /// Query execution error.
    #[error("Query error: {0}")]
    Query(String),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Connection(String),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration.
    #[error("Invalid database configuration: {0}")]
    Configuration(String),

    /// Pool exhausted.
    #[error("Connection pool exhausted")]
    PoolExhausted,
}

impl DbError {
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// Reclassifies a foreign key failure raised by a DELETE.
    ///
    /// SQLite reports both directions of a foreign key failure with the same
    /// code, so delete paths call this to get [`DbError::Restricted`].
    pub fn on_delete(self) -> Self {
        match self {
            DbError::ForeignKey(msg) => DbError::Restricted(msg),
            other => other,
        }
    }

    /// True for the constraint variants surfaced to clients as conflicts.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            DbError::Duplicate(_) | DbError::ForeignKey(_) | DbError::Restricted(_)
        )
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("unknown", "unknown"),
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();

                if let Some(mysql) = db_err.try_downcast_ref::<sqlx::mysql::MySqlDatabaseError>() {
                    match mysql.number() {
                        mysql_errno::DUPLICATE_ENTRY => return DbError::Duplicate(message),
                        mysql_errno::NO_REFERENCED_ROW => return DbError::ForeignKey(message),
                        mysql_errno::ROW_IS_REFERENCED => return DbError::Restricted(message),
                        mysql_errno::BAD_NULL => return DbError::NotNull(message),
                        _ => {}
                    }
                }

                if db_err
                    .try_downcast_ref::<sqlx::sqlite::SqliteError>()
                    .is_some()
                {
                    if let Some(
                        sqlite_code::CONSTRAINT_FOREIGNKEY | sqlite_code::CONSTRAINT_TRIGGER,
                    ) = db_err.code().as_deref()
                    {
                        return DbError::ForeignKey(message);
                    }
                }

                match db_err.kind() {
                    sqlx::error::ErrorKind::UniqueViolation => DbError::Duplicate(message),
                    sqlx::error::ErrorKind::ForeignKeyViolation => DbError::ForeignKey(message),
                    sqlx::error::ErrorKind::NotNullViolation => DbError::NotNull(message),
                    _ => DbError::Query(message),
                }
            }
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::Configuration(msg) => DbError::Configuration(msg.to_string()),
            sqlx::Error::Io(e) => DbError::Connection(e.to_string()),
            sqlx::Error::Tls(e) => DbError::Connection(e.to_string()),
            _ => DbError::Query(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::Migration(err.to_string())
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::Serialization(err.to_string())
    }
}
