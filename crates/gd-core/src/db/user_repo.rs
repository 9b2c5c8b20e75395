//! User repository for database operations.

use super::pagination::{ListQuery, PaginatedResult};
use super::{DbError, DbPool};
use crate::models::{NewUser, User, UserUpdate, MASTER_USER_ID};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

/// Columns users may be sorted by.
pub const USER_SORT_COLUMNS: &[&str] = &["usuario_nome"];

/// Default sort column for user listings.
pub const USER_DEFAULT_SORT: &str = "usuario_nome";

const USER_COLUMNS: &str = "usuario_id, usuario_nome, usuario_email, usuario_telefone, \
    usuario_aniversario, usuario_senha, usuario_nivel, usuario_ativo, usuario_foto, \
    usuario_criado_em, usuario_atualizado_em";

/// Repository trait for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user and returns the stored row.
    async fn create(&self, user: &NewUser) -> Result<User, DbError>;

    /// Inserts a user under a fixed id unless that id is taken.
    ///
    /// Returns `true` when a row was written.
    async fn create_with_id(&self, id: i64, user: &NewUser) -> Result<bool, DbError>;

    async fn get(&self, id: i64) -> Result<Option<User>, DbError>;

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DbError>;

    /// Lists users, excluding the master account.
    async fn list(&self, query: &ListQuery) -> Result<PaginatedResult<User>, DbError>;

    /// Applies a partial update. Returns `None` if the user does not exist.
    async fn update(&self, id: i64, update: &UserUpdate) -> Result<Option<User>, DbError>;

    /// Deletes a user. Returns `false` if nothing was deleted.
    async fn delete(&self, id: i64) -> Result<bool, DbError>;

    /// Counts users, excluding the master account.
    async fn count(&self) -> Result<u64, DbError>;
}

/// SQLite implementation of UserRepository.
pub struct SqliteUserRepository {
    pool: sqlx::SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO usuarios (usuario_nome, usuario_email, usuario_telefone, usuario_aniversario,
                usuario_senha, usuario_nivel, usuario_ativo, usuario_foto, usuario_criado_em, usuario_atualizado_em)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(user.birthday)
        .bind(&user.password_hash)
        .bind(user.level)
        .bind(user.active)
        .bind(&user.photo)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Usuario", id))
    }

    async fn create_with_id(&self, id: i64, user: &NewUser) -> Result<bool, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO usuarios (usuario_id, usuario_nome, usuario_email, usuario_telefone,
                usuario_aniversario, usuario_senha, usuario_nivel, usuario_ativo, usuario_foto,
                usuario_criado_em, usuario_atualizado_em)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(user.birthday)
        .bind(&user.password_hash)
        .bind(user.level)
        .bind(user.active)
        .bind(&user.photo)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get(&self, id: i64) -> Result<Option<User>, DbError> {
        let query = format!("SELECT {USER_COLUMNS} FROM usuarios WHERE usuario_id = ?");
        let row: Option<UserRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let query = format!("SELECT {USER_COLUMNS} FROM usuarios WHERE usuario_email = ?");
        let row: Option<UserRow> = sqlx::query_as(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list(&self, query: &ListQuery) -> Result<PaginatedResult<User>, DbError> {
        let total = self.count().await?;
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM usuarios WHERE usuario_id <> ? ORDER BY {} LIMIT ? OFFSET ?",
            query.sort.to_sql()
        );
        let rows: Vec<UserRow> = sqlx::query_as(&sql)
            .bind(MASTER_USER_ID)
            .bind(i64::from(query.pagination.limit()))
            .bind(i64::from(query.pagination.offset()))
            .fetch_all(&self.pool)
            .await?;

        let items = rows.into_iter().map(Into::into).collect();
        Ok(PaginatedResult::new(items, total, &query.pagination))
    }

    async fn update(&self, id: i64, update: &UserUpdate) -> Result<Option<User>, DbError> {
        let select = format!("SELECT {USER_COLUMNS} FROM usuarios WHERE usuario_id = ?");
        let mut tx = self.pool.begin().await?;

        let existing: Option<UserRow> = sqlx::query_as(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(existing) = existing else {
            return Ok(None);
        };
        let merged = MergedUser::new(existing.into(), update);

        sqlx::query(
            r#"
            UPDATE usuarios SET usuario_nome = ?, usuario_email = ?, usuario_telefone = ?,
                usuario_aniversario = ?, usuario_senha = ?, usuario_nivel = ?, usuario_ativo = ?,
                usuario_foto = ?, usuario_atualizado_em = ?
            WHERE usuario_id = ?
            "#,
        )
        .bind(&merged.name)
        .bind(&merged.email)
        .bind(&merged.phone)
        .bind(merged.birthday)
        .bind(&merged.password_hash)
        .bind(merged.level)
        .bind(merged.active)
        .bind(&merged.photo)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        self.get(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM usuarios WHERE usuario_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::from(e).on_delete())?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, DbError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM usuarios WHERE usuario_id <> ?")
            .bind(MASTER_USER_ID)
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

/// MySQL implementation of UserRepository.
pub struct MySqlUserRepository {
    pool: sqlx::MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: sqlx::MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO usuarios (usuario_nome, usuario_email, usuario_telefone, usuario_aniversario,
                usuario_senha, usuario_nivel, usuario_ativo, usuario_foto, usuario_criado_em, usuario_atualizado_em)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(user.birthday)
        .bind(&user.password_hash)
        .bind(user.level)
        .bind(user.active)
        .bind(&user.photo)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id() as i64;
        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Usuario", id))
    }

    async fn create_with_id(&self, id: i64, user: &NewUser) -> Result<bool, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT IGNORE INTO usuarios (usuario_id, usuario_nome, usuario_email, usuario_telefone,
                usuario_aniversario, usuario_senha, usuario_nivel, usuario_ativo, usuario_foto,
                usuario_criado_em, usuario_atualizado_em)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(user.birthday)
        .bind(&user.password_hash)
        .bind(user.level)
        .bind(user.active)
        .bind(&user.photo)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get(&self, id: i64) -> Result<Option<User>, DbError> {
        let query = format!("SELECT {USER_COLUMNS} FROM usuarios WHERE usuario_id = ?");
        let row: Option<UserRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let query = format!("SELECT {USER_COLUMNS} FROM usuarios WHERE usuario_email = ?");
        let row: Option<UserRow> = sqlx::query_as(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list(&self, query: &ListQuery) -> Result<PaginatedResult<User>, DbError> {
        let total = self.count().await?;
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM usuarios WHERE usuario_id <> ? ORDER BY {} LIMIT ? OFFSET ?",
            query.sort.to_sql()
        );
        let rows: Vec<UserRow> = sqlx::query_as(&sql)
            .bind(MASTER_USER_ID)
            .bind(i64::from(query.pagination.limit()))
            .bind(i64::from(query.pagination.offset()))
            .fetch_all(&self.pool)
            .await?;

        let items = rows.into_iter().map(Into::into).collect();
        Ok(PaginatedResult::new(items, total, &query.pagination))
    }

    async fn update(&self, id: i64, update: &UserUpdate) -> Result<Option<User>, DbError> {
        let select = format!("SELECT {USER_COLUMNS} FROM usuarios WHERE usuario_id = ? FOR UPDATE");
        let mut tx = self.pool.begin().await?;

        let existing: Option<UserRow> = sqlx::query_as(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(existing) = existing else {
            return Ok(None);
        };
        let merged = MergedUser::new(existing.into(), update);

        sqlx::query(
            r#"
            UPDATE usuarios SET usuario_nome = ?, usuario_email = ?, usuario_telefone = ?,
                usuario_aniversario = ?, usuario_senha = ?, usuario_nivel = ?, usuario_ativo = ?,
                usuario_foto = ?, usuario_atualizado_em = ?
            WHERE usuario_id = ?
            "#,
        )
        .bind(&merged.name)
        .bind(&merged.email)
        .bind(&merged.phone)
        .bind(merged.birthday)
        .bind(&merged.password_hash)
        .bind(merged.level)
        .bind(merged.active)
        .bind(&merged.photo)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        self.get(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM usuarios WHERE usuario_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::from(e).on_delete())?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, DbError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM usuarios WHERE usuario_id <> ?")
            .bind(MASTER_USER_ID)
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

/// Factory function to create the appropriate repository based on pool type.
pub fn create_user_repository(pool: &DbPool) -> Box<dyn UserRepository> {
    match pool {
        DbPool::Sqlite(pool) => Box::new(SqliteUserRepository::new(pool.clone())),
        DbPool::MySql(pool) => Box::new(MySqlUserRepository::new(pool.clone())),
    }
}

/// Column values after applying an update on top of the stored row.
struct MergedUser {
    name: String,
    email: String,
    phone: String,
    birthday: NaiveDate,
    password_hash: String,
    level: i32,
    active: bool,
    photo: Option<String>,
}

impl MergedUser {
    fn new(existing: User, update: &UserUpdate) -> Self {
        Self {
            name: update.name.clone().unwrap_or(existing.name),
            email: update.email.clone().unwrap_or(existing.email),
            phone: update.phone.clone().unwrap_or(existing.phone),
            birthday: update.birthday.unwrap_or(existing.birthday),
            password_hash: update
                .password_hash
                .clone()
                .unwrap_or(existing.password_hash),
            level: update.level.unwrap_or(existing.level),
            active: update.active.unwrap_or(existing.active),
            photo: update.photo.clone().or(existing.photo),
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    usuario_id: i64,
    usuario_nome: String,
    usuario_email: String,
    usuario_telefone: String,
    usuario_aniversario: NaiveDate,
    usuario_senha: String,
    usuario_nivel: i32,
    usuario_ativo: bool,
    usuario_foto: Option<String>,
    usuario_criado_em: DateTime<Utc>,
    usuario_atualizado_em: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.usuario_id,
            name: row.usuario_nome,
            email: row.usuario_email,
            phone: row.usuario_telefone,
            birthday: row.usuario_aniversario,
            password_hash: row.usuario_senha,
            level: row.usuario_nivel,
            active: row.usuario_ativo,
            photo: row.usuario_foto,
            created_at: row.usuario_criado_em,
            updated_at: row.usuario_atualizado_em,
        }
    }
}
