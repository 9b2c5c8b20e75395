//! Person type catalog repository.

use super::{DbError, DbPool};
use crate::models::{NewPersonType, PersonType};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

const PERSON_TYPE_COLUMNS: &str =
    "tipo_pessoa_id, tipo_pessoa_nome, tipo_pessoa_descricao, tipo_pessoa_criado_em";

/// Repository trait for person types.
#[async_trait]
pub trait PersonTypeRepository: Send + Sync {
    async fn create(&self, new: &NewPersonType) -> Result<PersonType, DbError>;

    /// Inserts a type under a fixed id unless that id is taken.
    async fn create_with_id(&self, id: i64, new: &NewPersonType) -> Result<bool, DbError>;

    async fn get(&self, id: i64) -> Result<Option<PersonType>, DbError>;

    /// All types ordered by name.
    async fn list(&self) -> Result<Vec<PersonType>, DbError>;

    /// Deletes a type. Fails with [`DbError::Restricted`] while persons use it.
    async fn delete(&self, id: i64) -> Result<bool, DbError>;
}

/// SQLite implementation of PersonTypeRepository.
pub struct SqlitePersonTypeRepository {
    pool: sqlx::SqlitePool,
}

impl SqlitePersonTypeRepository {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersonTypeRepository for SqlitePersonTypeRepository {
    async fn create(&self, new: &NewPersonType) -> Result<PersonType, DbError> {
        let result = sqlx::query(
            "INSERT INTO tipos_pessoas (tipo_pessoa_nome, tipo_pessoa_descricao, tipo_pessoa_criado_em) VALUES (?, ?, ?)",
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("TipoPessoa", id))
    }

    async fn create_with_id(&self, id: i64, new: &NewPersonType) -> Result<bool, DbError> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO tipos_pessoas (tipo_pessoa_id, tipo_pessoa_nome, tipo_pessoa_descricao, tipo_pessoa_criado_em) VALUES (?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&new.name)
        .bind(&new.description)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get(&self, id: i64) -> Result<Option<PersonType>, DbError> {
        let query =
            format!("SELECT {PERSON_TYPE_COLUMNS} FROM tipos_pessoas WHERE tipo_pessoa_id = ?");
        let row: Option<PersonTypeRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<PersonType>, DbError> {
        let query = format!(
            "SELECT {PERSON_TYPE_COLUMNS} FROM tipos_pessoas ORDER BY tipo_pessoa_nome ASC"
        );
        let rows: Vec<PersonTypeRow> = sqlx::query_as(&query).fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM tipos_pessoas WHERE tipo_pessoa_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::from(e).on_delete())?;

        Ok(result.rows_affected() > 0)
    }
}

/// MySQL implementation of PersonTypeRepository.
pub struct MySqlPersonTypeRepository {
    pool: sqlx::MySqlPool,
}

impl MySqlPersonTypeRepository {
    pub fn new(pool: sqlx::MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersonTypeRepository for MySqlPersonTypeRepository {
    async fn create(&self, new: &NewPersonType) -> Result<PersonType, DbError> {
        let result = sqlx::query(
            "INSERT INTO tipos_pessoas (tipo_pessoa_nome, tipo_pessoa_descricao, tipo_pessoa_criado_em) VALUES (?, ?, ?)",
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id() as i64;
        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("TipoPessoa", id))
    }

    async fn create_with_id(&self, id: i64, new: &NewPersonType) -> Result<bool, DbError> {
        let result = sqlx::query(
            "INSERT IGNORE INTO tipos_pessoas (tipo_pessoa_id, tipo_pessoa_nome, tipo_pessoa_descricao, tipo_pessoa_criado_em) VALUES (?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&new.name)
        .bind(&new.description)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get(&self, id: i64) -> Result<Option<PersonType>, DbError> {
        let query =
            format!("SELECT {PERSON_TYPE_COLUMNS} FROM tipos_pessoas WHERE tipo_pessoa_id = ?");
        let row: Option<PersonTypeRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<PersonType>, DbError> {
        let query = format!(
            "SELECT {PERSON_TYPE_COLUMNS} FROM tipos_pessoas ORDER BY tipo_pessoa_nome ASC"
        );
        let rows: Vec<PersonTypeRow> = sqlx::query_as(&query).fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM tipos_pessoas WHERE tipo_pessoa_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::from(e).on_delete())?;

        Ok(result.rows_affected() > 0)
    }
}

/// Factory function to create the appropriate repository based on pool type.
pub fn create_person_type_repository(pool: &DbPool) -> Box<dyn PersonTypeRepository> {
    match pool {
        DbPool::Sqlite(pool) => Box::new(SqlitePersonTypeRepository::new(pool.clone())),
        DbPool::MySql(pool) => Box::new(MySqlPersonTypeRepository::new(pool.clone())),
    }
}

#[derive(sqlx::FromRow)]
struct PersonTypeRow {
    tipo_pessoa_id: i64,
    tipo_pessoa_nome: String,
    tipo_pessoa_descricao: Option<String>,
    tipo_pessoa_criado_em: DateTime<Utc>,
}

impl From<PersonTypeRow> for PersonType {
    fn from(row: PersonTypeRow) -> Self {
        PersonType {
            id: row.tipo_pessoa_id,
            name: row.tipo_pessoa_nome,
            description: row.tipo_pessoa_descricao,
            created_at: row.tipo_pessoa_criado_em,
        }
    }
}
