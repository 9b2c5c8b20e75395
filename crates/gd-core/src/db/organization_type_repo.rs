//! Organization type catalog repository.

use super::{DbError, DbPool};
use crate::models::{NewOrganizationType, OrganizationType};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

const ORGANIZATION_TYPE_COLUMNS: &str =
    "orgao_tipo_id, orgao_tipo_nome, orgao_tipo_descricao, orgao_tipo_criado_em";

/// Repository trait for organization types.
#[async_trait]
pub trait OrganizationTypeRepository: Send + Sync {
    async fn create(&self, new: &NewOrganizationType) -> Result<OrganizationType, DbError>;

    /// Inserts a type under a fixed id unless that id is taken.
    async fn create_with_id(&self, id: i64, new: &NewOrganizationType) -> Result<bool, DbError>;

    async fn get(&self, id: i64) -> Result<Option<OrganizationType>, DbError>;

    /// All types ordered by name.
    async fn list(&self) -> Result<Vec<OrganizationType>, DbError>;

    /// Deletes a type. Fails with [`DbError::Restricted`] while organizations use it.
    async fn delete(&self, id: i64) -> Result<bool, DbError>;
}

/// SQLite implementation of OrganizationTypeRepository.
pub struct SqliteOrganizationTypeRepository {
    pool: sqlx::SqlitePool,
}

impl SqliteOrganizationTypeRepository {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrganizationTypeRepository for SqliteOrganizationTypeRepository {
    async fn create(&self, new: &NewOrganizationType) -> Result<OrganizationType, DbError> {
        let result = sqlx::query(
            "INSERT INTO tipos_orgaos (orgao_tipo_nome, orgao_tipo_descricao, orgao_tipo_criado_em) VALUES (?, ?, ?)",
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("TipoOrgao", id))
    }

    async fn create_with_id(&self, id: i64, new: &NewOrganizationType) -> Result<bool, DbError> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO tipos_orgaos (orgao_tipo_id, orgao_tipo_nome, orgao_tipo_descricao, orgao_tipo_criado_em) VALUES (?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&new.name)
        .bind(&new.description)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get(&self, id: i64) -> Result<Option<OrganizationType>, DbError> {
        let query =
            format!("SELECT {ORGANIZATION_TYPE_COLUMNS} FROM tipos_orgaos WHERE orgao_tipo_id = ?");
        let row: Option<OrganizationTypeRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<OrganizationType>, DbError> {
        let query = format!(
            "SELECT {ORGANIZATION_TYPE_COLUMNS} FROM tipos_orgaos ORDER BY orgao_tipo_nome ASC"
        );
        let rows: Vec<OrganizationTypeRow> = sqlx::query_as(&query).fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM tipos_orgaos WHERE orgao_tipo_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::from(e).on_delete())?;

        Ok(result.rows_affected() > 0)
    }
}

/// MySQL implementation of OrganizationTypeRepository.
pub struct MySqlOrganizationTypeRepository {
    pool: sqlx::MySqlPool,
}

impl MySqlOrganizationTypeRepository {
    pub fn new(pool: sqlx::MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrganizationTypeRepository for MySqlOrganizationTypeRepository {
    async fn create(&self, new: &NewOrganizationType) -> Result<OrganizationType, DbError> {
        let result = sqlx::query(
            "INSERT INTO tipos_orgaos (orgao_tipo_nome, orgao_tipo_descricao, orgao_tipo_criado_em) VALUES (?, ?, ?)",
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id() as i64;
        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("TipoOrgao", id))
    }

    async fn create_with_id(&self, id: i64, new: &NewOrganizationType) -> Result<bool, DbError> {
        let result = sqlx::query(
            "INSERT IGNORE INTO tipos_orgaos (orgao_tipo_id, orgao_tipo_nome, orgao_tipo_descricao, orgao_tipo_criado_em) VALUES (?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&new.name)
        .bind(&new.description)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get(&self, id: i64) -> Result<Option<OrganizationType>, DbError> {
        let query =
            format!("SELECT {ORGANIZATION_TYPE_COLUMNS} FROM tipos_orgaos WHERE orgao_tipo_id = ?");
        let row: Option<OrganizationTypeRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<OrganizationType>, DbError> {
        let query = format!(
            "SELECT {ORGANIZATION_TYPE_COLUMNS} FROM tipos_orgaos ORDER BY orgao_tipo_nome ASC"
        );
        let rows: Vec<OrganizationTypeRow> = sqlx::query_as(&query).fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM tipos_orgaos WHERE orgao_tipo_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::from(e).on_delete())?;

        Ok(result.rows_affected() > 0)
    }
}

/// Factory function to create the appropriate repository based on pool type.
pub fn create_organization_type_repository(pool: &DbPool) -> Box<dyn OrganizationTypeRepository> {
    match pool {
        DbPool::Sqlite(pool) => Box::new(SqliteOrganizationTypeRepository::new(pool.clone())),
        DbPool::MySql(pool) => Box::new(MySqlOrganizationTypeRepository::new(pool.clone())),
    }
}

#[derive(sqlx::FromRow)]
struct OrganizationTypeRow {
    orgao_tipo_id: i64,
    orgao_tipo_nome: String,
    orgao_tipo_descricao: Option<String>,
    orgao_tipo_criado_em: DateTime<Utc>,
}

impl From<OrganizationTypeRow> for OrganizationType {
    fn from(row: OrganizationTypeRow) -> Self {
        OrganizationType {
            id: row.orgao_tipo_id,
            name: row.orgao_tipo_nome,
            description: row.orgao_tipo_descricao,
            created_at: row.orgao_tipo_criado_em,
        }
    }
}
