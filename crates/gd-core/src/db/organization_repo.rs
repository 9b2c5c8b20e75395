//! Organization repository for database operations.
//!
//! Reads join the type catalog and the creating user so every
//! [`Organization`] carries its `TipoOrgao` and `Usuario` summaries.

use super::pagination::{ListQuery, PaginatedResult};
use super::{make_like_pattern, search_key, DbError, DbPool};
use crate::models::{
    NewOrganization, Organization, OrganizationTypeSummary, OrganizationUpdate, UserSummary,
    UNDEFINED_ORGANIZATION_ID,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Columns organizations may be sorted by.
pub const ORGANIZATION_SORT_COLUMNS: &[&str] = &[
    "orgao_nome",
    "orgao_email",
    "orgao_municipio",
    "orgao_estado",
    "orgao_criado_em",
];

/// Default sort column for organization listings.
pub const ORGANIZATION_DEFAULT_SORT: &str = "orgao_nome";

const ORGANIZATION_SELECT: &str = r#"
    SELECT o.orgao_id, o.orgao_nome, o.orgao_email, o.orgao_telefone, o.orgao_cep,
        o.orgao_endereco, o.orgao_bairro, o.orgao_municipio, o.orgao_estado, o.orgao_site,
        o.orgao_instagram, o.orgao_facebook, o.orgao_informacoes, o.orgao_tipo,
        o.orgao_criado_por, o.orgao_criado_em, o.orgao_atualizado_em,
        t.orgao_tipo_nome, u.usuario_nome
    FROM orgaos o
    INNER JOIN tipos_orgaos t ON t.orgao_tipo_id = o.orgao_tipo
    INNER JOIN usuarios u ON u.usuario_id = o.orgao_criado_por
"#;

const ORGANIZATION_INSERT: &str = r#"
    INTO orgaos (orgao_nome, orgao_email, orgao_telefone, orgao_cep, orgao_endereco,
        orgao_bairro, orgao_municipio, orgao_estado, orgao_site, orgao_instagram,
        orgao_facebook, orgao_informacoes, orgao_tipo, orgao_criado_por,
        orgao_criado_em, orgao_atualizado_em, orgao_nome_busca"#;

const ORGANIZATION_UPDATE: &str = r#"
    UPDATE orgaos SET orgao_nome = ?, orgao_email = ?, orgao_telefone = ?, orgao_cep = ?,
        orgao_endereco = ?, orgao_bairro = ?, orgao_municipio = ?, orgao_estado = ?,
        orgao_site = ?, orgao_instagram = ?, orgao_facebook = ?, orgao_informacoes = ?,
        orgao_tipo = ?, orgao_atualizado_em = ?, orgao_nome_busca = ?
    WHERE orgao_id = ?
"#;

/// Repository trait for organization persistence.
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    async fn create(&self, org: &NewOrganization) -> Result<Organization, DbError>;

    /// Inserts an organization under a fixed id unless that id is taken.
    async fn create_with_id(&self, id: i64, org: &NewOrganization) -> Result<bool, DbError>;

    async fn get(&self, id: i64) -> Result<Option<Organization>, DbError>;

    /// Lists organizations, excluding the placeholder record.
    async fn list(&self, query: &ListQuery) -> Result<PaginatedResult<Organization>, DbError>;

    /// Case-insensitive substring search on the name, ordered by name.
    ///
    /// Case folding follows Unicode rules (`Órgão` matches `órgão`); accents
    /// are significant.
    async fn search_by_name(&self, name: &str) -> Result<Vec<Organization>, DbError>;

    /// Applies a partial update. Returns `None` if the organization does not exist.
    async fn update(
        &self,
        id: i64,
        update: &OrganizationUpdate,
    ) -> Result<Option<Organization>, DbError>;

    async fn delete(&self, id: i64) -> Result<bool, DbError>;

    /// Counts organizations, excluding the placeholder record.
    async fn count(&self) -> Result<u64, DbError>;
}

/// Binds the insert columns of a [`NewOrganization`] in declaration order.
macro_rules! bind_new_organization {
    ($query:expr, $org:expr, $now:expr) => {
        $query
            .bind(&$org.name)
            .bind(&$org.email)
            .bind(&$org.phone)
            .bind(&$org.zip_code)
            .bind(&$org.address)
            .bind(&$org.district)
            .bind(&$org.city)
            .bind(&$org.state)
            .bind(&$org.website)
            .bind(&$org.instagram)
            .bind(&$org.facebook)
            .bind(&$org.notes)
            .bind($org.type_id)
            .bind($org.created_by)
            .bind($now)
            .bind($now)
            .bind(search_key(&$org.name))
    };
}

/// Binds the SET columns of [`ORGANIZATION_UPDATE`] followed by the id.
macro_rules! bind_organization_update {
    ($query:expr, $merged:expr, $id:expr) => {
        $query
            .bind(&$merged.name)
            .bind(&$merged.email)
            .bind(&$merged.phone)
            .bind(&$merged.zip_code)
            .bind(&$merged.address)
            .bind(&$merged.district)
            .bind(&$merged.city)
            .bind(&$merged.state)
            .bind(&$merged.website)
            .bind(&$merged.instagram)
            .bind(&$merged.facebook)
            .bind(&$merged.notes)
            .bind($merged.type_id)
            .bind(Utc::now())
            .bind(search_key(&$merged.name))
            .bind($id)
    };
}

/// SQLite implementation of OrganizationRepository.
pub struct SqliteOrganizationRepository {
    pool: sqlx::SqlitePool,
}

impl SqliteOrganizationRepository {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrganizationRepository for SqliteOrganizationRepository {
    async fn create(&self, org: &NewOrganization) -> Result<Organization, DbError> {
        let sql = format!(
            "INSERT {ORGANIZATION_INSERT}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        );
        let now = Utc::now();
        let result = bind_new_organization!(sqlx::query(&sql), org, now)
            .execute(&self.pool)
            .await?;

        let id = result.last_insert_rowid();
        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Orgao", id))
    }

    async fn create_with_id(&self, id: i64, org: &NewOrganization) -> Result<bool, DbError> {
        let sql = format!(
            "INSERT OR IGNORE {ORGANIZATION_INSERT}, orgao_id) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        );
        let now = Utc::now();
        let result = bind_new_organization!(sqlx::query(&sql), org, now)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get(&self, id: i64) -> Result<Option<Organization>, DbError> {
        let sql = format!("{ORGANIZATION_SELECT} WHERE o.orgao_id = ?");
        let row: Option<OrganizationRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list(&self, query: &ListQuery) -> Result<PaginatedResult<Organization>, DbError> {
        let total = self.count().await?;
        let sql = format!(
            "{ORGANIZATION_SELECT} WHERE o.orgao_id <> ? ORDER BY {} LIMIT ? OFFSET ?",
            query.sort.to_sql()
        );
        let rows: Vec<OrganizationRow> = sqlx::query_as(&sql)
            .bind(UNDEFINED_ORGANIZATION_ID)
            .bind(i64::from(query.pagination.limit()))
            .bind(i64::from(query.pagination.offset()))
            .fetch_all(&self.pool)
            .await?;

        let items = rows.into_iter().map(Into::into).collect();
        Ok(PaginatedResult::new(items, total, &query.pagination))
    }

    async fn search_by_name(&self, name: &str) -> Result<Vec<Organization>, DbError> {
        let sql = format!(
            r"{ORGANIZATION_SELECT} WHERE o.orgao_id <> ? AND o.orgao_nome_busca LIKE ? ESCAPE '\' ORDER BY o.orgao_nome ASC"
        );
        let rows: Vec<OrganizationRow> = sqlx::query_as(&sql)
            .bind(UNDEFINED_ORGANIZATION_ID)
            .bind(make_like_pattern(&search_key(name)))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(
        &self,
        id: i64,
        update: &OrganizationUpdate,
    ) -> Result<Option<Organization>, DbError> {
        let select = format!("{ORGANIZATION_SELECT} WHERE o.orgao_id = ?");
        let mut tx = self.pool.begin().await?;

        let existing: Option<OrganizationRow> = sqlx::query_as(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(existing) = existing else {
            return Ok(None);
        };
        let merged = MergedOrganization::new(existing.into(), update);

        bind_organization_update!(sqlx::query(ORGANIZATION_UPDATE), merged, id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        self.get(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM orgaos WHERE orgao_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::from(e).on_delete())?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, DbError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orgaos WHERE orgao_id <> ?")
            .bind(UNDEFINED_ORGANIZATION_ID)
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

/// MySQL implementation of OrganizationRepository.
pub struct MySqlOrganizationRepository {
    pool: sqlx::MySqlPool,
}

impl MySqlOrganizationRepository {
    pub fn new(pool: sqlx::MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrganizationRepository for MySqlOrganizationRepository {
    async fn create(&self, org: &NewOrganization) -> Result<Organization, DbError> {
        let sql = format!(
            "INSERT {ORGANIZATION_INSERT}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        );
        let now = Utc::now();
        let result = bind_new_organization!(sqlx::query(&sql), org, now)
            .execute(&self.pool)
            .await?;

        let id = result.last_insert_id() as i64;
        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Orgao", id))
    }

    async fn create_with_id(&self, id: i64, org: &NewOrganization) -> Result<bool, DbError> {
        let sql = format!(
            "INSERT IGNORE {ORGANIZATION_INSERT}, orgao_id) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        );
        let now = Utc::now();
        let result = bind_new_organization!(sqlx::query(&sql), org, now)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get(&self, id: i64) -> Result<Option<Organization>, DbError> {
        let sql = format!("{ORGANIZATION_SELECT} WHERE o.orgao_id = ?");
        let row: Option<OrganizationRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list(&self, query: &ListQuery) -> Result<PaginatedResult<Organization>, DbError> {
        let total = self.count().await?;
        let sql = format!(
            "{ORGANIZATION_SELECT} WHERE o.orgao_id <> ? ORDER BY {} LIMIT ? OFFSET ?",
            query.sort.to_sql()
        );
        let rows: Vec<OrganizationRow> = sqlx::query_as(&sql)
            .bind(UNDEFINED_ORGANIZATION_ID)
            .bind(i64::from(query.pagination.limit()))
            .bind(i64::from(query.pagination.offset()))
            .fetch_all(&self.pool)
            .await?;

        let items = rows.into_iter().map(Into::into).collect();
        Ok(PaginatedResult::new(items, total, &query.pagination))
    }

    async fn search_by_name(&self, name: &str) -> Result<Vec<Organization>, DbError> {
        let sql = format!(
            r"{ORGANIZATION_SELECT} WHERE o.orgao_id <> ? AND o.orgao_nome_busca LIKE ? ESCAPE '\\' ORDER BY o.orgao_nome ASC"
        );
        let rows: Vec<OrganizationRow> = sqlx::query_as(&sql)
            .bind(UNDEFINED_ORGANIZATION_ID)
            .bind(make_like_pattern(&search_key(name)))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(
        &self,
        id: i64,
        update: &OrganizationUpdate,
    ) -> Result<Option<Organization>, DbError> {
        let select = format!("{ORGANIZATION_SELECT} WHERE o.orgao_id = ? FOR UPDATE");
        let mut tx = self.pool.begin().await?;

        let existing: Option<OrganizationRow> = sqlx::query_as(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(existing) = existing else {
            return Ok(None);
        };
        let merged = MergedOrganization::new(existing.into(), update);

        bind_organization_update!(sqlx::query(ORGANIZATION_UPDATE), merged, id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        self.get(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM orgaos WHERE orgao_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::from(e).on_delete())?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, DbError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orgaos WHERE orgao_id <> ?")
            .bind(UNDEFINED_ORGANIZATION_ID)
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

/// Factory function to create the appropriate repository based on pool type.
pub fn create_organization_repository(pool: &DbPool) -> Box<dyn OrganizationRepository> {
    match pool {
        DbPool::Sqlite(pool) => Box::new(SqliteOrganizationRepository::new(pool.clone())),
        DbPool::MySql(pool) => Box::new(MySqlOrganizationRepository::new(pool.clone())),
    }
}

struct MergedOrganization {
    name: String,
    email: String,
    phone: Option<String>,
    zip_code: Option<String>,
    address: Option<String>,
    district: Option<String>,
    city: String,
    state: String,
    website: Option<String>,
    instagram: Option<String>,
    facebook: Option<String>,
    notes: Option<String>,
    type_id: i64,
}

impl MergedOrganization {
    fn new(existing: Organization, update: &OrganizationUpdate) -> Self {
        Self {
            name: update.name.clone().unwrap_or(existing.name),
            email: update.email.clone().unwrap_or(existing.email),
            phone: update.phone.clone().or(existing.phone),
            zip_code: update.zip_code.clone().or(existing.zip_code),
            address: update.address.clone().or(existing.address),
            district: update.district.clone().or(existing.district),
            city: update.city.clone().unwrap_or(existing.city),
            state: update.state.clone().unwrap_or(existing.state),
            website: update.website.clone().or(existing.website),
            instagram: update.instagram.clone().or(existing.instagram),
            facebook: update.facebook.clone().or(existing.facebook),
            notes: update.notes.clone().or(existing.notes),
            type_id: update.type_id.unwrap_or(existing.type_id),
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrganizationRow {
    orgao_id: i64,
    orgao_nome: String,
    orgao_email: String,
    orgao_telefone: Option<String>,
    orgao_cep: Option<String>,
    orgao_endereco: Option<String>,
    orgao_bairro: Option<String>,
    orgao_municipio: String,
    orgao_estado: String,
    orgao_site: Option<String>,
    orgao_instagram: Option<String>,
    orgao_facebook: Option<String>,
    orgao_informacoes: Option<String>,
    orgao_tipo: i64,
    orgao_criado_por: i64,
    orgao_criado_em: DateTime<Utc>,
    orgao_atualizado_em: DateTime<Utc>,
    orgao_tipo_nome: String,
    usuario_nome: String,
}

impl From<OrganizationRow> for Organization {
    fn from(row: OrganizationRow) -> Self {
        Organization {
            id: row.orgao_id,
            name: row.orgao_nome,
            email: row.orgao_email,
            phone: row.orgao_telefone,
            zip_code: row.orgao_cep,
            address: row.orgao_endereco,
            district: row.orgao_bairro,
            city: row.orgao_municipio,
            state: row.orgao_estado,
            website: row.orgao_site,
            instagram: row.orgao_instagram,
            facebook: row.orgao_facebook,
            notes: row.orgao_informacoes,
            type_id: row.orgao_tipo,
            created_by: row.orgao_criado_por,
            created_at: row.orgao_criado_em,
            updated_at: row.orgao_atualizado_em,
            organization_type: OrganizationTypeSummary {
                id: row.orgao_tipo,
                name: row.orgao_tipo_nome,
            },
            creator: UserSummary {
                id: row.orgao_criado_por,
                name: row.usuario_nome,
            },
        }
    }
}
