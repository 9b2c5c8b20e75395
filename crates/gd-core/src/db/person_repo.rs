//! Person repository for database operations.

use super::pagination::{ListQuery, PaginatedResult};
use super::{make_like_pattern, search_key, DbError, DbPool};
use crate::models::{
    NewPerson, OrganizationSummary, Person, PersonTypeSummary, PersonUpdate, UserSummary,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

/// Columns persons may be sorted by.
pub const PERSON_SORT_COLUMNS: &[&str] = &[
    "pessoa_nome",
    "pessoa_email",
    "pessoa_municipio",
    "pessoa_estado",
    "pessoa_criado_em",
];

/// Default sort column for person listings.
pub const PERSON_DEFAULT_SORT: &str = "pessoa_nome";

const PERSON_SELECT: &str = r#"
    SELECT p.pessoa_id, p.pessoa_nome, p.pessoa_email, p.pessoa_aniversario, p.pessoa_sexo,
        p.pessoa_instagram, p.pessoa_facebook, p.pessoa_twitter, p.pessoa_telefone,
        p.pessoa_endereco, p.pessoa_bairro, p.pessoa_municipio, p.pessoa_estado, p.pessoa_cep,
        p.pessoa_informacoes, p.pessoa_cargo, p.pessoa_partido, p.pessoa_profissao,
        p.pessoa_foto, p.pessoa_tipo, p.pessoa_orgao, p.pessoa_criada_por,
        p.pessoa_criado_em, p.pessoa_atualizado_em,
        tp.tipo_pessoa_nome, o.orgao_nome, u.usuario_nome
    FROM pessoas p
    INNER JOIN tipos_pessoas tp ON tp.tipo_pessoa_id = p.pessoa_tipo
    INNER JOIN orgaos o ON o.orgao_id = p.pessoa_orgao
    INNER JOIN usuarios u ON u.usuario_id = p.pessoa_criada_por
"#;

const PERSON_INSERT: &str = r#"
    INSERT INTO pessoas (pessoa_nome, pessoa_email, pessoa_aniversario, pessoa_sexo,
        pessoa_instagram, pessoa_facebook, pessoa_twitter, pessoa_telefone, pessoa_endereco,
        pessoa_bairro, pessoa_municipio, pessoa_estado, pessoa_cep, pessoa_informacoes,
        pessoa_cargo, pessoa_partido, pessoa_profissao, pessoa_foto, pessoa_tipo,
        pessoa_orgao, pessoa_criada_por, pessoa_criado_em, pessoa_atualizado_em,
        pessoa_nome_busca)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

const PERSON_UPDATE: &str = r#"
    UPDATE pessoas SET pessoa_nome = ?, pessoa_email = ?, pessoa_aniversario = ?,
        pessoa_sexo = ?, pessoa_instagram = ?, pessoa_facebook = ?, pessoa_twitter = ?,
        pessoa_telefone = ?, pessoa_endereco = ?, pessoa_bairro = ?, pessoa_municipio = ?,
        pessoa_estado = ?, pessoa_cep = ?, pessoa_informacoes = ?, pessoa_cargo = ?,
        pessoa_partido = ?, pessoa_profissao = ?, pessoa_foto = ?, pessoa_tipo = ?,
        pessoa_orgao = ?, pessoa_atualizado_em = ?, pessoa_nome_busca = ?
    WHERE pessoa_id = ?
"#;

/// Repository trait for person persistence.
#[async_trait]
pub trait PersonRepository: Send + Sync {
    async fn create(&self, person: &NewPerson) -> Result<Person, DbError>;

    async fn get(&self, id: i64) -> Result<Option<Person>, DbError>;

    async fn list(&self, query: &ListQuery) -> Result<PaginatedResult<Person>, DbError>;

    /// Case-insensitive substring search on the name, ordered by name.
    async fn search_by_name(&self, name: &str) -> Result<Vec<Person>, DbError>;

    /// Applies a partial update. Returns `None` if the person does not exist.
    async fn update(&self, id: i64, update: &PersonUpdate) -> Result<Option<Person>, DbError>;

    async fn delete(&self, id: i64) -> Result<bool, DbError>;

    async fn count(&self) -> Result<u64, DbError>;
}

macro_rules! bind_new_person {
    ($query:expr, $person:expr, $now:expr) => {
        $query
            .bind(&$person.name)
            .bind(&$person.email)
            .bind($person.birthday)
            .bind(&$person.sex)
            .bind(&$person.instagram)
            .bind(&$person.facebook)
            .bind(&$person.twitter)
            .bind(&$person.phone)
            .bind(&$person.address)
            .bind(&$person.district)
            .bind(&$person.city)
            .bind(&$person.state)
            .bind(&$person.zip_code)
            .bind(&$person.notes)
            .bind(&$person.job_title)
            .bind(&$person.party)
            .bind(&$person.profession)
            .bind(&$person.photo)
            .bind($person.type_id)
            .bind($person.organization_id)
            .bind($person.created_by)
            .bind($now)
            .bind($now)
            .bind(search_key(&$person.name))
    };
}

macro_rules! bind_person_update {
    ($query:expr, $merged:expr, $id:expr) => {
        $query
            .bind(&$merged.name)
            .bind(&$merged.email)
            .bind($merged.birthday)
            .bind(&$merged.sex)
            .bind(&$merged.instagram)
            .bind(&$merged.facebook)
            .bind(&$merged.twitter)
            .bind(&$merged.phone)
            .bind(&$merged.address)
            .bind(&$merged.district)
            .bind(&$merged.city)
            .bind(&$merged.state)
            .bind(&$merged.zip_code)
            .bind(&$merged.notes)
            .bind(&$merged.job_title)
            .bind(&$merged.party)
            .bind(&$merged.profession)
            .bind(&$merged.photo)
            .bind($merged.type_id)
            .bind($merged.organization_id)
            .bind(Utc::now())
            .bind(search_key(&$merged.name))
            .bind($id)
    };
}

/// SQLite implementation of PersonRepository.
pub struct SqlitePersonRepository {
    pool: sqlx::SqlitePool,
}

impl SqlitePersonRepository {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersonRepository for SqlitePersonRepository {
    async fn create(&self, person: &NewPerson) -> Result<Person, DbError> {
        let now = Utc::now();
        let result = bind_new_person!(sqlx::query(PERSON_INSERT), person, now)
            .execute(&self.pool)
            .await?;

        let id = result.last_insert_rowid();
        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Pessoa", id))
    }

    async fn get(&self, id: i64) -> Result<Option<Person>, DbError> {
        let sql = format!("{PERSON_SELECT} WHERE p.pessoa_id = ?");
        let row: Option<PersonRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list(&self, query: &ListQuery) -> Result<PaginatedResult<Person>, DbError> {
        let total = self.count().await?;
        let sql = format!(
            "{PERSON_SELECT} ORDER BY {} LIMIT ? OFFSET ?",
            query.sort.to_sql()
        );
        let rows: Vec<PersonRow> = sqlx::query_as(&sql)
            .bind(i64::from(query.pagination.limit()))
            .bind(i64::from(query.pagination.offset()))
            .fetch_all(&self.pool)
            .await?;

        let items = rows.into_iter().map(Into::into).collect();
        Ok(PaginatedResult::new(items, total, &query.pagination))
    }

    async fn search_by_name(&self, name: &str) -> Result<Vec<Person>, DbError> {
        let sql = format!(
            r"{PERSON_SELECT} WHERE p.pessoa_nome_busca LIKE ? ESCAPE '\' ORDER BY p.pessoa_nome ASC"
        );
        let rows: Vec<PersonRow> = sqlx::query_as(&sql)
            .bind(make_like_pattern(&search_key(name)))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: i64, update: &PersonUpdate) -> Result<Option<Person>, DbError> {
        let select = format!("{PERSON_SELECT} WHERE p.pessoa_id = ?");
        let mut tx = self.pool.begin().await?;

        let existing: Option<PersonRow> = sqlx::query_as(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(existing) = existing else {
            return Ok(None);
        };
        let merged = MergedPerson::new(existing.into(), update);

        bind_person_update!(sqlx::query(PERSON_UPDATE), merged, id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        self.get(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM pessoas WHERE pessoa_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::from(e).on_delete())?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, DbError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pessoas")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

/// MySQL implementation of PersonRepository.
pub struct MySqlPersonRepository {
    pool: sqlx::MySqlPool,
}

impl MySqlPersonRepository {
    pub fn new(pool: sqlx::MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersonRepository for MySqlPersonRepository {
    async fn create(&self, person: &NewPerson) -> Result<Person, DbError> {
        let now = Utc::now();
        let result = bind_new_person!(sqlx::query(PERSON_INSERT), person, now)
            .execute(&self.pool)
            .await?;

        let id = result.last_insert_id() as i64;
        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Pessoa", id))
    }

    async fn get(&self, id: i64) -> Result<Option<Person>, DbError> {
        let sql = format!("{PERSON_SELECT} WHERE p.pessoa_id = ?");
        let row: Option<PersonRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list(&self, query: &ListQuery) -> Result<PaginatedResult<Person>, DbError> {
        let total = self.count().await?;
        let sql = format!(
            "{PERSON_SELECT} ORDER BY {} LIMIT ? OFFSET ?",
            query.sort.to_sql()
        );
        let rows: Vec<PersonRow> = sqlx::query_as(&sql)
            .bind(i64::from(query.pagination.limit()))
            .bind(i64::from(query.pagination.offset()))
            .fetch_all(&self.pool)
            .await?;

        let items = rows.into_iter().map(Into::into).collect();
        Ok(PaginatedResult::new(items, total, &query.pagination))
    }

    async fn search_by_name(&self, name: &str) -> Result<Vec<Person>, DbError> {
        let sql = format!(
            r"{PERSON_SELECT} WHERE p.pessoa_nome_busca LIKE ? ESCAPE '\\' ORDER BY p.pessoa_nome ASC"
        );
        let rows: Vec<PersonRow> = sqlx::query_as(&sql)
            .bind(make_like_pattern(&search_key(name)))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: i64, update: &PersonUpdate) -> Result<Option<Person>, DbError> {
        let select = format!("{PERSON_SELECT} WHERE p.pessoa_id = ? FOR UPDATE");
        let mut tx = self.pool.begin().await?;

        let existing: Option<PersonRow> = sqlx::query_as(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(existing) = existing else {
            return Ok(None);
        };
        let merged = MergedPerson::new(existing.into(), update);

        bind_person_update!(sqlx::query(PERSON_UPDATE), merged, id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        self.get(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM pessoas WHERE pessoa_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::from(e).on_delete())?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, DbError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pessoas")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

/// Factory function to create the appropriate repository based on pool type.
pub fn create_person_repository(pool: &DbPool) -> Box<dyn PersonRepository> {
    match pool {
        DbPool::Sqlite(pool) => Box::new(SqlitePersonRepository::new(pool.clone())),
        DbPool::MySql(pool) => Box::new(MySqlPersonRepository::new(pool.clone())),
    }
}

struct MergedPerson {
    name: String,
    email: String,
    birthday: Option<NaiveDate>,
    sex: Option<String>,
    instagram: Option<String>,
    facebook: Option<String>,
    twitter: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    district: Option<String>,
    city: String,
    state: String,
    zip_code: Option<String>,
    notes: Option<String>,
    job_title: Option<String>,
    party: Option<String>,
    profession: Option<String>,
    photo: Option<String>,
    type_id: i64,
    organization_id: i64,
}

impl MergedPerson {
    fn new(existing: Person, update: &PersonUpdate) -> Self {
        Self {
            name: update.name.clone().unwrap_or(existing.name),
            email: update.email.clone().unwrap_or(existing.email),
            birthday: update.birthday.or(existing.birthday),
            sex: update.sex.clone().or(existing.sex),
            instagram: update.instagram.clone().or(existing.instagram),
            facebook: update.facebook.clone().or(existing.facebook),
            twitter: update.twitter.clone().or(existing.twitter),
            phone: update.phone.clone().or(existing.phone),
            address: update.address.clone().or(existing.address),
            district: update.district.clone().or(existing.district),
            city: update.city.clone().unwrap_or(existing.city),
            state: update.state.clone().unwrap_or(existing.state),
            zip_code: update.zip_code.clone().or(existing.zip_code),
            notes: update.notes.clone().or(existing.notes),
            job_title: update.job_title.clone().or(existing.job_title),
            party: update.party.clone().or(existing.party),
            profession: update.profession.clone().or(existing.profession),
            photo: update.photo.clone().or(existing.photo),
            type_id: update.type_id.unwrap_or(existing.type_id),
            organization_id: update.organization_id.unwrap_or(existing.organization_id),
        }
    }
}

#[derive(sqlx::FromRow)]
struct PersonRow {
    pessoa_id: i64,
    pessoa_nome: String,
    pessoa_email: String,
    pessoa_aniversario: Option<NaiveDate>,
    pessoa_sexo: Option<String>,
    pessoa_instagram: Option<String>,
    pessoa_facebook: Option<String>,
    pessoa_twitter: Option<String>,
    pessoa_telefone: Option<String>,
    pessoa_endereco: Option<String>,
    pessoa_bairro: Option<String>,
    pessoa_municipio: String,
    pessoa_estado: String,
    pessoa_cep: Option<String>,
    pessoa_informacoes: Option<String>,
    pessoa_cargo: Option<String>,
    pessoa_partido: Option<String>,
    pessoa_profissao: Option<String>,
    pessoa_foto: Option<String>,
    pessoa_tipo: i64,
    pessoa_orgao: i64,
    pessoa_criada_por: i64,
    pessoa_criado_em: DateTime<Utc>,
    pessoa_atualizado_em: DateTime<Utc>,
    tipo_pessoa_nome: String,
    orgao_nome: String,
    usuario_nome: String,
}

impl From<PersonRow> for Person {
    fn from(row: PersonRow) -> Self {
        Person {
            id: row.pessoa_id,
            name: row.pessoa_nome,
            email: row.pessoa_email,
            birthday: row.pessoa_aniversario,
            sex: row.pessoa_sexo,
            instagram: row.pessoa_instagram,
            facebook: row.pessoa_facebook,
            twitter: row.pessoa_twitter,
            phone: row.pessoa_telefone,
            address: row.pessoa_endereco,
            district: row.pessoa_bairro,
            city: row.pessoa_municipio,
            state: row.pessoa_estado,
            zip_code: row.pessoa_cep,
            notes: row.pessoa_informacoes,
            job_title: row.pessoa_cargo,
            party: row.pessoa_partido,
            profession: row.pessoa_profissao,
            photo: row.pessoa_foto,
            type_id: row.pessoa_tipo,
            organization_id: row.pessoa_orgao,
            created_by: row.pessoa_criada_por,
            created_at: row.pessoa_criado_em,
            updated_at: row.pessoa_atualizado_em,
            person_type: PersonTypeSummary {
                id: row.pessoa_tipo,
                name: row.tipo_pessoa_nome,
            },
            organization: OrganizationSummary {
                id: row.pessoa_orgao,
                name: row.orgao_nome,
            },
            creator: UserSummary {
                id: row.pessoa_criada_por,
                name: row.usuario_nome,
            },
        }
    }
}
