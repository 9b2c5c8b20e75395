//! Data Transfer Objects (DTOs) for API requests and responses.
//!
//! Request and response field names follow the relational column names used
//! by existing clients (`usuario_nome`, `orgao_email`, ...).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, NaiveDate};
use gd_core::db::{InvalidSort, ListQuery, Pagination, Sort, SortOrder};
use gd_core::{
    NewOrganization, NewOrganizationType, NewPerson, NewPersonType, NewUser, OrganizationUpdate,
    PersonUpdate, UserUpdate,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ApiError;
use crate::extract::RequestOrigin;

// ============================================================================
// Envelope
// ============================================================================

/// Standard response body: `{status, message?, dados?, links?}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dados: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

impl<T: Serialize> Envelope<T> {
    /// 200 with data.
    pub fn ok(dados: T) -> Self {
        Self::with_status(StatusCode::OK, dados)
    }

    /// 201 with data and a confirmation message.
    pub fn created(message: impl Into<String>, dados: T) -> Self {
        Self::with_status(StatusCode::CREATED, dados).message(message)
    }

    fn with_status(status: StatusCode, dados: T) -> Self {
        Self {
            status: status.as_u16(),
            message: None,
            dados: Some(dados),
            links: None,
        }
    }

    /// Sets the message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attaches pagination links.
    pub fn links(mut self, links: Links) -> Self {
        self.links = Some(links);
        self
    }
}

impl Envelope<()> {
    /// Envelope carrying only a message.
    pub fn message_only(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: Some(message.into()),
            dados: None,
            links: None,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

/// Absolute pagination links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    pub first: String,
    #[serde(rename = "self")]
    pub current: String,
    pub last: String,
}

impl Links {
    /// Builds links for `path`, substituting the `pagina` value for first/last.
    ///
    /// `params` keeps its order in the generated query strings.
    pub fn paginated(
        origin: &RequestOrigin,
        path: &str,
        params: &[(&str, String)],
        last_page: u32,
    ) -> Self {
        let build = |page: Option<u32>| {
            let query = params
                .iter()
                .map(|(key, value)| match (*key, page) {
                    ("pagina", Some(page)) => format!("{}={}", key, page),
                    _ => format!("{}={}", key, value),
                })
                .collect::<Vec<_>>()
                .join("&");
            format!("{}{}?{}", origin.base_url(), path, query)
        };

        Self {
            first: build(Some(1)),
            current: build(None),
            last: build(Some(last_page.max(1))),
        }
    }

    /// Links for a registry listing (`itens`, `pagina`, `ordem`, `ordernarPor`).
    pub fn for_listing(
        origin: &RequestOrigin,
        path: &str,
        query: &ListQuery,
        total_pages: u32,
    ) -> Self {
        let params = [
            ("itens", query.pagination.per_page.to_string()),
            ("pagina", query.pagination.page.to_string()),
            ("ordem", query.sort.order.to_string()),
            ("ordernarPor", query.sort.column.to_string()),
        ];
        Self::paginated(origin, path, &params, total_pages)
    }
}

// ============================================================================
// Query parameters
// ============================================================================

/// Parses a numeric query value, treating malformed or non-positive input as absent.
pub(crate) fn lenient_u32(value: Option<&str>) -> Option<u32> {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v > 0)
}

/// Pagination and ordering parameters of registry listings.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub pagina: Option<String>,
    pub itens: Option<String>,
    pub ordem: Option<String>,
    #[serde(rename = "ordernarPor", alias = "ordenarPor")]
    pub ordernar_por: Option<String>,
}

impl ListParams {
    /// Page and page size, clamped to the allowed range.
    pub fn pagination(&self) -> Pagination {
        Pagination::from_query(
            lenient_u32(self.pagina.as_deref()),
            lenient_u32(self.itens.as_deref()),
        )
    }

    /// Requested order, `ASC` when absent.
    pub fn order(&self) -> Result<SortOrder, InvalidSort> {
        match self.ordem.as_deref().map(str::trim).filter(|o| !o.is_empty()) {
            Some(order) => order.parse(),
            None => Ok(SortOrder::Asc),
        }
    }

    /// Validates the parameters against an entity's sortable columns.
    pub fn list_query(
        &self,
        default_column: &'static str,
        allowed: &[&'static str],
    ) -> Result<ListQuery, ApiError> {
        let sort = Sort::parse(
            self.ordernar_por.as_deref(),
            self.order()?,
            default_column,
            allowed,
        )?;
        Ok(ListQuery {
            pagination: self.pagination(),
            sort,
        })
    }
}

/// `?nome=` parameter of the search endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub nome: Option<String>,
}

impl SearchParams {
    /// Returns the trimmed search term.
    pub fn term(&self) -> Result<&str, ApiError> {
        self.nome
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ApiError::BadRequest("Informe o parâmetro 'nome'.".to_string()))
    }
}

/// Query parameters of the legislative endpoints.
///
/// Values are kept raw so that malformed numbers fall back to defaults.
#[derive(Debug, Default, Deserialize)]
pub struct PropositionParams {
    pub id: Option<String>,
    pub autor: Option<String>,
    pub itens: Option<String>,
    pub pagina: Option<String>,
    pub tipo: Option<String>,
    pub ordem: Option<String>,
    #[serde(rename = "ordenarPor")]
    pub ordenar_por: Option<String>,
    pub ano: Option<String>,
}

/// Parses a path or query id, failing with `message` when it is not a positive integer.
pub fn parse_id(raw: Option<&str>, message: &str) -> Result<i64, ApiError> {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::BadRequest(message.to_string()))
}

/// Parses `YYYY-MM-DD` or an RFC 3339 timestamp into a calendar date.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ApiError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map_err(|_| {
            ApiError::validation_field(
                field,
                "date",
                &format!("Data inválida em '{}', use AAAA-MM-DD", field),
            )
        })
}

fn parse_optional_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| parse_date(field, v))
        .transpose()
}

fn required<T>(field: &str, value: Option<T>) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::validation_field(field, "required", "Campo obrigatório"))
}

// ============================================================================
// Login
// ============================================================================

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub senha: Option<String>,
}

/// Successful login body.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub status: u16,
    pub message: String,
    pub token: String,
}

// ============================================================================
// Users
// ============================================================================

/// Request to create a user.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(required, length(min = 1))]
    pub usuario_nome: Option<String>,
    #[validate(required, email(message = "E-mail inválido"))]
    pub usuario_email: Option<String>,
    #[validate(required, length(min = 1))]
    pub usuario_telefone: Option<String>,
    #[validate(required)]
    pub usuario_aniversario: Option<String>,
    #[validate(required, length(min = 1))]
    pub usuario_senha: Option<String>,
    #[validate(required)]
    pub usuario_nivel: Option<i32>,
    #[validate(required)]
    pub usuario_ativo: Option<bool>,
    pub usuario_foto: Option<String>,
}

impl CreateUserRequest {
    /// Converts the validated request into an insert, using an already hashed password.
    pub fn into_new_user(self, password_hash: String) -> Result<NewUser, ApiError> {
        let birthday = parse_date(
            "usuario_aniversario",
            &required("usuario_aniversario", self.usuario_aniversario)?,
        )?;
        Ok(NewUser {
            name: required("usuario_nome", self.usuario_nome)?,
            email: required("usuario_email", self.usuario_email)?,
            phone: required("usuario_telefone", self.usuario_telefone)?,
            birthday,
            password_hash,
            level: required("usuario_nivel", self.usuario_nivel)?,
            active: required("usuario_ativo", self.usuario_ativo)?,
            photo: self.usuario_foto,
        })
    }
}

/// Partial user update.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1))]
    pub usuario_nome: Option<String>,
    #[validate(email(message = "E-mail inválido"))]
    pub usuario_email: Option<String>,
    pub usuario_telefone: Option<String>,
    pub usuario_aniversario: Option<String>,
    #[validate(length(min = 1))]
    pub usuario_senha: Option<String>,
    pub usuario_nivel: Option<i32>,
    pub usuario_ativo: Option<bool>,
    pub usuario_foto: Option<String>,
}

impl UpdateUserRequest {
    /// Converts the request into an update, using an already hashed password if one was sent.
    pub fn into_update(self, password_hash: Option<String>) -> Result<UserUpdate, ApiError> {
        Ok(UserUpdate {
            name: self.usuario_nome,
            email: self.usuario_email,
            phone: self.usuario_telefone,
            birthday: parse_optional_date(
                "usuario_aniversario",
                self.usuario_aniversario.as_deref(),
            )?,
            password_hash,
            level: self.usuario_nivel,
            active: self.usuario_ativo,
            photo: self.usuario_foto,
        })
    }
}

// ============================================================================
// Type catalogs
// ============================================================================

/// Request to create an organization type.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrganizationTypeRequest {
    #[validate(required, length(min = 1))]
    pub orgao_tipo_nome: Option<String>,
    #[validate(required, length(min = 1))]
    pub orgao_tipo_descricao: Option<String>,
}

impl CreateOrganizationTypeRequest {
    pub fn into_new(self) -> Result<NewOrganizationType, ApiError> {
        Ok(NewOrganizationType {
            name: required("orgao_tipo_nome", self.orgao_tipo_nome)?,
            description: self.orgao_tipo_descricao,
        })
    }
}

/// Request to create a person type.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePersonTypeRequest {
    #[validate(required, length(min = 1))]
    pub tipo_pessoa_nome: Option<String>,
    #[validate(required, length(min = 1))]
    pub tipo_pessoa_descricao: Option<String>,
}

impl CreatePersonTypeRequest {
    pub fn into_new(self) -> Result<NewPersonType, ApiError> {
        Ok(NewPersonType {
            name: required("tipo_pessoa_nome", self.tipo_pessoa_nome)?,
            description: self.tipo_pessoa_descricao,
        })
    }
}

// ============================================================================
// Organizations
// ============================================================================

/// Request to create an organization.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrganizationRequest {
    #[validate(required, length(min = 1))]
    pub orgao_nome: Option<String>,
    #[validate(required, email(message = "E-mail inválido"))]
    pub orgao_email: Option<String>,
    pub orgao_telefone: Option<String>,
    pub orgao_cep: Option<String>,
    pub orgao_endereco: Option<String>,
    pub orgao_bairro: Option<String>,
    #[validate(required, length(min = 1))]
    pub orgao_municipio: Option<String>,
    #[validate(required, length(min = 1))]
    pub orgao_estado: Option<String>,
    pub orgao_site: Option<String>,
    pub orgao_instagram: Option<String>,
    pub orgao_facebook: Option<String>,
    pub orgao_informacoes: Option<String>,
    #[validate(required)]
    pub orgao_tipo: Option<i64>,
}

impl CreateOrganizationRequest {
    /// Converts the validated request into an insert attributed to `created_by`.
    pub fn into_new(self, created_by: i64) -> Result<NewOrganization, ApiError> {
        Ok(NewOrganization {
            name: required("orgao_nome", self.orgao_nome)?,
            email: required("orgao_email", self.orgao_email)?,
            phone: self.orgao_telefone,
            zip_code: self.orgao_cep,
            address: self.orgao_endereco,
            district: self.orgao_bairro,
            city: required("orgao_municipio", self.orgao_municipio)?,
            state: required("orgao_estado", self.orgao_estado)?,
            website: self.orgao_site,
            instagram: self.orgao_instagram,
            facebook: self.orgao_facebook,
            notes: self.orgao_informacoes,
            type_id: required("orgao_tipo", self.orgao_tipo)?,
            created_by,
        })
    }
}

/// Partial organization update.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateOrganizationRequest {
    #[validate(length(min = 1))]
    pub orgao_nome: Option<String>,
    #[validate(email(message = "E-mail inválido"))]
    pub orgao_email: Option<String>,
    pub orgao_telefone: Option<String>,
    pub orgao_cep: Option<String>,
    pub orgao_endereco: Option<String>,
    pub orgao_bairro: Option<String>,
    #[validate(length(min = 1))]
    pub orgao_municipio: Option<String>,
    #[validate(length(min = 1))]
    pub orgao_estado: Option<String>,
    pub orgao_site: Option<String>,
    pub orgao_instagram: Option<String>,
    pub orgao_facebook: Option<String>,
    pub orgao_informacoes: Option<String>,
    pub orgao_tipo: Option<i64>,
}

impl From<UpdateOrganizationRequest> for OrganizationUpdate {
    fn from(req: UpdateOrganizationRequest) -> Self {
        Self {
            name: req.orgao_nome,
            email: req.orgao_email,
            phone: req.orgao_telefone,
            zip_code: req.orgao_cep,
            address: req.orgao_endereco,
            district: req.orgao_bairro,
            city: req.orgao_municipio,
            state: req.orgao_estado,
            website: req.orgao_site,
            instagram: req.orgao_instagram,
            facebook: req.orgao_facebook,
            notes: req.orgao_informacoes,
            type_id: req.orgao_tipo,
        }
    }
}

// ============================================================================
// Persons
// ============================================================================

/// Request to create a person.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePersonRequest {
    #[validate(required, length(min = 1))]
    pub pessoa_nome: Option<String>,
    #[validate(required, email(message = "E-mail inválido"))]
    pub pessoa_email: Option<String>,
    pub pessoa_aniversario: Option<String>,
    pub pessoa_sexo: Option<String>,
    pub pessoa_instagram: Option<String>,
    pub pessoa_facebook: Option<String>,
    pub pessoa_twitter: Option<String>,
    pub pessoa_telefone: Option<String>,
    pub pessoa_endereco: Option<String>,
    pub pessoa_bairro: Option<String>,
    #[validate(required, length(min = 1))]
    pub pessoa_municipio: Option<String>,
    #[validate(required, length(min = 1))]
    pub pessoa_estado: Option<String>,
    pub pessoa_cep: Option<String>,
    pub pessoa_informacoes: Option<String>,
    pub pessoa_cargo: Option<String>,
    pub pessoa_partido: Option<String>,
    pub pessoa_profissao: Option<String>,
    pub pessoa_foto: Option<String>,
    #[validate(required)]
    pub pessoa_tipo: Option<i64>,
    #[validate(required)]
    pub pessoa_orgao: Option<i64>,
}

impl CreatePersonRequest {
    /// Converts the validated request into an insert attributed to `created_by`.
    pub fn into_new(self, created_by: i64) -> Result<NewPerson, ApiError> {
        Ok(NewPerson {
            birthday: parse_optional_date("pessoa_aniversario", self.pessoa_aniversario.as_deref())?,
            name: required("pessoa_nome", self.pessoa_nome)?,
            email: required("pessoa_email", self.pessoa_email)?,
            sex: self.pessoa_sexo,
            instagram: self.pessoa_instagram,
            facebook: self.pessoa_facebook,
            twitter: self.pessoa_twitter,
            phone: self.pessoa_telefone,
            address: self.pessoa_endereco,
            district: self.pessoa_bairro,
            city: required("pessoa_municipio", self.pessoa_municipio)?,
            state: required("pessoa_estado", self.pessoa_estado)?,
            zip_code: self.pessoa_cep,
            notes: self.pessoa_informacoes,
            job_title: self.pessoa_cargo,
            party: self.pessoa_partido,
            profession: self.pessoa_profissao,
            photo: self.pessoa_foto,
            type_id: required("pessoa_tipo", self.pessoa_tipo)?,
            organization_id: required("pessoa_orgao", self.pessoa_orgao)?,
            created_by,
        })
    }
}

/// Partial person update.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePersonRequest {
    #[validate(length(min = 1))]
    pub pessoa_nome: Option<String>,
    #[validate(email(message = "E-mail inválido"))]
    pub pessoa_email: Option<String>,
    pub pessoa_aniversario: Option<String>,
    pub pessoa_sexo: Option<String>,
    pub pessoa_instagram: Option<String>,
    pub pessoa_facebook: Option<String>,
    pub pessoa_twitter: Option<String>,
    pub pessoa_telefone: Option<String>,
    pub pessoa_endereco: Option<String>,
    pub pessoa_bairro: Option<String>,
    #[validate(length(min = 1))]
    pub pessoa_municipio: Option<String>,
    #[validate(length(min = 1))]
    pub pessoa_estado: Option<String>,
    pub pessoa_cep: Option<String>,
    pub pessoa_informacoes: Option<String>,
    pub pessoa_cargo: Option<String>,
    pub pessoa_partido: Option<String>,
    pub pessoa_profissao: Option<String>,
    pub pessoa_foto: Option<String>,
    pub pessoa_tipo: Option<i64>,
    pub pessoa_orgao: Option<i64>,
}

impl UpdatePersonRequest {
    pub fn into_update(self) -> Result<PersonUpdate, ApiError> {
        Ok(PersonUpdate {
            birthday: parse_optional_date("pessoa_aniversario", self.pessoa_aniversario.as_deref())?,
            name: self.pessoa_nome,
            email: self.pessoa_email,
            sex: self.pessoa_sexo,
            instagram: self.pessoa_instagram,
            facebook: self.pessoa_facebook,
            twitter: self.pessoa_twitter,
            phone: self.pessoa_telefone,
            address: self.pessoa_endereco,
            district: self.pessoa_bairro,
            city: self.pessoa_municipio,
            state: self.pessoa_estado,
            zip_code: self.pessoa_cep,
            notes: self.pessoa_informacoes,
            job_title: self.pessoa_cargo,
            party: self.pessoa_partido,
            profession: self.pessoa_profissao,
            photo: self.pessoa_foto,
            type_id: self.pessoa_tipo,
            organization_id: self.pessoa_orgao,
        })
    }
}

// ============================================================================
// Health
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: DatabaseHealth,
    pub uptime_seconds: u64,
}

/// Database health information.
#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseHealth {
    pub connected: bool,
    pub backend: String,
    pub pool_size: u32,
    pub idle_connections: usize,
}
