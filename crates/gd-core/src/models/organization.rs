//! Organizations (`orgaos`) and their type catalog (`tipos_orgaos`).

use super::user::UserSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seeded organization type used when no specific type applies.
pub const UNDEFINED_ORGANIZATION_TYPE_ID: i64 = 1;

/// Seeded placeholder organization, hidden from listings.
pub const UNDEFINED_ORGANIZATION_ID: i64 = 1;

/// A category of organization (ministry, city hall, association, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationType {
    #[serde(rename = "orgao_tipo_id")]
    pub id: i64,
    #[serde(rename = "orgao_tipo_nome")]
    pub name: String,
    #[serde(rename = "orgao_tipo_descricao")]
    pub description: Option<String>,
    #[serde(rename = "orgao_tipo_criado_em")]
    pub created_at: DateTime<Utc>,
}

/// Fields required to insert an organization type.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrganizationType {
    #[serde(rename = "orgao_tipo_nome")]
    pub name: String,
    #[serde(rename = "orgao_tipo_descricao")]
    pub description: Option<String>,
}

/// Type reference embedded in organization reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganizationTypeSummary {
    #[serde(rename = "orgao_tipo_id")]
    pub id: i64,
    #[serde(rename = "orgao_tipo_nome")]
    pub name: String,
}

/// A government body or institution the office deals with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Organization {
    #[serde(rename = "orgao_id")]
    pub id: i64,
    #[serde(rename = "orgao_nome")]
    pub name: String,
    #[serde(rename = "orgao_email")]
    pub email: String,
    #[serde(rename = "orgao_telefone")]
    pub phone: Option<String>,
    #[serde(rename = "orgao_cep")]
    pub zip_code: Option<String>,
    #[serde(rename = "orgao_endereco")]
    pub address: Option<String>,
    #[serde(rename = "orgao_bairro")]
    pub district: Option<String>,
    #[serde(rename = "orgao_municipio")]
    pub city: String,
    #[serde(rename = "orgao_estado")]
    pub state: String,
    #[serde(rename = "orgao_site")]
    pub website: Option<String>,
    #[serde(rename = "orgao_instagram")]
    pub instagram: Option<String>,
    #[serde(rename = "orgao_facebook")]
    pub facebook: Option<String>,
    #[serde(rename = "orgao_informacoes")]
    pub notes: Option<String>,
    #[serde(rename = "orgao_tipo")]
    pub type_id: i64,
    #[serde(rename = "orgao_criado_por")]
    pub created_by: i64,
    #[serde(rename = "orgao_criado_em")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "orgao_atualizado_em")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "TipoOrgao")]
    pub organization_type: OrganizationTypeSummary,
    #[serde(rename = "Usuario")]
    pub creator: UserSummary,
}

/// Fields required to insert an organization.
#[derive(Debug, Clone, Default)]
pub struct NewOrganization {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub zip_code: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub city: String,
    pub state: String,
    pub website: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub notes: Option<String>,
    pub type_id: i64,
    pub created_by: i64,
}

/// Partial update for an organization.
#[derive(Debug, Clone, Default)]
pub struct OrganizationUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub zip_code: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub website: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub notes: Option<String>,
    pub type_id: Option<i64>,
}

impl OrganizationUpdate {
    /// Returns true if no column would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.zip_code.is_none()
            && self.address.is_none()
            && self.district.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.website.is_none()
            && self.instagram.is_none()
            && self.facebook.is_none()
            && self.notes.is_none()
            && self.type_id.is_none()
    }
}

/// Organization reference embedded in person reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganizationSummary {
    #[serde(rename = "orgao_id")]
    pub id: i64,
    #[serde(rename = "orgao_nome")]
    pub name: String,
}
