//! Persons (`pessoas`) and their type catalog (`tipos_pessoas`).

use super::organization::OrganizationSummary;
use super::user::UserSummary;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Seeded person type used when no specific type applies.
pub const UNDEFINED_PERSON_TYPE_ID: i64 = 1;

/// A category of contact (voter, journalist, mayor, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonType {
    #[serde(rename = "tipo_pessoa_id")]
    pub id: i64,
    #[serde(rename = "tipo_pessoa_nome")]
    pub name: String,
    #[serde(rename = "tipo_pessoa_descricao")]
    pub description: Option<String>,
    #[serde(rename = "tipo_pessoa_criado_em")]
    pub created_at: DateTime<Utc>,
}

/// Fields required to insert a person type.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPersonType {
    #[serde(rename = "tipo_pessoa_nome")]
    pub name: String,
    #[serde(rename = "tipo_pessoa_descricao")]
    pub description: Option<String>,
}

/// Type reference embedded in person reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonTypeSummary {
    #[serde(rename = "tipo_pessoa_id")]
    pub id: i64,
    #[serde(rename = "tipo_pessoa_nome")]
    pub name: String,
}

/// A contact tracked by the office.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    #[serde(rename = "pessoa_id")]
    pub id: i64,
    #[serde(rename = "pessoa_nome")]
    pub name: String,
    #[serde(rename = "pessoa_email")]
    pub email: String,
    #[serde(rename = "pessoa_aniversario")]
    pub birthday: Option<NaiveDate>,
    #[serde(rename = "pessoa_sexo")]
    pub sex: Option<String>,
    #[serde(rename = "pessoa_instagram")]
    pub instagram: Option<String>,
    #[serde(rename = "pessoa_facebook")]
    pub facebook: Option<String>,
    #[serde(rename = "pessoa_twitter")]
    pub twitter: Option<String>,
    #[serde(rename = "pessoa_telefone")]
    pub phone: Option<String>,
    #[serde(rename = "pessoa_endereco")]
    pub address: Option<String>,
    #[serde(rename = "pessoa_bairro")]
    pub district: Option<String>,
    #[serde(rename = "pessoa_municipio")]
    pub city: String,
    #[serde(rename = "pessoa_estado")]
    pub state: String,
    #[serde(rename = "pessoa_cep")]
    pub zip_code: Option<String>,
    #[serde(rename = "pessoa_informacoes")]
    pub notes: Option<String>,
    #[serde(rename = "pessoa_cargo")]
    pub job_title: Option<String>,
    #[serde(rename = "pessoa_partido")]
    pub party: Option<String>,
    #[serde(rename = "pessoa_profissao")]
    pub profession: Option<String>,
    #[serde(rename = "pessoa_foto")]
    pub photo: Option<String>,
    #[serde(rename = "pessoa_tipo")]
    pub type_id: i64,
    #[serde(rename = "pessoa_orgao")]
    pub organization_id: i64,
    #[serde(rename = "pessoa_criada_por")]
    pub created_by: i64,
    #[serde(rename = "pessoa_criado_em")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "pessoa_atualizado_em")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "TipoPessoa")]
    pub person_type: PersonTypeSummary,
    #[serde(rename = "Orgao")]
    pub organization: OrganizationSummary,
    #[serde(rename = "Usuario")]
    pub creator: UserSummary,
}

/// Fields required to insert a person.
#[derive(Debug, Clone, Default)]
pub struct NewPerson {
    pub name: String,
    pub email: String,
    pub birthday: Option<NaiveDate>,
    pub sex: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: Option<String>,
    pub notes: Option<String>,
    pub job_title: Option<String>,
    pub party: Option<String>,
    pub profession: Option<String>,
    pub photo: Option<String>,
    pub type_id: i64,
    pub organization_id: i64,
    pub created_by: i64,
}

/// Partial update for a person.
#[derive(Debug, Clone, Default)]
pub struct PersonUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub sex: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub notes: Option<String>,
    pub job_title: Option<String>,
    pub party: Option<String>,
    pub profession: Option<String>,
    pub photo: Option<String>,
    pub type_id: Option<i64>,
    pub organization_id: Option<i64>,
}

impl PersonUpdate {
    /// Returns true if no column would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.birthday.is_none()
            && self.sex.is_none()
            && self.instagram.is_none()
            && self.facebook.is_none()
            && self.twitter.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.district.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.zip_code.is_none()
            && self.notes.is_none()
            && self.job_title.is_none()
            && self.party.is_none()
            && self.profession.is_none()
            && self.photo.is_none()
            && self.type_id.is_none()
            && self.organization_id.is_none()
    }
}
