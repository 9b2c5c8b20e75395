//! Application users (`usuarios`).

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Reserved id of the master account provisioned from configuration.
///
/// The master row exists so that records created by the master account
/// satisfy their `criado_por` foreign keys. It is hidden from listings.
pub const MASTER_USER_ID: i64 = 1000;

/// A user of the office system.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    #[serde(rename = "usuario_id")]
    pub id: i64,
    #[serde(rename = "usuario_nome")]
    pub name: String,
    #[serde(rename = "usuario_email")]
    pub email: String,
    #[serde(rename = "usuario_telefone")]
    pub phone: String,
    #[serde(rename = "usuario_aniversario")]
    pub birthday: NaiveDate,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Access level, `1` being the highest.
    #[serde(rename = "usuario_nivel")]
    pub level: i32,
    #[serde(rename = "usuario_ativo")]
    pub active: bool,
    #[serde(rename = "usuario_foto")]
    pub photo: Option<String>,
    #[serde(rename = "usuario_criado_em")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "usuario_atualizado_em")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Returns the summary embedded in records this user created.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Fields required to insert a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub birthday: NaiveDate,
    pub password_hash: String,
    pub level: i32,
    pub active: bool,
    pub photo: Option<String>,
}

/// Partial update for a user. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub password_hash: Option<String>,
    pub level: Option<i32>,
    pub active: Option<bool>,
    pub photo: Option<String>,
}

impl UserUpdate {
    /// Returns true if no column would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.birthday.is_none()
            && self.password_hash.is_none()
            && self.level.is_none()
            && self.active.is_none()
            && self.photo.is_none()
    }
}

/// Creator reference embedded in organizations and persons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    #[serde(rename = "usuario_id")]
    pub id: i64,
    #[serde(rename = "usuario_nome")]
    pub name: String,
}
