//! Idempotent reference data.
//!
//! Seeds the master account, the placeholder organization and the bundled
//! organization/person type catalogs. Every insert targets a fixed id and is
//! skipped when that id already exists, so seeding can run on every start.

use super::{
    create_organization_repository, create_organization_type_repository,
    create_person_type_repository, create_user_repository, DbError, DbPool,
};
use crate::auth::password::hash_password;
use crate::models::{
    NewOrganization, NewOrganizationType, NewPersonType, NewUser, MASTER_USER_ID,
    UNDEFINED_ORGANIZATION_ID, UNDEFINED_ORGANIZATION_TYPE_ID,
};
use chrono::NaiveDate;
use rand::Rng;
use serde::Deserialize;
use tracing::{info, warn};

const ORGANIZATION_TYPES_JSON: &str = include_str!("seed_data/tipos_orgaos.json");
const PERSON_TYPES_JSON: &str = include_str!("seed_data/tipos_pessoas.json");

/// Master account details used when the row does not exist yet.
#[derive(Debug, Clone)]
pub struct SeedOptions {
    pub master_name: String,
    pub master_email: String,
    /// Plain text password. A random one is generated when absent.
    pub master_password: Option<String>,
}

impl SeedOptions {
    /// Fixed master account for test databases.
    pub fn for_tests() -> Self {
        Self {
            master_name: "Administrador".to_string(),
            master_email: "admin@gabinete.local".to_string(),
            master_password: Some("admin-test".to_string()),
        }
    }
}

/// Counts of rows written by [`seed_defaults`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub master_user_created: bool,
    pub organization_types: usize,
    pub person_types: usize,
    pub placeholder_organization_created: bool,
}

#[derive(Deserialize)]
struct OrganizationTypeSeed {
    orgao_tipo_id: i64,
    #[serde(flatten)]
    fields: NewOrganizationType,
}

#[derive(Deserialize)]
struct PersonTypeSeed {
    tipo_pessoa_id: i64,
    #[serde(flatten)]
    fields: NewPersonType,
}

/// Seeds all reference rows. Existing rows are left untouched.
pub async fn seed_defaults(pool: &DbPool, options: &SeedOptions) -> Result<SeedReport, DbError> {
    let mut report = SeedReport {
        master_user_created: ensure_master_user(pool, options).await?,
        ..Default::default()
    };

    let org_types = create_organization_type_repository(pool);
    let catalog: Vec<OrganizationTypeSeed> = serde_json::from_str(ORGANIZATION_TYPES_JSON)?;
    for entry in &catalog {
        if org_types.create_with_id(entry.orgao_tipo_id, &entry.fields).await? {
            report.organization_types += 1;
        }
    }

    let person_types = create_person_type_repository(pool);
    let catalog: Vec<PersonTypeSeed> = serde_json::from_str(PERSON_TYPES_JSON)?;
    for entry in &catalog {
        if person_types.create_with_id(entry.tipo_pessoa_id, &entry.fields).await? {
            report.person_types += 1;
        }
    }

    let placeholder = NewOrganization {
        name: "Sem órgão definido".to_string(),
        email: "email@email".to_string(),
        city: "Brasília".to_string(),
        state: "DF".to_string(),
        type_id: UNDEFINED_ORGANIZATION_TYPE_ID,
        created_by: MASTER_USER_ID,
        ..Default::default()
    };
    report.placeholder_organization_created = create_organization_repository(pool)
        .create_with_id(UNDEFINED_ORGANIZATION_ID, &placeholder)
        .await?;

    info!(
        master_user_created = report.master_user_created,
        organization_types = report.organization_types,
        person_types = report.person_types,
        placeholder_organization_created = report.placeholder_organization_created,
        "Reference data seeded"
    );

    Ok(report)
}

async fn ensure_master_user(pool: &DbPool, options: &SeedOptions) -> Result<bool, DbError> {
    let users = create_user_repository(pool);
    if users.get(MASTER_USER_ID).await?.is_some() {
        return Ok(false);
    }

    let password = match &options.master_password {
        Some(password) if !password.is_empty() => password.clone(),
        _ => {
            warn!("No master password configured, generated a random one");
            generate_secure_password()
        }
    };
    let password_hash =
        hash_password(&password).map_err(|e| DbError::Configuration(e.to_string()))?;

    let master = NewUser {
        name: options.master_name.clone(),
        email: options.master_email.clone(),
        phone: "0".to_string(),
        birthday: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default(),
        password_hash,
        level: 1,
        active: true,
        photo: None,
    };

    let created = users.create_with_id(MASTER_USER_ID, &master).await?;
    if created {
        info!(email = %options.master_email, "Created master user");
    }
    Ok(created)
}

/// Generates a 16 character password mixing letters, digits and symbols.
fn generate_secure_password() -> String {
    const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
    const DIGITS: &[u8] = b"0123456789";
    const SPECIAL: &[u8] = b"!@#$%^&*";

    let mut rng = rand::thread_rng();
    let mut password: Vec<char> = [UPPER, LOWER, DIGITS, SPECIAL]
        .iter()
        .map(|set| set[rng.gen_range(0..set.len())] as char)
        .collect();

    let all: Vec<u8> = [UPPER, LOWER, DIGITS, SPECIAL].concat();
    password.extend((0..12).map(|_| all[rng.gen_range(0..all.len())] as char));

    for i in (1..password.len()).rev() {
        let j = rng.gen_range(0..=i);
        password.swap(i, j);
    }

    password.into_iter().collect()
}
