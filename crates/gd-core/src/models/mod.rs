//! Domain records for the office registry.
//!
//! Field names on the wire follow the relational column names
//! (`usuario_nome`, `orgao_email`, ...) so existing clients keep working.
//! Rust-side names are plain English.

pub mod organization;
pub mod person;
pub mod user;

pub use organization::{
    NewOrganization, NewOrganizationType, Organization, OrganizationSummary, OrganizationType,
    OrganizationTypeSummary, OrganizationUpdate, UNDEFINED_ORGANIZATION_ID,
    UNDEFINED_ORGANIZATION_TYPE_ID,
};
pub use person::{
    NewPerson, NewPersonType, Person, PersonType, PersonTypeSummary, PersonUpdate,
    UNDEFINED_PERSON_TYPE_ID,
};
pub use user::{NewUser, User, UserSummary, UserUpdate, MASTER_USER_ID};
