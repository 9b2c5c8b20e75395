//! # gd-core
//!
//! Domain records, persistence and authentication primitives for
//! Gabinete Digital.
//!
//! This crate provides the office registry models (users, organizations,
//! persons and their type catalogs), the SQLx-backed repositories with
//! pagination and search, schema migrations and seeds, and the password
//! and access-token helpers used by the HTTP API.

pub mod auth;
pub mod db;
pub mod models;

pub use auth::{
    hash_password, parse_ttl, verify_password, AuthError, Claims, PasswordError, TokenIssuer,
    TokenSubject,
};
pub use db::{DbError, DbPool};
pub use models::{
    NewOrganization, NewOrganizationType, NewPerson, NewPersonType, NewUser, Organization,
    OrganizationType, OrganizationUpdate, Person, PersonType, PersonUpdate, User, UserUpdate,
    MASTER_USER_ID, UNDEFINED_ORGANIZATION_ID,
};
