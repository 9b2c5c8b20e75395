//! Database layer for Gabinete Digital.
//!
//! Persistence for users, organizations, persons and their type catalogs
//! using SQLx with SQLite (development and tests) or MySQL (production).

mod error;
mod pool;
mod schema;

pub mod organization_repo;
pub mod organization_type_repo;
pub mod pagination;
pub mod person_repo;
pub mod person_type_repo;
pub mod seed;
pub mod user_repo;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::DbError;
pub use pagination::{
    InvalidSort, ListQuery, PaginatedResult, Pagination, Sort, SortOrder, DEFAULT_PAGE_SIZE,
    MAX_PAGE_SIZE,
};
pub use pool::{
    create_pool, create_pool_with_options, escape_like_pattern, make_like_pattern, search_key,
    DbPool, PoolOptions,
};
pub use schema::run_migrations;
pub use seed::{seed_defaults, SeedOptions, SeedReport};

// Re-export repository traits and sort whitelists
pub use organization_repo::{
    OrganizationRepository, ORGANIZATION_DEFAULT_SORT, ORGANIZATION_SORT_COLUMNS,
};
pub use organization_type_repo::OrganizationTypeRepository;
pub use person_repo::{PersonRepository, PERSON_DEFAULT_SORT, PERSON_SORT_COLUMNS};
pub use person_type_repo::PersonTypeRepository;
pub use user_repo::{UserRepository, USER_DEFAULT_SORT, USER_SORT_COLUMNS};

// Re-export factory functions
pub use organization_repo::create_organization_repository;
pub use organization_type_repo::create_organization_type_repository;
pub use person_repo::create_person_repository;
pub use person_type_repo::create_person_type_repository;
pub use user_repo::create_user_repository;
