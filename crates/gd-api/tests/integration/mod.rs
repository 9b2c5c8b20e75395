//! Integration test modules.

pub mod auth_tests;
pub mod common;
pub mod health_tests;
pub mod organization_tests;
pub mod person_tests;
pub mod proposition_tests;
pub mod type_tests;
pub mod user_tests;
