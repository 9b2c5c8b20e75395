//! # gd-api
//!
//! REST API server for Gabinete Digital.
//!
//! This crate provides the HTTP API for the office registry (users,
//! organizations, persons and their type catalogs) and the legislative
//! endpoints that aggregate data from the Câmara dos Deputados.

pub mod auth;
pub mod dto;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use error::ApiError;
pub use server::{ApiServer, ApiServerConfig};
pub use state::{AppState, MasterAccount};
