//! Connector trait definitions for Gabinete Digital.
//!
//! This module defines the interfaces upstream connectors implement and the
//! records they return, independent of any particular wire format.

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur in connectors.
#[derive(Error, Debug, Clone)]
pub enum ConnectorError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Authorization denied: {0}")]
    AuthorizationDenied(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Rate limited: retry after {0} seconds")]
    RateLimited(u64),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Health status of a connector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorHealth {
    /// Connector is healthy and operational.
    Healthy,
    /// Connector is degraded but still functional.
    Degraded(String),
    /// Connector is unhealthy and not operational.
    Unhealthy(String),
    /// Health status is unknown.
    Unknown,
}

/// Configuration for a connector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Connector name/identifier.
    pub name: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum retries on server errors.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Additional headers to include.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    2
}

impl ConnectorConfig {
    /// Creates a configuration with default timeout and retry settings.
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            headers: HashMap::new(),
        }
    }
}

/// Base trait for all connectors.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Returns the connector name.
    fn name(&self) -> &str;

    /// Returns the connector type (e.g., "legislative").
    fn connector_type(&self) -> &str;

    /// Returns the operations this connector supports.
    fn capabilities(&self) -> Vec<String> {
        vec!["health_check".to_string(), "test_connection".to_string()]
    }

    /// Checks the health of the connector.
    async fn health_check(&self) -> ConnectorResult<ConnectorHealth>;

    /// Tests the connection to the upstream service.
    async fn test_connection(&self) -> ConnectorResult<bool>;
}

// ============================================================================
// Legislative data
// ============================================================================

/// A bill as it appears in listings and in the related-bills endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropositionSummary {
    pub id: i64,
    #[serde(default)]
    pub uri: Option<String>,
    pub sigla_tipo: String,
    pub numero: i64,
    pub ano: i32,
    #[serde(default)]
    pub ementa: String,
}

/// Processing status of a bill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropositionStatus {
    #[serde(default)]
    pub cod_situacao: Option<i64>,
    #[serde(default)]
    pub descricao_situacao: Option<String>,
}

/// Full record of a single bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropositionDetails {
    pub id: i64,
    pub sigla_tipo: String,
    pub numero: i64,
    pub ano: i32,
    #[serde(default)]
    pub ementa: String,
    #[serde(default)]
    pub data_apresentacao: Option<String>,
    /// URI of the bill this one is attached to, if any.
    #[serde(default)]
    pub uri_prop_principal: Option<String>,
    #[serde(default, rename = "statusProposicao")]
    pub status: Option<PropositionStatus>,
    #[serde(default)]
    pub url_inteiro_teor: Option<String>,
}

impl PropositionDetails {
    /// Returns the current situation code, if the upstream reported one.
    pub fn situation_code(&self) -> Option<i64> {
        self.status.as_ref().and_then(|s| s.cod_situacao)
    }
}

/// An author (or co-signer) of a bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropositionAuthor {
    pub nome: String,
    #[serde(default)]
    pub cod_tipo: Option<i64>,
    #[serde(default)]
    pub tipo: Option<String>,
    #[serde(default)]
    pub proponente: i32,
    #[serde(default)]
    pub ordem_assinatura: i32,
}

/// Party and state of a sitting deputy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeputySummary {
    #[serde(default)]
    pub id: Option<i64>,
    pub nome: String,
    #[serde(default)]
    pub sigla_partido: Option<String>,
    #[serde(default)]
    pub uri_partido: Option<String>,
    #[serde(default)]
    pub sigla_uf: Option<String>,
}

/// Filters for a bill listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropositionQuery {
    /// Bill type acronym (`PL`, `MPV`, ...).
    pub sigla_tipo: String,
    /// Restrict to bills authored by this deputy.
    pub author_id: Option<i64>,
    /// Restrict to a presentation year. `None` lists every year.
    pub year: Option<i32>,
    pub items: u32,
    pub page: u32,
    /// `ASC` or `DESC`.
    pub order: String,
    pub order_by: String,
}

impl PropositionQuery {
    /// Maps the `ano` request parameter to a year filter.
    ///
    /// Absent means the current year, `0` disables the filter.
    pub fn resolve_year(requested: Option<i32>) -> Option<i32> {
        match requested {
            None => Some(Utc::now().year()),
            Some(0) => None,
            Some(year) => Some(year),
        }
    }
}

/// One page of a bill listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropositionPage {
    pub items: Vec<PropositionSummary>,
    /// Total matches across all pages, from the upstream `x-total-count` header.
    pub total: Option<u64>,
}

/// Source of legislative records.
#[async_trait]
pub trait LegislativeConnector: Connector {
    /// Lists bills matching the query.
    async fn list_propositions(&self, query: &PropositionQuery)
        -> ConnectorResult<PropositionPage>;

    /// Fetches a bill by id.
    async fn get_proposition(&self, id: i64) -> ConnectorResult<PropositionDetails>;

    /// Fetches the authors of a bill.
    async fn get_authors(&self, id: i64) -> ConnectorResult<Vec<PropositionAuthor>>;

    /// Fetches the bills related to (attached to) a bill.
    async fn get_related(&self, id: i64) -> ConnectorResult<Vec<PropositionSummary>>;

    /// Looks up deputies by name.
    async fn find_deputies(&self, name: &str) -> ConnectorResult<Vec<DeputySummary>>;
}

/// Extracts the trailing numeric id from a bill URI.
pub fn proposition_id_from_uri(uri: &str) -> Option<i64> {
    uri.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
}
