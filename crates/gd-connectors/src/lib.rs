//! # gd-connectors
//!
//! Upstream connectors for Gabinete Digital.
//!
//! This crate provides the connector traits, a retrying HTTP client and the
//! Câmara dos Deputados open-data integration used by the legislative
//! endpoints.

pub mod http;
pub mod legislative;
pub mod traits;

pub use traits::{
    proposition_id_from_uri, Connector, ConnectorConfig, ConnectorError, ConnectorHealth,
    ConnectorResult, DeputySummary, LegislativeConnector, PropositionAuthor, PropositionDetails,
    PropositionPage, PropositionQuery, PropositionStatus, PropositionSummary,
};

pub use legislative::{
    AggregatorConfig, CamaraConnector, MockBehavior, MockLegislativeConnector,
    PropositionAggregator, DEFAULT_CAMARA_URL,
};
