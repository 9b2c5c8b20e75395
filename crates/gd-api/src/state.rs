//! Application state shared across handlers.

use gd_connectors::PropositionAggregator;
use gd_core::db::{DbPool, SeedOptions};
use gd_core::TokenIssuer;
use std::sync::Arc;
use tracing::info;

/// Master account provisioned from configuration.
#[derive(Clone)]
pub struct MasterAccount {
    pub name: String,
    pub email: String,
    /// Plain text password. Login with the master credentials is disabled when unset.
    pub password: Option<String>,
}

impl std::fmt::Debug for MasterAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterAccount")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

impl MasterAccount {
    /// Returns true when `email` and `password` match the configured master account.
    pub fn matches(&self, email: &str, password: &str) -> bool {
        match &self.password {
            Some(expected) if !expected.is_empty() => {
                self.email == email && expected.as_str() == password
            }
            _ => false,
        }
    }

    /// Seed settings that provision this account in the database.
    pub fn seed_options(&self) -> SeedOptions {
        SeedOptions {
            master_name: self.name.clone(),
            master_email: self.email.clone(),
            master_password: self.password.clone(),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DbPool>,
    /// Access token issuer and verifier.
    pub tokens: Arc<TokenIssuer>,
    /// Master account credentials.
    pub master: Arc<MasterAccount>,
    /// Legislative data aggregation.
    pub propositions: Arc<PropositionAggregator>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        db: DbPool,
        tokens: TokenIssuer,
        master: MasterAccount,
        propositions: PropositionAggregator,
    ) -> Self {
        info!(
            database = db.db_type(),
            token_ttl_secs = tokens.ttl().as_secs(),
            "Application state initialized"
        );

        Self {
            db: Arc::new(db),
            tokens: Arc::new(tokens),
            master: Arc::new(master),
            propositions: Arc::new(propositions),
        }
    }
}
