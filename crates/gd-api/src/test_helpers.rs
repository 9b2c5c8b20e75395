//! Shared test helpers for the gd-api crate.
//!
//! Builds an application state over an isolated in-memory SQLite database
//! and a mock legislative source.

use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use gd_connectors::{AggregatorConfig, MockLegislativeConnector, PropositionAggregator};
use gd_core::db::{run_migrations, seed_defaults, DbPool, SeedOptions};
use gd_core::{TokenIssuer, TokenSubject, MASTER_USER_ID};

use crate::state::{AppState, MasterAccount};

/// Signing secret used by test states.
pub const TEST_SECRET: &str = "gabinete-test-secret";

/// Creates a migrated and seeded in-memory SQLite pool.
///
/// Each call uses a unique database name so parallel tests stay isolated.
pub async fn setup_test_db() -> DbPool {
    let url = format!("sqlite:file:gd_api_{}?mode=memory&cache=shared", Uuid::new_v4());
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("Failed to create SQLite pool");

    let pool = DbPool::Sqlite(pool);
    run_migrations(&pool).await.expect("Failed to run migrations");
    seed_defaults(&pool, &SeedOptions::for_tests())
        .await
        .expect("Failed to seed database");
    pool
}

/// Master account matching [`SeedOptions::for_tests`].
pub fn test_master() -> MasterAccount {
    let seed = SeedOptions::for_tests();
    MasterAccount {
        name: seed.master_name,
        email: seed.master_email,
        password: seed.master_password,
    }
}

/// Creates a state backed by the given mock legislative source.
pub async fn create_test_state_with(source: Arc<MockLegislativeConnector>) -> AppState {
    let db = setup_test_db().await;
    let tokens = TokenIssuer::new(TEST_SECRET, Duration::from_secs(3600))
        .expect("Failed to create token issuer");
    let propositions = PropositionAggregator::new(source, AggregatorConfig::new(204554, "Fulano"));

    AppState::new(db, tokens, test_master(), propositions)
}

/// Creates a state with an empty mock legislative source.
pub async fn create_test_state() -> AppState {
    create_test_state_with(Arc::new(MockLegislativeConnector::new("camara-mock"))).await
}

/// Issues a master token for the given state.
pub fn master_token(state: &AppState) -> String {
    state
        .tokens
        .issue(&TokenSubject {
            id: MASTER_USER_ID,
            name: &state.master.name,
            email: &state.master.email,
            level: 1,
        })
        .expect("Failed to issue token")
}
