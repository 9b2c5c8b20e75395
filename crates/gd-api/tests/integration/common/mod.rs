//! Common test utilities for integration tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, StatusCode},
    Router,
};
use gd_api::{routes, AppState, MasterAccount};
use gd_connectors::{AggregatorConfig, MockLegislativeConnector, PropositionAggregator};
use gd_core::db::{run_migrations, seed_defaults, DbPool, SeedOptions};
use gd_core::{TokenIssuer, TokenSubject, MASTER_USER_ID};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

/// Signing secret shared by every test state.
pub const TEST_SECRET: &str = "integration-secret";

/// Deputy id configured for the legislative endpoints.
pub const DEPUTY_ID: i64 = 204554;

/// Parliamentarian name configured for the legislative endpoints.
pub const PARLIAMENTARIAN: &str = "Fulano de Tal";

/// Creates a migrated and seeded in-memory SQLite database.
pub async fn setup_test_db() -> DbPool {
    let db_url = format!(
        "sqlite:file:integration_test_{}?mode=memory&cache=shared",
        Uuid::new_v4()
    );

    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&db_url)
        .await
        .expect("Failed to create SQLite pool");

    let pool = DbPool::Sqlite(pool);
    run_migrations(&pool).await.expect("Failed to run migrations");
    seed_defaults(&pool, &SeedOptions::for_tests())
        .await
        .expect("Failed to seed database");
    pool
}

/// Master account matching the seeded master user.
pub fn master_account() -> MasterAccount {
    let seed = SeedOptions::for_tests();
    MasterAccount {
        name: seed.master_name,
        email: seed.master_email,
        password: seed.master_password,
    }
}

/// A router plus the pieces tests poke at directly.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub camara: Arc<MockLegislativeConnector>,
}

impl TestApp {
    /// Returns a fresh router clone for one request.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Token for the master account.
    pub fn master_token(&self) -> String {
        self.state
            .tokens
            .issue(&TokenSubject {
                id: MASTER_USER_ID,
                name: &self.state.master.name,
                email: &self.state.master.email,
                level: 1,
            })
            .expect("Failed to issue token")
    }
}

/// Creates the test application.
pub async fn create_test_app() -> TestApp {
    let db = setup_test_db().await;
    let tokens = TokenIssuer::new(TEST_SECRET, Duration::from_secs(3600))
        .expect("Failed to create token issuer");
    let camara = Arc::new(MockLegislativeConnector::new("camara-mock"));
    let propositions = PropositionAggregator::new(
        camara.clone(),
        AggregatorConfig::new(DEPUTY_ID, PARLIAMENTARIAN),
    );

    let state = AppState::new(db, tokens, master_account(), propositions);
    let router = routes::create_router(state.clone());

    TestApp {
        router,
        state,
        camara,
    }
}

fn builder(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let mut builder = axum::extract::Request::builder()
        .method(method)
        .uri(uri)
        .header(header::HOST, "gabinete.test");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder
}

/// Helper to make unauthenticated GET requests.
pub fn get_request(uri: &str) -> axum::extract::Request<Body> {
    builder(Method::GET, uri, None).body(Body::empty()).unwrap()
}

/// Helper to make authenticated GET requests.
pub fn authed_get(uri: &str, token: &str) -> axum::extract::Request<Body> {
    builder(Method::GET, uri, Some(token))
        .body(Body::empty())
        .unwrap()
}

/// Helper to make POST requests with a JSON body.
pub fn post_json_request(uri: &str, token: Option<&str>, body: &Value) -> axum::extract::Request<Body> {
    builder(Method::POST, uri, token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Helper to make authenticated PUT requests with a JSON body.
pub fn put_json_request(uri: &str, token: &str, body: &Value) -> axum::extract::Request<Body> {
    builder(Method::PUT, uri, Some(token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Helper to make authenticated DELETE requests.
pub fn delete_request(uri: &str, token: &str) -> axum::extract::Request<Body> {
    builder(Method::DELETE, uri, Some(token))
        .body(Body::empty())
        .unwrap()
}

/// Sends request and parses JSON response.
pub async fn send_request<T: DeserializeOwned>(
    app: Router,
    request: axum::extract::Request<Body>,
) -> (StatusCode, T) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let parsed: T = serde_json::from_slice(&body).unwrap_or_else(|e| {
        panic!(
            "Failed to parse response: {} - Body: {:?}",
            e,
            String::from_utf8_lossy(&body)
        )
    });
    (status, parsed)
}

/// Sends request and returns raw response body.
pub async fn send_request_raw(
    app: Router,
    request: axum::extract::Request<Body>,
) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8_lossy(&body).to_string())
}

// ============================================================================
// Payload fixtures
// ============================================================================

pub fn user_payload(name: &str, email: &str, password: &str) -> Value {
    json!({
        "usuario_nome": name,
        "usuario_email": email,
        "usuario_telefone": "61999990000",
        "usuario_aniversario": "1990-05-17",
        "usuario_senha": password,
        "usuario_nivel": 2,
        "usuario_ativo": true
    })
}

pub fn organization_payload(name: &str, email: &str, type_id: i64) -> Value {
    json!({
        "orgao_nome": name,
        "orgao_email": email,
        "orgao_municipio": "Brasília",
        "orgao_estado": "DF",
        "orgao_tipo": type_id
    })
}

pub fn person_payload(name: &str, email: &str, organization_id: i64) -> Value {
    json!({
        "pessoa_nome": name,
        "pessoa_email": email,
        "pessoa_aniversario": "1985-07-21",
        "pessoa_municipio": "Goiânia",
        "pessoa_estado": "GO",
        "pessoa_tipo": 1,
        "pessoa_orgao": organization_id
    })
}

/// Creates an organization through the API and returns its id.
pub async fn create_organization(app: &TestApp, name: &str, email: &str) -> i64 {
    let token = app.master_token();
    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        post_json_request(
            "/api/orgaos",
            Some(&token),
            &organization_payload(name, email, 2),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["dados"]["orgao_id"].as_i64().unwrap()
}
