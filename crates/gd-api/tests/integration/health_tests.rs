//! Banner, health and fallback integration tests.

use axum::http::StatusCode;
use serde_json::Value;

use super::common::{create_test_app, get_request, send_request};

#[tokio::test]
async fn test_health_endpoint_reports_database() {
    let app = create_test_app().await;

    let (status, body): (StatusCode, Value) = send_request(app.app(), get_request("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"]["connected"], true);
    assert_eq!(body["database"]["backend"], "sqlite");
}

#[tokio::test]
async fn test_banner_needs_no_token() {
    for path in ["/", "/api"] {
        let app = create_test_app().await;
        let (status, body): (StatusCode, Value) = send_request(app.app(), get_request(path)).await;

        assert_eq!(status, StatusCode::OK, "{}", path);
        assert_eq!(body["status"], 200);
        assert_eq!(body["message"], "API em funcionamento");
    }
}

#[tokio::test]
async fn test_unknown_route_is_enveloped_404() {
    let app = create_test_app().await;

    let (status, body): (StatusCode, Value) =
        send_request(app.app(), get_request("/api/nao-existe")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
    assert_eq!(body["message"], "Endpoint não encontrado");
}
