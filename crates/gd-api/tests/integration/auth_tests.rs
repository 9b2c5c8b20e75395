//! Authentication integration tests.

use axum::http::StatusCode;
use chrono::Utc;
use gd_core::{Claims, TokenIssuer};
use serde_json::{json, Value};
use std::time::Duration;

use super::common::{
    authed_get, create_test_app, get_request, post_json_request, put_json_request, send_request,
    user_payload, TEST_SECRET,
};

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let app = create_test_app().await;

    let (status, body): (StatusCode, Value) =
        send_request(app.app(), get_request("/api/orgaos")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);
    assert_eq!(body["message"], "Token não fornecido.");
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let app = create_test_app().await;

    let (status, body): (StatusCode, Value) =
        send_request(app.app(), authed_get("/api/pessoas", "not.a.token")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token inválido.");
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let app = create_test_app().await;
    let other = TokenIssuer::new("another-secret", Duration::from_secs(60)).unwrap();
    let token = other
        .issue(&gd_core::TokenSubject {
            id: 1000,
            name: "Intruso",
            email: "x@example.com",
            level: 1,
        })
        .unwrap();

    let (status, _body): (StatusCode, Value) =
        send_request(app.app(), authed_get("/api/usuarios", &token)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = create_test_app().await;
    let issuer = TokenIssuer::new(TEST_SECRET, Duration::from_secs(60)).unwrap();
    let token = issuer
        .sign(&Claims {
            usuario_id: 1000,
            usuario_nome: "Administrador".to_string(),
            usuario_email: "admin@gabinete.local".to_string(),
            usuario_nivel: 1,
            exp: Utc::now().timestamp() - 120,
        })
        .unwrap();

    let (status, body): (StatusCode, Value) =
        send_request(app.app(), authed_get("/api/orgaos", &token)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token expirado.");
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let app = create_test_app().await;

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        post_json_request("/api/login", None, &json!({ "email": "admin@gabinete.local" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Campos obrigatórios não enviados.");
}

#[tokio::test]
async fn test_login_rejects_malformed_json() {
    let app = create_test_app().await;
    let request = axum::extract::Request::builder()
        .method("POST")
        .uri("/api/login")
        .header("Content-Type", "application/json")
        .body(axum::body::Body::from("{\"email\":"))
        .unwrap();

    let (status, body): (StatusCode, Value) = send_request(app.app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "JSON malformado");
}

#[tokio::test]
async fn test_master_login_issues_token() {
    let app = create_test_app().await;

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        post_json_request(
            "/api/login",
            None,
            &json!({ "email": "admin@gabinete.local", "senha": "admin-test" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login bem-sucedido.");

    let claims = app.state.tokens.verify(body["token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.usuario_id, 1000);
    assert_eq!(claims.usuario_nivel, 1);
}

#[tokio::test]
async fn test_login_unknown_email() {
    let app = create_test_app().await;

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        post_json_request(
            "/api/login",
            None,
            &json!({ "email": "ninguem@example.com", "senha": "x" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Usuário não encontrado.");
}

#[tokio::test]
async fn test_user_login_outcomes() {
    let app = create_test_app().await;
    let token = app.master_token();

    let (status, created): (StatusCode, Value) = send_request(
        app.app(),
        post_json_request(
            "/api/usuarios",
            Some(&token),
            &user_payload("Maria", "maria@example.com", "s3nha-forte"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let user_id = created["dados"]["usuario_id"].as_i64().unwrap();

    let login = |senha: &str| {
        post_json_request(
            "/api/login",
            None,
            &json!({ "email": "maria@example.com", "senha": senha }),
        )
    };

    let (status, body): (StatusCode, Value) = send_request(app.app(), login("errada")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Senha incorreta.");

    let (status, body): (StatusCode, Value) = send_request(app.app(), login("s3nha-forte")).await;
    assert_eq!(status, StatusCode::OK);
    let claims = app.state.tokens.verify(body["token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.usuario_id, user_id);
    assert_eq!(claims.usuario_nivel, 2);

    let (status, _): (StatusCode, Value) = send_request(
        app.app(),
        put_json_request(
            &format!("/api/usuarios/{}", user_id),
            &token,
            &json!({ "usuario_ativo": false }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body): (StatusCode, Value) = send_request(app.app(), login("s3nha-forte")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Usuário desativado.");
}

#[tokio::test]
async fn test_sync_requires_token_and_is_idempotent() {
    let app = create_test_app().await;

    let (status, _): (StatusCode, Value) = send_request(app.app(), get_request("/api/sync")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = app.master_token();
    for _ in 0..2 {
        let (status, body): (StatusCode, Value) =
            send_request(app.app(), authed_get("/api/sync", &token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Tabelas sincronizadas com sucesso");
    }
}
