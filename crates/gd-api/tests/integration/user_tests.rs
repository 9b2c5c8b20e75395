//! User endpoint integration tests.

use axum::http::StatusCode;
use serde_json::{json, Value};

use super::common::{
    authed_get, create_test_app, delete_request, post_json_request, put_json_request,
    send_request, user_payload,
};

#[tokio::test]
async fn test_create_user_hides_password() {
    let app = create_test_app().await;
    let token = app.master_token();

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        post_json_request(
            "/api/usuarios",
            Some(&token),
            &user_payload("Maria", "maria@example.com", "s3nha"),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], 201);
    assert_eq!(body["message"], "Usuário criado com sucesso.");
    assert_eq!(body["dados"]["usuario_nome"], "Maria");
    assert!(body["dados"].get("usuario_senha").is_none());
    assert!(!body.to_string().contains("argon2"));
}

#[tokio::test]
async fn test_create_user_missing_fields() {
    let app = create_test_app().await;
    let token = app.master_token();

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        post_json_request(
            "/api/usuarios",
            Some(&token),
            &json!({ "usuario_nome": "Sem Email" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Todos os campos obrigatórios devem ser preenchidos"
    );
    assert!(body["erros"].get("usuario_email").is_some());
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let app = create_test_app().await;
    let token = app.master_token();
    let payload = user_payload("Maria", "maria@example.com", "s3nha");

    let (status, _): (StatusCode, Value) = send_request(
        app.app(),
        post_json_request("/api/usuarios", Some(&token), &payload),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        post_json_request("/api/usuarios", Some(&token), &payload),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Esse usuário já está cadastrado");
}

#[tokio::test]
async fn test_list_excludes_master_and_paginates() {
    let app = create_test_app().await;
    let token = app.master_token();

    let (status, body): (StatusCode, Value) =
        send_request(app.app(), authed_get("/api/usuarios", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Nenhum usuário registrado");
    assert!(body.get("dados").is_none());

    for (name, email) in [("Ana", "ana@example.com"), ("Bruno", "bruno@example.com"), ("Carla", "carla@example.com")] {
        let (status, _): (StatusCode, Value) = send_request(
            app.app(),
            post_json_request("/api/usuarios", Some(&token), &user_payload(name, email, "x")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        authed_get("/api/usuarios?itens=2&pagina=2&ordem=desc", &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "3 usuário(s) encontrado(s)");

    let names: Vec<&str> = body["dados"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["usuario_nome"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Ana"]);

    assert_eq!(
        body["links"]["last"],
        "http://gabinete.test/api/usuarios?itens=2&pagina=2&ordem=DESC&ordernarPor=usuario_nome"
    );
}

#[tokio::test]
async fn test_list_rejects_unknown_sort_column() {
    let app = create_test_app().await;
    let token = app.master_token();

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        authed_get("/api/usuarios?ordernarPor=usuario_senha", &token),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Parametro 'ordenarPor' inválido");
}

#[tokio::test]
async fn test_get_user_id_validation() {
    let app = create_test_app().await;
    let token = app.master_token();

    let (status, _): (StatusCode, Value) =
        send_request(app.app(), authed_get("/api/usuarios/abc", &token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body): (StatusCode, Value) =
        send_request(app.app(), authed_get("/api/usuarios/999", &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Usuário não encontrado");

    let (status, _): (StatusCode, Value) =
        send_request(app.app(), authed_get("/api/usuarios/1000", &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_and_delete_user() {
    let app = create_test_app().await;
    let token = app.master_token();

    let (_, created): (StatusCode, Value) = send_request(
        app.app(),
        post_json_request(
            "/api/usuarios",
            Some(&token),
            &user_payload("Maria", "maria@example.com", "x"),
        ),
    )
    .await;
    let uri = format!("/api/usuarios/{}", created["dados"]["usuario_id"]);

    let (status, _): (StatusCode, Value) =
        send_request(app.app(), put_json_request(&uri, &token, &json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        put_json_request(&uri, &token, &json!({ "usuario_telefone": "6133334444" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dados"]["usuario_telefone"], "6133334444");

    let (status, body): (StatusCode, Value) =
        send_request(app.app(), delete_request(&uri, &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Usuário apagado com sucesso");

    let (status, _): (StatusCode, Value) =
        send_request(app.app(), delete_request(&uri, &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _): (StatusCode, Value) = send_request(
        app.app(),
        put_json_request(&uri, &token, &json!({ "usuario_nome": "Outra" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
