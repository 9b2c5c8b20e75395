//! Person endpoint integration tests.

use axum::http::StatusCode;
use serde_json::{json, Value};

use super::common::{
    authed_get, create_organization, create_test_app, delete_request, person_payload,
    post_json_request, put_json_request, send_request,
};

#[tokio::test]
async fn test_person_lifecycle() {
    let app = create_test_app().await;
    let organization_id = create_organization(&app, "Ministério", "min@example.com").await;
    let token = app.master_token();

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        post_json_request(
            "/api/pessoas",
            Some(&token),
            &person_payload("João da Silva", "joao@example.com", organization_id),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Pessoa criada com sucesso.");
    assert_eq!(body["dados"]["pessoa_aniversario"], "1985-07-21");
    assert_eq!(body["dados"]["Orgao"]["orgao_id"], organization_id);
    assert_eq!(body["dados"]["pessoa_criada_por"], 1000);

    let uri = format!("/api/pessoas/{}", body["dados"]["pessoa_id"]);

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        put_json_request(&uri, &token, &json!({ "pessoa_cargo": "Assessor" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Pessoa atualizada com sucesso.");
    assert_eq!(body["dados"]["pessoa_cargo"], "Assessor");

    let (status, body): (StatusCode, Value) = send_request(app.app(), authed_get(&uri, &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dados"]["pessoa_nome"], "João da Silva");

    let (status, _): (StatusCode, Value) =
        send_request(app.app(), delete_request(&uri, &token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body): (StatusCode, Value) = send_request(app.app(), authed_get(&uri, &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Pessoa não encontrada");
}

#[tokio::test]
async fn test_bad_references_conflict() {
    let app = create_test_app().await;
    let token = app.master_token();

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        post_json_request(
            "/api/pessoas",
            Some(&token),
            &person_payload("Maria", "maria@example.com", 4242),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"],
        "O tipo de pessoa, órgão ou ID do usuário está incorreto"
    );
}

#[tokio::test]
async fn test_duplicate_person_email() {
    let app = create_test_app().await;
    let token = app.master_token();
    let payload = person_payload("Maria", "maria@example.com", 1);

    let (status, _): (StatusCode, Value) = send_request(
        app.app(),
        post_json_request("/api/pessoas", Some(&token), &payload),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        post_json_request("/api/pessoas", Some(&token), &payload),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Essa pessoa já está cadastrada");
}

#[tokio::test]
async fn test_invalid_birthday_is_rejected() {
    let app = create_test_app().await;
    let token = app.master_token();
    let mut payload = person_payload("Maria", "maria@example.com", 1);
    payload["pessoa_aniversario"] = json!("21/07/1985");

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        post_json_request("/api/pessoas", Some(&token), &payload),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["erros"].get("pessoa_aniversario").is_some());
}

#[tokio::test]
async fn test_list_and_search_persons() {
    let app = create_test_app().await;
    let token = app.master_token();

    for (name, email) in [
        ("Ana Souza", "ana@example.com"),
        ("Bruno Lima", "bruno@example.com"),
        ("Ana_Clara", "anaclara@example.com"),
    ] {
        let (status, _): (StatusCode, Value) = send_request(
            app.app(),
            post_json_request("/api/pessoas", Some(&token), &person_payload(name, email, 1)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        authed_get("/api/pessoas?ordernarPor=pessoa_email&ordem=DESC", &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "3 pessoa(s) encontrado(s)");
    assert_eq!(body["dados"][0]["pessoa_email"], "bruno@example.com");

    let (status, body): (StatusCode, Value) =
        send_request(app.app(), authed_get("/api/pessoaBusca?nome=ana", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dados"].as_array().unwrap().len(), 2);

    // `_` is a literal, not a single-character wildcard.
    let (status, body): (StatusCode, Value) =
        send_request(app.app(), authed_get("/api/pessoaBusca?nome=a_c", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dados"].as_array().unwrap().len(), 1);
}
