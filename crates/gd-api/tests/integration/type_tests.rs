//! Organization and person type catalog integration tests.

use axum::http::StatusCode;
use serde_json::{json, Value};

use super::common::{
    authed_get, create_test_app, delete_request, organization_payload, post_json_request,
    send_request,
};

#[tokio::test]
async fn test_seeded_catalogs_are_listed() {
    let app = create_test_app().await;
    let token = app.master_token();

    for path in ["/api/tipos-orgaos", "/api/tipos-pessoas"] {
        let (status, body): (StatusCode, Value) =
            send_request(app.app(), authed_get(path, &token)).await;
        assert_eq!(status, StatusCode::OK, "{}", path);
        assert!(!body["dados"].as_array().unwrap().is_empty(), "{}", path);
    }
}

#[tokio::test]
async fn test_organization_type_lifecycle() {
    let app = create_test_app().await;
    let token = app.master_token();

    let payload = json!({
        "orgao_tipo_nome": "Consórcio Intermunicipal",
        "orgao_tipo_descricao": "Consórcio público entre municípios"
    });

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        post_json_request("/api/tipos-orgaos", Some(&token), &payload),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Tipo de órgão criado com sucesso.");
    let type_id = body["dados"]["orgao_tipo_id"].as_i64().unwrap();

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        post_json_request("/api/tipos-orgaos", Some(&token), &payload),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Esse tipo de órgão já está cadastrado");

    let (status, _): (StatusCode, Value) = send_request(
        app.app(),
        post_json_request(
            "/api/orgaos",
            Some(&token),
            &organization_payload("Consórcio Norte", "norte@example.com", type_id),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/api/tipos-orgaos/{}", type_id);
    let (status, body): (StatusCode, Value) =
        send_request(app.app(), delete_request(&uri, &token)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"],
        "Não é possível apagar esse tipo de órgão porque ele está referenciado em outras tabelas."
    );
}

#[tokio::test]
async fn test_person_type_requires_description() {
    let app = create_test_app().await;
    let token = app.master_token();

    let (status, _): (StatusCode, Value) = send_request(
        app.app(),
        post_json_request(
            "/api/tipos-pessoas",
            Some(&token),
            &json!({ "tipo_pessoa_nome": "Liderança" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_person_type_delete() {
    let app = create_test_app().await;
    let token = app.master_token();

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        post_json_request(
            "/api/tipos-pessoas",
            Some(&token),
            &json!({ "tipo_pessoa_nome": "Liderança", "tipo_pessoa_descricao": "Liderança comunitária" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/tipos-pessoas/{}", body["dados"]["tipo_pessoa_id"]);

    let (status, body): (StatusCode, Value) =
        send_request(app.app(), delete_request(&uri, &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Tipo de pessoa apagado com sucesso");

    let (status, _): (StatusCode, Value) =
        send_request(app.app(), delete_request(&uri, &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
