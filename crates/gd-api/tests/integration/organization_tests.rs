//! Organization endpoint integration tests.

use axum::http::StatusCode;
use serde_json::{json, Value};

use super::common::{
    authed_get, create_organization, create_test_app, delete_request, organization_payload,
    person_payload, post_json_request, put_json_request, send_request,
};

#[tokio::test]
async fn test_empty_listing_skips_placeholder() {
    let app = create_test_app().await;
    let token = app.master_token();

    let (status, body): (StatusCode, Value) =
        send_request(app.app(), authed_get("/api/orgaos", &token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Nenhum órgão registrado");
}

#[tokio::test]
async fn test_create_embeds_type_and_creator() {
    let app = create_test_app().await;
    let token = app.master_token();

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        post_json_request(
            "/api/orgaos",
            Some(&token),
            &organization_payload("Prefeitura de Anápolis", "contato@anapolis.go.gov.br", 8),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Órgão criado com sucesso.");
    assert_eq!(body["dados"]["TipoOrgao"]["orgao_tipo_nome"], "Prefeitura");
    assert_eq!(body["dados"]["Usuario"]["usuario_id"], 1000);
    assert_eq!(body["dados"]["orgao_criado_por"], 1000);
}

#[tokio::test]
async fn test_unknown_type_is_conflict() {
    let app = create_test_app().await;
    let token = app.master_token();

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        post_json_request(
            "/api/orgaos",
            Some(&token),
            &organization_payload("Órgão Fantasma", "fantasma@example.com", 9999),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "O tipo de órgão ou ID do usuário está incorreto");
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let app = create_test_app().await;
    create_organization(&app, "Ministério A", "contato@ministerio.gov.br").await;

    let token = app.master_token();
    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        post_json_request(
            "/api/orgaos",
            Some(&token),
            &organization_payload("Ministério B", "contato@ministerio.gov.br", 2),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Esse órgão já está cadastrado");
}

#[tokio::test]
async fn test_missing_required_fields() {
    let app = create_test_app().await;
    let token = app.master_token();

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        post_json_request(
            "/api/orgaos",
            Some(&token),
            &json!({ "orgao_nome": "Sem município", "orgao_email": "a@b.com", "orgao_tipo": 2 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["erros"].get("orgao_municipio").is_some());
    assert!(body["erros"].get("orgao_estado").is_some());
}

#[tokio::test]
async fn test_pagination_links() {
    let app = create_test_app().await;
    for i in 1..=3 {
        create_organization(&app, &format!("Órgão {}", i), &format!("orgao{}@example.com", i))
            .await;
    }
    let token = app.master_token();

    let mut request = authed_get(
        "/api/orgaos?itens=2&pagina=1&ordernarPor=orgao_email",
        &token,
    );
    request
        .headers_mut()
        .insert("X-Forwarded-Proto", "https".parse().unwrap());

    let (status, body): (StatusCode, Value) = send_request(app.app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dados"].as_array().unwrap().len(), 2);
    assert_eq!(
        body["links"]["first"],
        "https://gabinete.test/api/orgaos?itens=2&pagina=1&ordem=ASC&ordernarPor=orgao_email"
    );
    assert_eq!(
        body["links"]["last"],
        "https://gabinete.test/api/orgaos?itens=2&pagina=2&ordem=ASC&ordernarPor=orgao_email"
    );
}

#[tokio::test]
async fn test_invalid_order_is_rejected() {
    let app = create_test_app().await;
    let token = app.master_token();

    let (status, body): (StatusCode, Value) =
        send_request(app.app(), authed_get("/api/orgaos?ordem=random", &token)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Parametro 'ordem' inválido");
}

#[tokio::test]
async fn test_search_by_name() {
    let app = create_test_app().await;
    create_organization(&app, "Prefeitura de Goiânia", "pref@goiania.go.gov.br").await;
    create_organization(&app, "Câmara de Goiânia", "camara@goiania.go.gov.br").await;
    let token = app.master_token();

    let (status, body): (StatusCode, Value) =
        send_request(app.app(), authed_get("/api/orgaosBusca?nome=prefeitura", &token)).await;
    assert_eq!(status, StatusCode::OK);
    let found = body["dados"].as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["orgao_nome"], "Prefeitura de Goiânia");

    let (status, body): (StatusCode, Value) =
        send_request(app.app(), authed_get("/api/orgaosBusca?nome=%25", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dados"], json!([]));

    let (status, _): (StatusCode, Value) =
        send_request(app.app(), authed_get("/api/orgaosBusca", &token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_ignores_case_of_accented_letters() {
    let app = create_test_app().await;
    create_organization(&app, "Órgão Municipal", "orgao@example.com").await;
    let token = app.master_token();

    // nome=órgão
    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        authed_get("/api/orgaosBusca?nome=%C3%B3rg%C3%A3o", &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let found = body["dados"].as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["orgao_nome"], "Órgão Municipal");
}

#[tokio::test]
async fn test_update_organization() {
    let app = create_test_app().await;
    let id = create_organization(&app, "Ministério", "min@example.com").await;
    let token = app.master_token();
    let uri = format!("/api/orgaos/{}", id);

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        put_json_request(&uri, &token, &json!({ "orgao_tipo": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dados"]["TipoOrgao"]["orgao_tipo_id"], 3);

    let (status, _): (StatusCode, Value) = send_request(
        app.app(),
        put_json_request(&uri, &token, &json!({ "orgao_tipo": 9999 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        put_json_request("/api/orgaos/9999", &token, &json!({ "orgao_nome": "X" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Órgão não encontrado ou nenhum dado atualizado");
}

#[tokio::test]
async fn test_delete_referenced_organization_conflicts() {
    let app = create_test_app().await;
    let id = create_organization(&app, "Ministério", "min@example.com").await;
    let token = app.master_token();

    let (status, _): (StatusCode, Value) = send_request(
        app.app(),
        post_json_request(
            "/api/pessoas",
            Some(&token),
            &person_payload("João", "joao@example.com", id),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/api/orgaos/{}", id);
    let (status, body): (StatusCode, Value) =
        send_request(app.app(), delete_request(&uri, &token)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"],
        "Não é possível apagar o órgão porque ele está referenciado em outras tabelas."
    );

    let (status, _): (StatusCode, Value) =
        send_request(app.app(), delete_request("/api/orgaos/1", &token)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_organization() {
    let app = create_test_app().await;
    let id = create_organization(&app, "Ministério", "min@example.com").await;
    let token = app.master_token();
    let uri = format!("/api/orgaos/{}", id);

    let (status, body): (StatusCode, Value) =
        send_request(app.app(), delete_request(&uri, &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Órgão apagado com sucesso");

    let (status, _): (StatusCode, Value) = send_request(app.app(), authed_get(&uri, &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
