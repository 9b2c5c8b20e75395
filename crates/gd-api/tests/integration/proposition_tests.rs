//! Legislative endpoint integration tests against the mock Câmara source.

use axum::http::StatusCode;
use gd_connectors::{
    ConnectorError, DeputySummary, MockBehavior, MockLegislativeConnector as Mock,
    PropositionSummary,
};
use serde_json::Value;

use super::common::{authed_get, create_test_app, get_request, send_request, DEPUTY_ID, PARLIAMENTARIAN};

fn related(id: i64, sigla: &str) -> PropositionSummary {
    PropositionSummary {
        id,
        uri: None,
        sigla_tipo: sigla.to_string(),
        numero: id,
        ano: 2023,
        ementa: String::new(),
    }
}

#[tokio::test]
async fn test_propositions_require_token() {
    let app = create_test_app().await;

    let (status, _): (StatusCode, Value) =
        send_request(app.app(), get_request("/api/proposicoes")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.camara.get_call_count(), 0);
}

#[tokio::test]
async fn test_list_propositions_aggregates_details() {
    let app = create_test_app().await;
    app.camara
        .add_proposition(
            Mock::proposition(101, "PL", 12, 2023, Some(1140)),
            vec![Mock::author(PARLIAMENTARIAN, 10000, 1, 1)],
        )
        .await;
    app.camara
        .add_proposition(
            Mock::proposition(102, "PL", 13, 2023, Some(923)),
            vec![
                Mock::author(PARLIAMENTARIAN, 10000, 1, 1),
                Mock::author("Beltrano", 10000, 1, 2),
            ],
        )
        .await;
    let token = app.master_token();

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        authed_get("/api/proposicoes?ano=2023&itens=1", &token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let items = body["dados"].as_array().unwrap();
    assert_eq!(items.len(), 1);

    // Default order is DESC by id.
    let item = &items[0];
    assert_eq!(item["proposicao_id"], 102);
    assert_eq!(item["proposicao_titulo"], "PL 13/2023");
    assert_eq!(item["proposicao_autoria_unica"], false);
    assert_eq!(item["proposicao_detalhes"]["arquivado"], true);
    assert_eq!(item["proposicao_detalhes"]["transformada_em_lei"], false);
    assert_eq!(item["proposicao_autores"].as_array().unwrap().len(), 2);

    assert_eq!(
        body["links"]["last"],
        format!(
            "http://gabinete.test/api/proposicoes?autor={}&itens=1&pagina=2&tipo=PL&ordem=DESC&ordenarPor=id&ano=2023",
            DEPUTY_ID
        )
    );

    let query = app.camara.last_query().await.unwrap();
    assert_eq!(query.author_id, Some(DEPUTY_ID));
    assert_eq!(query.year, Some(2023));
}

#[tokio::test]
async fn test_sole_authorship_omits_authors() {
    let app = create_test_app().await;
    app.camara
        .add_proposition(
            Mock::proposition(101, "PL", 12, 2023, Some(1140)),
            vec![Mock::author(PARLIAMENTARIAN, 10000, 1, 1)],
        )
        .await;
    let token = app.master_token();

    let (_, body): (StatusCode, Value) =
        send_request(app.app(), authed_get("/api/proposicoes?ano=2023", &token)).await;

    let item = &body["dados"][0];
    assert_eq!(item["proposicao_autoria_unica"], true);
    assert_eq!(item["proposicao_detalhes"]["transformada_em_lei"], true);
    assert!(item.get("proposicao_autores").is_none());
}

#[tokio::test]
async fn test_empty_listing_message() {
    let app = create_test_app().await;
    let token = app.master_token();

    let (status, body): (StatusCode, Value) =
        send_request(app.app(), authed_get("/api/proposicoes?ano=0", &token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Nenhuma proposição encontrada.");
    assert_eq!(app.camara.last_query().await.unwrap().year, None);
}

#[tokio::test]
async fn test_invalid_type_is_rejected_before_upstream() {
    let app = create_test_app().await;
    let token = app.master_token();

    let (status, body): (StatusCode, Value) =
        send_request(app.app(), authed_get("/api/proposicoes?tipo=PL%26x%3D1", &token)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Parametro 'tipo' inválido");
    assert_eq!(app.camara.get_call_count(), 0);
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let app = create_test_app().await;
    app.camara
        .set_behavior(MockBehavior::AlwaysFail(ConnectorError::Timeout(
            "30s".to_string(),
        )))
        .await;
    let token = app.master_token();

    let (status, body): (StatusCode, Value) =
        send_request(app.app(), authed_get("/api/proposicoes", &token)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["status"], 502);
    assert_eq!(
        body["message"],
        "Erro ao consultar a API da Câmara dos Deputados"
    );
}

#[tokio::test]
async fn test_main_proposition_follows_chain() {
    let app = create_test_app().await;
    let uri = |id: i64| format!("https://dadosabertos.camara.leg.br/api/v2/proposicoes/{}", id);

    let mut leaf = Mock::proposition(3, "PL", 3, 2023, None);
    leaf.uri_prop_principal = Some(uri(2));
    let mut middle = Mock::proposition(2, "PL", 2, 2022, None);
    middle.uri_prop_principal = Some(uri(1));
    let root = Mock::proposition(1, "PL", 1, 2021, Some(1140));

    app.camara.add_proposition(leaf, vec![]).await;
    app.camara.add_proposition(middle, vec![]).await;
    app.camara
        .add_proposition(root, vec![Mock::author("Beltrano", 10000, 1, 1)])
        .await;
    let token = app.master_token();

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        authed_get("/api/proposicao-principal?id=3", &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dados"]["proposicao_id"], 1);
    assert_eq!(body["dados"]["proposicao_titulo"], "PL 1/2021");
    assert_eq!(body["dados"]["proposicao_autores"][0]["nome"], "Beltrano");

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        authed_get("/api/proposicao-principal?id=1", &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dados"], serde_json::json!([]));
}

#[tokio::test]
async fn test_main_proposition_cycle_is_bad_gateway() {
    let app = create_test_app().await;
    let uri = |id: i64| format!("https://dadosabertos.camara.leg.br/api/v2/proposicoes/{}", id);

    let mut a = Mock::proposition(1, "PL", 1, 2023, None);
    a.uri_prop_principal = Some(uri(2));
    let mut b = Mock::proposition(2, "PL", 2, 2023, None);
    b.uri_prop_principal = Some(uri(1));
    app.camara.add_proposition(a, vec![]).await;
    app.camara.add_proposition(b, vec![]).await;
    let token = app.master_token();

    let (status, _): (StatusCode, Value) = send_request(
        app.app(),
        authed_get("/api/proposicao-principal?id=1", &token),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_unknown_proposition_is_not_found() {
    let app = create_test_app().await;
    let token = app.master_token();

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        authed_get("/api/proposicao-principal?id=404", &token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Proposição não encontrada.");

    let (status, _): (StatusCode, Value) = send_request(
        app.app(),
        authed_get("/api/proposicao-principal?id=abc", &token),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_attached_filters_by_type_and_author() {
    let app = create_test_app().await;
    app.camara
        .add_proposition(
            Mock::proposition(11, "PL", 11, 2023, None),
            vec![Mock::author(PARLIAMENTARIAN, 10000, 1, 1)],
        )
        .await;
    app.camara
        .add_proposition(
            Mock::proposition(12, "PL", 12, 2023, None),
            vec![Mock::author("Beltrano", 10000, 1, 1)],
        )
        .await;
    app.camara
        .add_proposition(
            Mock::proposition(13, "REQ", 13, 2023, None),
            vec![Mock::author(PARLIAMENTARIAN, 10000, 1, 1)],
        )
        .await;
    app.camara
        .set_related(10, vec![related(11, "PL"), related(12, "PL"), related(13, "REQ")])
        .await;
    let token = app.master_token();

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        authed_get("/api/proposicao-apensados?id=10", &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let attached = body["dados"].as_array().unwrap();
    assert_eq!(attached.len(), 1);
    assert_eq!(attached[0]["apensado_id"], 11);
    assert_eq!(attached[0]["proposicao_principal"], 10);

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        authed_get("/api/proposicao-apensados?id=99", &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Nenhuma proposição encontrada.");
}

#[tokio::test]
async fn test_authors_include_deputy_party() {
    let app = create_test_app().await;
    app.camara
        .add_proposition(
            Mock::proposition(20, "PL", 20, 2023, None),
            vec![
                Mock::author(PARLIAMENTARIAN, 10000, 1, 1),
                Mock::author("Senado Federal", 2, 1, 2),
            ],
        )
        .await;
    app.camara
        .add_deputy(DeputySummary {
            id: Some(DEPUTY_ID),
            nome: PARLIAMENTARIAN.to_string(),
            sigla_partido: Some("ABC".to_string()),
            uri_partido: Some("https://dadosabertos.camara.leg.br/api/v2/partidos/1".to_string()),
            sigla_uf: Some("GO".to_string()),
        })
        .await;
    let token = app.master_token();

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        authed_get("/api/proposicao-autores?id=20", &token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Autores encontrados");
    let authors = body["dados"].as_array().unwrap();
    assert_eq!(authors[0]["siglaPartido"], "ABC");
    assert_eq!(authors[0]["siglaUf"], "GO");
    assert!(authors[1]["siglaPartido"].is_null());
}

#[tokio::test]
async fn test_provisional_measures_ignore_author() {
    let app = create_test_app().await;
    app.camara
        .add_proposition(Mock::proposition(30, "MPV", 1154, 2023, None), vec![])
        .await;
    let token = app.master_token();

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        authed_get("/api/medidas-provisorias?ano=2023&autor=5", &token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dados"][0]["proposicao_titulo"], "MPV 1154/2023");
    assert!(body["links"]["first"]
        .as_str()
        .unwrap()
        .starts_with("http://gabinete.test/api/medidas-provisorias?ano=2023&itens=10&pagina=1"));

    let query = app.camara.last_query().await.unwrap();
    assert_eq!(query.sigla_tipo, "MPV");
    assert_eq!(query.author_id, None);
}

#[tokio::test]
async fn test_unknown_order_lists_newest_first() {
    let app = create_test_app().await;
    for id in [201, 202] {
        app.camara
            .add_proposition(Mock::proposition(id, "PL", id, 2023, None), vec![])
            .await;
    }
    let token = app.master_token();

    let (status, body): (StatusCode, Value) = send_request(
        app.app(),
        authed_get("/api/proposicoes?ano=2023&ordem=decrescente", &token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dados"][0]["proposicao_id"], 202);
    assert_eq!(app.camara.last_query().await.unwrap().order, "DESC");
}
