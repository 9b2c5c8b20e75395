//! Câmara dos Deputados open-data connector.
//!
//! Wraps the public REST API (`/api/v2`). Every payload is returned inside a
//! `{"dados": ...}` envelope; listings report their total size in the
//! `x-total-count` response header.

use crate::http::{header_u64, HttpClient};
use crate::traits::{
    Connector, ConnectorConfig, ConnectorError, ConnectorHealth, ConnectorResult, DeputySummary,
    LegislativeConnector, PropositionAuthor, PropositionDetails, PropositionPage,
    PropositionQuery, PropositionSummary,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, instrument};

/// Public endpoint of the Câmara open-data API.
pub const DEFAULT_CAMARA_URL: &str = "https://dadosabertos.camara.leg.br/api/v2";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    dados: T,
}

/// Connector for the Câmara dos Deputados open-data API.
pub struct CamaraConnector {
    config: ConnectorConfig,
    client: HttpClient,
}

impl CamaraConnector {
    /// Creates a new Câmara connector.
    pub fn new(config: ConnectorConfig) -> ConnectorResult<Self> {
        let client = HttpClient::new(config.clone())?;
        info!(base_url = %config.base_url, "Câmara connector initialized");
        Ok(Self { config, client })
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> ConnectorResult<T> {
        let envelope: Envelope<T> = self.client.get_json(path).await?;
        Ok(envelope.dados)
    }
}

/// Builds the query string for `/proposicoes`.
pub(crate) fn listing_params(query: &PropositionQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![("siglaTipo", query.sigla_tipo.clone())];
    if let Some(author) = query.author_id {
        params.push(("idDeputadoAutor", author.to_string()));
    }
    if let Some(year) = query.year {
        params.push(("ano", year.to_string()));
    }
    params.push(("itens", query.items.to_string()));
    params.push(("pagina", query.page.to_string()));
    params.push(("ordem", query.order.clone()));
    params.push(("ordenarPor", query.order_by.clone()));
    params
}

#[async_trait]
impl Connector for CamaraConnector {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn connector_type(&self) -> &str {
        "legislative"
    }

    fn capabilities(&self) -> Vec<String> {
        vec![
            "health_check".to_string(),
            "test_connection".to_string(),
            "list_propositions".to_string(),
            "get_proposition".to_string(),
            "get_authors".to_string(),
            "get_related".to_string(),
            "find_deputies".to_string(),
        ]
    }

    async fn health_check(&self) -> ConnectorResult<ConnectorHealth> {
        match self
            .client
            .get_with_query("/proposicoes", &[("itens", "1".to_string())])
            .await
        {
            Ok(response) if response.status().is_success() => Ok(ConnectorHealth::Healthy),
            Ok(response) => Ok(ConnectorHealth::Degraded(format!(
                "Unexpected status code {}",
                response.status()
            ))),
            Err(err) => Ok(ConnectorHealth::Unhealthy(err.to_string())),
        }
    }

    async fn test_connection(&self) -> ConnectorResult<bool> {
        let response = self
            .client
            .get_with_query("/proposicoes", &[("itens", "1".to_string())])
            .await?;
        Ok(response.status().is_success())
    }
}

#[async_trait]
impl LegislativeConnector for CamaraConnector {
    #[instrument(skip(self), fields(tipo = %query.sigla_tipo))]
    async fn list_propositions(
        &self,
        query: &PropositionQuery,
    ) -> ConnectorResult<PropositionPage> {
        let response = self
            .client
            .get_with_query("/proposicoes", &listing_params(query))
            .await?;
        let total = header_u64(response.headers(), "x-total-count");
        let envelope: Envelope<Vec<PropositionSummary>> =
            HttpClient::parse_json_response(response).await?;

        debug!(count = envelope.dados.len(), ?total, "Listed propositions");
        Ok(PropositionPage {
            items: envelope.dados,
            total,
        })
    }

    #[instrument(skip(self))]
    async fn get_proposition(&self, id: i64) -> ConnectorResult<PropositionDetails> {
        self.fetch(&format!("/proposicoes/{}", id)).await
    }

    #[instrument(skip(self))]
    async fn get_authors(&self, id: i64) -> ConnectorResult<Vec<PropositionAuthor>> {
        self.fetch(&format!("/proposicoes/{}/autores", id)).await
    }

    #[instrument(skip(self))]
    async fn get_related(&self, id: i64) -> ConnectorResult<Vec<PropositionSummary>> {
        self.fetch(&format!("/proposicoes/{}/relacionadas", id))
            .await
    }

    #[instrument(skip(self))]
    async fn find_deputies(&self, name: &str) -> ConnectorResult<Vec<DeputySummary>> {
        if name.trim().is_empty() {
            return Err(ConnectorError::RequestFailed(
                "deputy name must not be empty".to_string(),
            ));
        }
        let response = self
            .client
            .get_with_query("/deputados", &[("nome", name.to_string())])
            .await?;
        let envelope: Envelope<Vec<DeputySummary>> =
            HttpClient::parse_json_response(response).await?;
        Ok(envelope.dados)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(year: Option<i32>, author: Option<i64>) -> PropositionQuery {
        PropositionQuery {
            sigla_tipo: "PL".to_string(),
            author_id: author,
            year,
            items: 10,
            page: 2,
            order: "DESC".to_string(),
            order_by: "id".to_string(),
        }
    }

    #[test]
    fn test_connector_identity() {
        let connector =
            CamaraConnector::new(ConnectorConfig::new("camara", DEFAULT_CAMARA_URL)).unwrap();
        assert_eq!(connector.name(), "camara");
        assert_eq!(connector.connector_type(), "legislative");
        assert!(connector
            .capabilities()
            .contains(&"find_deputies".to_string()));
    }

    #[test]
    fn test_listing_params_include_filters() {
        let params = listing_params(&query(Some(2024), Some(204554)));
        assert!(params.contains(&("idDeputadoAutor", "204554".to_string())));
        assert!(params.contains(&("ano", "2024".to_string())));
        assert!(params.contains(&("pagina", "2".to_string())));
        assert!(params.contains(&("ordenarPor", "id".to_string())));
    }

    #[test]
    fn test_listing_params_omit_year_and_author() {
        let params = listing_params(&query(None, None));
        assert!(params.iter().all(|(key, _)| *key != "ano"));
        assert!(params.iter().all(|(key, _)| *key != "idDeputadoAutor"));
        assert_eq!(params[0], ("siglaTipo", "PL".to_string()));
    }

    #[test]
    fn test_envelope_deserializes_author_list() {
        let json = r#"{"dados":[{"uri":"https://x/deputados/1","nome":"Fulano","codTipo":10000,"tipo":"Deputado(a)","ordemAssinatura":1,"proponente":1}],"links":[]}"#;
        let envelope: Envelope<Vec<PropositionAuthor>> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.dados.len(), 1);
        assert_eq!(envelope.dados[0].cod_tipo, Some(10000));
        assert_eq!(envelope.dados[0].ordem_assinatura, 1);
    }

    #[tokio::test]
    async fn test_find_deputies_rejects_blank_name() {
        let connector =
            CamaraConnector::new(ConnectorConfig::new("camara", DEFAULT_CAMARA_URL)).unwrap();
        let result = connector.find_deputies("  ").await;
        assert!(matches!(result, Err(ConnectorError::RequestFailed(_))));
    }
}
