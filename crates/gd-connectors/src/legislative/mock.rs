//! Mock legislative connector for testing.
//!
//! Serves preconfigured bills, authors, related bills and deputies without
//! network access. Supports failure injection and records every request.

use crate::traits::{
    Connector, ConnectorError, ConnectorHealth, ConnectorResult, DeputySummary,
    LegislativeConnector, PropositionAuthor, PropositionDetails, PropositionPage,
    PropositionQuery, PropositionStatus, PropositionSummary,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Behavior configuration for failure injection.
#[derive(Debug, Clone, Default)]
pub enum MockBehavior {
    /// Return results normally.
    #[default]
    Normal,
    /// Fail every request touching one of these bill ids.
    FailOn {
        ids: Vec<i64>,
        error: ConnectorError,
    },
    /// Always fail.
    AlwaysFail(ConnectorError),
    /// Simulate being unhealthy.
    Unhealthy(String),
}

#[derive(Debug, Default)]
struct MockData {
    propositions: HashMap<i64, PropositionDetails>,
    authors: HashMap<i64, Vec<PropositionAuthor>>,
    related: HashMap<i64, Vec<PropositionSummary>>,
    deputies: HashMap<String, Vec<DeputySummary>>,
}

/// Mock legislative connector for testing.
pub struct MockLegislativeConnector {
    name: String,
    data: Arc<RwLock<MockData>>,
    behavior: Arc<RwLock<MockBehavior>>,
    call_count: AtomicU64,
    request_history: Arc<RwLock<Vec<String>>>,
    last_query: Arc<RwLock<Option<PropositionQuery>>>,
}

impl MockLegislativeConnector {
    /// Creates an empty mock connector.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            data: Arc::new(RwLock::new(MockData::default())),
            behavior: Arc::new(RwLock::new(MockBehavior::Normal)),
            call_count: AtomicU64::new(0),
            request_history: Arc::new(RwLock::new(Vec::new())),
            last_query: Arc::new(RwLock::new(None)),
        }
    }

    /// Builds a bill record with the given type, number, year and situation code.
    pub fn proposition(
        id: i64,
        sigla_tipo: &str,
        numero: i64,
        ano: i32,
        cod_situacao: Option<i64>,
    ) -> PropositionDetails {
        PropositionDetails {
            id,
            sigla_tipo: sigla_tipo.to_string(),
            numero,
            ano,
            ementa: format!("Ementa da proposição {}", id),
            data_apresentacao: Some(format!("{}-03-01T10:00", ano)),
            uri_prop_principal: None,
            status: Some(PropositionStatus {
                cod_situacao,
                descricao_situacao: None,
            }),
            url_inteiro_teor: Some(format!("https://example.org/teor/{}.pdf", id)),
        }
    }

    /// Builds an author entry.
    pub fn author(nome: &str, cod_tipo: i64, proponente: i32, ordem: i32) -> PropositionAuthor {
        PropositionAuthor {
            nome: nome.to_string(),
            cod_tipo: Some(cod_tipo),
            tipo: None,
            proponente,
            ordem_assinatura: ordem,
        }
    }

    /// Registers a bill together with its authors.
    pub async fn add_proposition(
        &self,
        details: PropositionDetails,
        authors: Vec<PropositionAuthor>,
    ) {
        let mut data = self.data.write().await;
        data.authors.insert(details.id, authors);
        data.propositions.insert(details.id, details);
    }

    /// Registers the bills related to `id`.
    pub async fn set_related(&self, id: i64, related: Vec<PropositionSummary>) {
        let mut data = self.data.write().await;
        data.related.insert(id, related);
    }

    /// Registers a deputy returned by name lookups.
    pub async fn add_deputy(&self, deputy: DeputySummary) {
        let mut data = self.data.write().await;
        data.deputies
            .entry(deputy.nome.clone())
            .or_default()
            .push(deputy);
    }

    /// Sets the behavior for failure injection.
    pub async fn set_behavior(&self, behavior: MockBehavior) {
        let mut b = self.behavior.write().await;
        *b = behavior;
    }

    /// Gets the request history for test verification.
    pub async fn get_request_history(&self) -> Vec<String> {
        self.request_history.read().await.clone()
    }

    /// Returns the most recent listing query.
    pub async fn last_query(&self) -> Option<PropositionQuery> {
        self.last_query.read().await.clone()
    }

    /// Gets the current call count.
    pub fn get_call_count(&self) -> u64 {
        self.call_count.load(Ordering::SeqCst)
    }

    async fn record_and_check(&self, request: String, id: Option<i64>) -> ConnectorResult<()> {
        self.request_history.write().await.push(request);
        self.call_count.fetch_add(1, Ordering::SeqCst);

        let behavior = self.behavior.read().await;
        match &*behavior {
            MockBehavior::Normal | MockBehavior::Unhealthy(_) => Ok(()),
            MockBehavior::FailOn { ids, error } => match id {
                Some(id) if ids.contains(&id) => Err(error.clone()),
                _ => Ok(()),
            },
            MockBehavior::AlwaysFail(error) => Err(error.clone()),
        }
    }
}

fn summary_of(details: &PropositionDetails) -> PropositionSummary {
    PropositionSummary {
        id: details.id,
        uri: None,
        sigla_tipo: details.sigla_tipo.clone(),
        numero: details.numero,
        ano: details.ano,
        ementa: details.ementa.clone(),
    }
}

#[async_trait]
impl Connector for MockLegislativeConnector {
    fn name(&self) -> &str {
        &self.name
    }

    fn connector_type(&self) -> &str {
        "legislative"
    }

    async fn health_check(&self) -> ConnectorResult<ConnectorHealth> {
        let behavior = self.behavior.read().await;
        match &*behavior {
            MockBehavior::Unhealthy(reason) => Ok(ConnectorHealth::Unhealthy(reason.clone())),
            MockBehavior::AlwaysFail(error) => Ok(ConnectorHealth::Unhealthy(error.to_string())),
            _ => Ok(ConnectorHealth::Healthy),
        }
    }

    async fn test_connection(&self) -> ConnectorResult<bool> {
        Ok(matches!(self.health_check().await?, ConnectorHealth::Healthy))
    }
}

#[async_trait]
impl LegislativeConnector for MockLegislativeConnector {
    async fn list_propositions(
        &self,
        query: &PropositionQuery,
    ) -> ConnectorResult<PropositionPage> {
        self.record_and_check(format!("list:{}", query.sigla_tipo), None)
            .await?;
        *self.last_query.write().await = Some(query.clone());

        let data = self.data.read().await;
        let mut matching: Vec<PropositionSummary> = data
            .propositions
            .values()
            .filter(|p| p.sigla_tipo == query.sigla_tipo)
            .filter(|p| query.year.map_or(true, |year| p.ano == year))
            .map(summary_of)
            .collect();

        matching.sort_by_key(|p| p.id);
        if query.order.eq_ignore_ascii_case("DESC") {
            matching.reverse();
        }

        let total = matching.len() as u64;
        let per_page = query.items.max(1) as usize;
        let skip = (query.page.max(1) as usize - 1) * per_page;
        let items = matching.into_iter().skip(skip).take(per_page).collect();

        Ok(PropositionPage {
            items,
            total: Some(total),
        })
    }

    async fn get_proposition(&self, id: i64) -> ConnectorResult<PropositionDetails> {
        self.record_and_check(format!("proposicao:{}", id), Some(id))
            .await?;
        self.data
            .read()
            .await
            .propositions
            .get(&id)
            .cloned()
            .ok_or_else(|| ConnectorError::NotFound("Resource not found".to_string()))
    }

    async fn get_authors(&self, id: i64) -> ConnectorResult<Vec<PropositionAuthor>> {
        self.record_and_check(format!("autores:{}", id), Some(id))
            .await?;
        Ok(self
            .data
            .read()
            .await
            .authors
            .get(&id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_related(&self, id: i64) -> ConnectorResult<Vec<PropositionSummary>> {
        self.record_and_check(format!("relacionadas:{}", id), Some(id))
            .await?;
        Ok(self
            .data
            .read()
            .await
            .related
            .get(&id)
            .cloned()
            .unwrap_or_default())
    }

    async fn find_deputies(&self, name: &str) -> ConnectorResult<Vec<DeputySummary>> {
        self.record_and_check(format!("deputados:{}", name), None)
            .await?;
        Ok(self
            .data
            .read()
            .await
            .deputies
            .get(name)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(year: Option<i32>, page: u32) -> PropositionQuery {
        PropositionQuery {
            sigla_tipo: "PL".to_string(),
            author_id: None,
            year,
            items: 2,
            page,
            order: "ASC".to_string(),
            order_by: "id".to_string(),
        }
    }

    #[tokio::test]
    async fn test_listing_filters_and_paginates() {
        let mock = MockLegislativeConnector::new("mock");
        for id in 1..=5 {
            mock.add_proposition(
                MockLegislativeConnector::proposition(id, "PL", id * 10, 2024, None),
                vec![],
            )
            .await;
        }
        mock.add_proposition(
            MockLegislativeConnector::proposition(6, "PL", 60, 2023, None),
            vec![],
        )
        .await;
        mock.add_proposition(
            MockLegislativeConnector::proposition(7, "MPV", 70, 2024, None),
            vec![],
        )
        .await;

        let page = mock.list_propositions(&listing(Some(2024), 2)).await.unwrap();
        assert_eq!(page.total, Some(5));
        let ids: Vec<i64> = page.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 4]);

        let all_years = mock.list_propositions(&listing(None, 1)).await.unwrap();
        assert_eq!(all_years.total, Some(6));
    }

    #[tokio::test]
    async fn test_unknown_proposition_is_not_found() {
        let mock = MockLegislativeConnector::new("mock");
        let result = mock.get_proposition(99).await;
        assert!(matches!(result, Err(ConnectorError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_fail_on_specific_ids() {
        let mock = MockLegislativeConnector::new("mock");
        mock.add_proposition(
            MockLegislativeConnector::proposition(1, "PL", 1, 2024, None),
            vec![],
        )
        .await;
        mock.set_behavior(MockBehavior::FailOn {
            ids: vec![1],
            error: ConnectorError::Timeout("slow".to_string()),
        })
        .await;

        assert!(mock.get_proposition(1).await.is_err());
        assert!(mock.get_authors(2).await.is_ok());
        assert_eq!(mock.get_call_count(), 2);
    }

    #[tokio::test]
    async fn test_health_follows_behavior() {
        let mock = MockLegislativeConnector::new("mock");
        assert_eq!(mock.health_check().await.unwrap(), ConnectorHealth::Healthy);

        mock.set_behavior(MockBehavior::Unhealthy("down".to_string()))
            .await;
        assert_eq!(
            mock.health_check().await.unwrap(),
            ConnectorHealth::Unhealthy("down".to_string())
        );
        assert!(!mock.test_connection().await.unwrap());
    }
}
