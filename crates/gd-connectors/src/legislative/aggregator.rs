//! Legislative aggregation layer.
//!
//! Combines listings, details and author lists from a [`LegislativeConnector`]
//! into the records served by the office API. Per-bill lookups run
//! concurrently; a listing of `n` bills costs `2n + 1` upstream calls.

use crate::traits::{
    proposition_id_from_uri, ConnectorError, ConnectorResult, DeputySummary,
    LegislativeConnector, PropositionAuthor, PropositionDetails, PropositionQuery,
    PropositionSummary,
};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Situation code of an archived bill.
pub const ARCHIVED_SITUATION: i64 = 923;

/// Situation code of a bill that became law.
pub const ENACTED_SITUATION: i64 = 1140;

/// Author type code of a sitting deputy.
pub const DEPUTY_AUTHOR_TYPE: i64 = 10000;

/// Bill type acronym of provisional measures.
pub const PROVISIONAL_MEASURE_TYPE: &str = "MPV";

/// Configuration for the proposition aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Deputy whose bills are listed by default.
    pub deputy_id: i64,
    /// Name as it appears in upstream author lists.
    pub parliamentarian_name: String,
    /// Maximum number of hops followed when resolving a main bill.
    #[serde(default = "default_max_chain_depth")]
    pub max_chain_depth: usize,
}

fn default_max_chain_depth() -> usize {
    16
}

impl AggregatorConfig {
    /// Creates a configuration with the default chain depth.
    pub fn new(deputy_id: i64, parliamentarian_name: impl Into<String>) -> Self {
        Self {
            deputy_id,
            parliamentarian_name: parliamentarian_name.into(),
            max_chain_depth: default_max_chain_depth(),
        }
    }
}

/// Author entry as served to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorView {
    pub nome: String,
    pub proponente: i32,
    pub ordem_assinatura: i32,
    pub autoria_unica: bool,
}

impl From<&PropositionAuthor> for AuthorView {
    fn from(author: &PropositionAuthor) -> Self {
        Self {
            nome: author.nome.clone(),
            proponente: author.proponente,
            ordem_assinatura: author.ordem_assinatura,
            autoria_unica: author.proponente == 1 && author.ordem_assinatura == 1,
        }
    }
}

/// Presentation date, status flags and full-text link of a bill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailsView {
    pub data_apresentacao: Option<String>,
    pub arquivado: bool,
    pub transformada_em_lei: bool,
    pub documento: Option<String>,
}

impl From<&PropositionDetails> for DetailsView {
    fn from(details: &PropositionDetails) -> Self {
        let situation = details.situation_code();
        Self {
            data_apresentacao: details.data_apresentacao.clone(),
            arquivado: situation == Some(ARCHIVED_SITUATION),
            transformada_em_lei: situation == Some(ENACTED_SITUATION),
            documento: details.url_inteiro_teor.clone(),
        }
    }
}

/// Listing entry for `/api/proposicoes` and `/api/medidas-provisorias`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropositionItem {
    pub proposicao_id: i64,
    pub proposicao_titulo: String,
    pub proposicao_autoria_unica: bool,
    pub proposicao_numero: i64,
    pub proposicao_ano: i32,
    pub proposicao_tipo: String,
    pub proposicao_ementa: String,
    pub proposicao_detalhes: DetailsView,
    /// Present only when authorship is shared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposicao_autores: Option<Vec<AuthorView>>,
}

/// Root of an attachment chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MainProposition {
    pub proposicao_id: i64,
    pub proposicao_titulo: String,
    pub proposicao_ementa: String,
    pub proposicao_detalhes: DetailsView,
    pub proposicao_autores: Vec<AuthorView>,
}

/// A bill attached to another one and co-authored by the office's parliamentarian.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttachedProposition {
    pub proposicao_principal: i64,
    pub apensado_id: i64,
    pub apensado_titulo: String,
    pub apensado_ementa: String,
    pub proposicao_detalhes: DetailsView,
    pub apensado_autores: Vec<AuthorView>,
}

/// Author entry enriched with party and state for deputies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorDetails {
    pub nome: String,
    pub proponente: i32,
    pub ordem_assinatura: i32,
    #[serde(rename = "siglaPartido")]
    pub party_acronym: Option<String>,
    #[serde(rename = "uriPartido")]
    pub party_uri: Option<String>,
    #[serde(rename = "siglaUf")]
    pub state: Option<String>,
}

/// One page of aggregated bills.
#[derive(Debug, Clone, PartialEq)]
pub struct PropositionListing {
    pub items: Vec<PropositionItem>,
    /// Total across all pages as reported upstream.
    pub total: Option<u64>,
}

/// Builds the display title `"{sigla} {numero}/{ano}"`.
pub fn proposition_title(sigla_tipo: &str, numero: i64, ano: i32) -> String {
    format!("{} {}/{}", sigla_tipo, numero, ano)
}

/// True when every author is the sole proponent in first signing position.
///
/// An empty author list counts as unique.
pub fn is_sole_authorship(authors: &[AuthorView]) -> bool {
    authors.iter().all(|a| a.autoria_unica)
}

/// Aggregates upstream legislative data into API records.
pub struct PropositionAggregator {
    source: Arc<dyn LegislativeConnector>,
    config: AggregatorConfig,
}

impl PropositionAggregator {
    /// Creates a new aggregator over a connector.
    pub fn new(source: Arc<dyn LegislativeConnector>, config: AggregatorConfig) -> Self {
        info!(
            connector = source.name(),
            deputy_id = config.deputy_id,
            "Proposition aggregator initialized"
        );
        Self { source, config }
    }

    /// Returns the aggregator configuration.
    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Returns the underlying connector.
    pub fn source(&self) -> &Arc<dyn LegislativeConnector> {
        &self.source
    }

    /// Lists bills with details and authors.
    ///
    /// A query without an author falls back to the configured deputy.
    #[instrument(skip(self), fields(tipo = %query.sigla_tipo))]
    pub async fn list_propositions(
        &self,
        query: &PropositionQuery,
    ) -> ConnectorResult<PropositionListing> {
        let mut query = query.clone();
        if query.author_id.is_none() {
            query.author_id = Some(self.config.deputy_id);
        }
        self.list(&query).await
    }

    /// Lists provisional measures with details and authors.
    #[instrument(skip(self))]
    pub async fn list_provisional_measures(
        &self,
        query: &PropositionQuery,
    ) -> ConnectorResult<PropositionListing> {
        let query = PropositionQuery {
            sigla_tipo: PROVISIONAL_MEASURE_TYPE.to_string(),
            author_id: None,
            ..query.clone()
        };
        self.list(&query).await
    }

    async fn list(&self, query: &PropositionQuery) -> ConnectorResult<PropositionListing> {
        let page = self.source.list_propositions(query).await?;
        if page.items.is_empty() {
            return Ok(PropositionListing {
                items: Vec::new(),
                total: page.total,
            });
        }

        let lookups = page.items.iter().map(|summary| self.build_item(summary));
        let items = join_all(lookups)
            .await
            .into_iter()
            .collect::<ConnectorResult<Vec<_>>>()?;

        debug!(count = items.len(), "Aggregated propositions");
        Ok(PropositionListing {
            items,
            total: page.total,
        })
    }

    async fn build_item(&self, summary: &PropositionSummary) -> ConnectorResult<PropositionItem> {
        let (details, authors) = futures::try_join!(
            self.source.get_proposition(summary.id),
            self.source.get_authors(summary.id)
        )?;

        let authors: Vec<AuthorView> = authors.iter().map(AuthorView::from).collect();
        let sole = is_sole_authorship(&authors);

        Ok(PropositionItem {
            proposicao_id: summary.id,
            proposicao_titulo: proposition_title(&summary.sigla_tipo, summary.numero, summary.ano),
            proposicao_autoria_unica: sole,
            proposicao_numero: summary.numero,
            proposicao_ano: summary.ano,
            proposicao_tipo: summary.sigla_tipo.clone(),
            proposicao_ementa: summary.ementa.clone(),
            proposicao_detalhes: DetailsView::from(&details),
            proposicao_autores: if sole { None } else { Some(authors) },
        })
    }

    /// Resolves the root of the attachment chain of a bill.
    ///
    /// Returns `None` when the bill is not attached to another one.
    #[instrument(skip(self))]
    pub async fn find_main(&self, id: i64) -> ConnectorResult<Option<MainProposition>> {
        let start = self.source.get_proposition(id).await?;
        let Some(mut next_uri) = start.uri_prop_principal.clone() else {
            return Ok(None);
        };

        let mut visited = HashSet::from([start.id]);
        let mut current;
        loop {
            if visited.len() > self.config.max_chain_depth {
                warn!(id, depth = visited.len(), "Attachment chain too long");
                return Err(ConnectorError::InvalidResponse(format!(
                    "attachment chain of {} exceeds {} hops",
                    id, self.config.max_chain_depth
                )));
            }

            let next_id = proposition_id_from_uri(&next_uri).ok_or_else(|| {
                ConnectorError::InvalidResponse(format!("malformed proposition uri: {}", next_uri))
            })?;
            if !visited.insert(next_id) {
                warn!(id, repeated = next_id, "Attachment chain loops");
                return Err(ConnectorError::InvalidResponse(format!(
                    "attachment chain of {} loops back to {}",
                    id, next_id
                )));
            }

            current = self.source.get_proposition(next_id).await?;
            match current.uri_prop_principal.clone() {
                Some(uri) => next_uri = uri,
                None => break,
            }
        }

        let authors = self.source.get_authors(current.id).await?;
        Ok(Some(MainProposition {
            proposicao_id: current.id,
            proposicao_titulo: proposition_title(&current.sigla_tipo, current.numero, current.ano),
            proposicao_ementa: current.ementa.clone(),
            proposicao_detalhes: DetailsView::from(&current),
            proposicao_autores: authors.iter().map(AuthorView::from).collect(),
        }))
    }

    /// Lists `PL` bills attached to `id` that the configured parliamentarian co-authored.
    #[instrument(skip(self))]
    pub async fn find_attached(&self, id: i64) -> ConnectorResult<Vec<AttachedProposition>> {
        let related = self.source.get_related(id).await?;

        let lookups = related
            .iter()
            .filter(|p| p.sigla_tipo == "PL")
            .map(|p| self.attached_if_coauthored(id, p));

        let attached = join_all(lookups)
            .await
            .into_iter()
            .collect::<ConnectorResult<Vec<_>>>()?;

        Ok(attached.into_iter().flatten().collect())
    }

    async fn attached_if_coauthored(
        &self,
        main_id: i64,
        summary: &PropositionSummary,
    ) -> ConnectorResult<Option<AttachedProposition>> {
        let (details, authors) = futures::try_join!(
            self.source.get_proposition(summary.id),
            self.source.get_authors(summary.id)
        )?;

        if !authors
            .iter()
            .any(|a| a.nome == self.config.parliamentarian_name)
        {
            return Ok(None);
        }

        Ok(Some(AttachedProposition {
            proposicao_principal: main_id,
            apensado_id: summary.id,
            apensado_titulo: proposition_title(&summary.sigla_tipo, summary.numero, summary.ano),
            apensado_ementa: summary.ementa.clone(),
            proposicao_detalhes: DetailsView::from(&details),
            apensado_autores: authors.iter().map(AuthorView::from).collect(),
        }))
    }

    /// Lists the authors of a bill, adding party and state for deputies.
    #[instrument(skip(self))]
    pub async fn list_authors(&self, id: i64) -> ConnectorResult<Vec<AuthorDetails>> {
        let authors = self.source.get_authors(id).await?;
        let lookups = authors.iter().map(|author| self.author_details(author));

        join_all(lookups)
            .await
            .into_iter()
            .collect::<ConnectorResult<Vec<_>>>()
    }

    async fn author_details(&self, author: &PropositionAuthor) -> ConnectorResult<AuthorDetails> {
        let deputy: Option<DeputySummary> = if author.cod_tipo == Some(DEPUTY_AUTHOR_TYPE) {
            self.source
                .find_deputies(&author.nome)
                .await?
                .into_iter()
                .next()
        } else {
            None
        };

        let (party_acronym, party_uri, state) = match deputy {
            Some(d) => (d.sigla_partido, d.uri_partido, d.sigla_uf),
            None => (None, None, None),
        };

        Ok(AuthorDetails {
            nome: author.nome.clone(),
            proponente: author.proponente,
            ordem_assinatura: author.ordem_assinatura,
            party_acronym,
            party_uri,
            state,
        })
    }
}
