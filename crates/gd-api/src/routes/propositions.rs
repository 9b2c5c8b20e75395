//! Legislative aggregation routes backed by the Câmara dos Deputados open-data API.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use gd_connectors::legislative::{
    AttachedProposition, AuthorDetails, MainProposition, PropositionItem, PropositionListing,
};
use gd_connectors::PropositionQuery;
use gd_core::db::{SortOrder, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use tracing::debug;

use crate::auth::AuthenticatedUser;
use crate::dto::{lenient_u32, parse_id, Envelope, Links, PropositionParams};
use crate::error::ApiError;
use crate::extract::RequestOrigin;
use crate::state::AppState;

/// Message for listings without results.
pub const NO_PROPOSITIONS_MESSAGE: &str = "Nenhuma proposição encontrada.";

const DEFAULT_TYPE: &str = "PL";
const DEFAULT_ORDER_BY: &str = "id";

/// Creates the legislative routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/proposicoes", get(list_propositions))
        .route("/proposicao-principal", get(main_proposition))
        .route("/proposicao-apensados", get(attached_propositions))
        .route("/proposicao-autores", get(proposition_authors))
        .route("/medidas-provisorias", get(provisional_measures))
}

/// Validated listing parameters, in the form echoed back in links.
#[derive(Debug, Clone)]
struct ListingRequest {
    query: PropositionQuery,
    /// Raw `ano` as echoed in links; `0` disables the year filter.
    year_param: i32,
}

impl ListingRequest {
    fn parse(params: &PropositionParams) -> Result<Self, ApiError> {
        let items = lenient_u32(params.itens.as_deref())
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE);
        let page = lenient_u32(params.pagina.as_deref()).unwrap_or(1);

        // Anything other than ASC/DESC lists newest first.
        let order = params
            .ordem
            .as_deref()
            .and_then(|o| o.trim().parse::<SortOrder>().ok())
            .unwrap_or(SortOrder::Desc);

        let sigla_tipo = identifier(params.tipo.as_deref(), DEFAULT_TYPE, "tipo")?.to_uppercase();
        let order_by = identifier(params.ordenar_por.as_deref(), DEFAULT_ORDER_BY, "ordenarPor")?;

        let requested_year = params
            .ano
            .as_deref()
            .and_then(|v| v.trim().parse::<i32>().ok())
            .filter(|y| *y >= 0);
        let year = PropositionQuery::resolve_year(requested_year);

        let author_id = params
            .autor
            .as_deref()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|id| *id > 0);

        Ok(Self {
            query: PropositionQuery {
                sigla_tipo,
                author_id,
                year,
                items,
                page,
                order: order.to_string(),
                order_by,
            },
            year_param: year.unwrap_or(0),
        })
    }

    fn last_page(&self, total: Option<u64>) -> u32 {
        match total {
            Some(total) if total > 0 => {
                let pages = total.div_ceil(u64::from(self.query.items));
                u32::try_from(pages).unwrap_or(u32::MAX)
            }
            Some(_) => 1,
            None => self.query.page,
        }
    }
}

/// Accepts only ASCII alphanumerics so values can be echoed into links unescaped.
fn identifier(raw: Option<&str>, default: &str, name: &str) -> Result<String, ApiError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(default.to_string()),
        Some(value) if value.chars().all(|c| c.is_ascii_alphanumeric()) => Ok(value.to_string()),
        Some(_) => Err(ApiError::BadRequest(format!(
            "Parametro '{}' inválido",
            name
        ))),
    }
}

fn listing_envelope(
    listing: PropositionListing,
    links: impl FnOnce(Option<u64>) -> Links,
) -> Envelope<Vec<PropositionItem>> {
    if listing.items.is_empty() {
        return Envelope {
            status: 200,
            message: Some(NO_PROPOSITIONS_MESSAGE.to_string()),
            dados: None,
            links: None,
        };
    }
    let links = links(listing.total);
    Envelope::ok(listing.items).links(links)
}

async fn list_propositions(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    origin: RequestOrigin,
    Query(params): Query<PropositionParams>,
) -> Result<Envelope<Vec<PropositionItem>>, ApiError> {
    let request = ListingRequest::parse(&params)?;
    let listing = state.propositions.list_propositions(&request.query).await?;

    let author = request
        .query
        .author_id
        .unwrap_or(state.propositions.config().deputy_id);

    Ok(listing_envelope(listing, |total| {
        let q = &request.query;
        let params = [
            ("autor", author.to_string()),
            ("itens", q.items.to_string()),
            ("pagina", q.page.to_string()),
            ("tipo", q.sigla_tipo.clone()),
            ("ordem", q.order.clone()),
            ("ordenarPor", q.order_by.clone()),
            ("ano", request.year_param.to_string()),
        ];
        Links::paginated(&origin, "/api/proposicoes", &params, request.last_page(total))
    }))
}

async fn provisional_measures(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    origin: RequestOrigin,
    Query(params): Query<PropositionParams>,
) -> Result<Envelope<Vec<PropositionItem>>, ApiError> {
    let params = PropositionParams {
        autor: None,
        tipo: None,
        ordenar_por: None,
        ..params
    };
    let request = ListingRequest::parse(&params)?;
    let listing = state
        .propositions
        .list_provisional_measures(&request.query)
        .await?;

    Ok(listing_envelope(listing, |total| {
        let q = &request.query;
        let params = [
            ("ano", request.year_param.to_string()),
            ("itens", q.items.to_string()),
            ("pagina", q.page.to_string()),
            ("ordem", q.order.clone()),
        ];
        Links::paginated(
            &origin,
            "/api/medidas-provisorias",
            &params,
            request.last_page(total),
        )
    }))
}

fn proposition_id(params: &PropositionParams) -> Result<i64, ApiError> {
    parse_id(params.id.as_deref(), "Parametro 'id' inválido")
}

async fn main_proposition(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(params): Query<PropositionParams>,
) -> Result<Response, ApiError> {
    let id = proposition_id(&params)?;

    match state.propositions.find_main(id).await? {
        Some(main) => {
            debug!(id, root = main.proposicao_id, "Resolved main proposition");
            Ok(Envelope::ok(main).into_response())
        }
        None => Ok(Envelope::ok(Vec::<MainProposition>::new()).into_response()),
    }
}

async fn attached_propositions(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(params): Query<PropositionParams>,
) -> Result<Envelope<Vec<AttachedProposition>>, ApiError> {
    let id = proposition_id(&params)?;
    let attached = state.propositions.find_attached(id).await?;

    if attached.is_empty() {
        return Ok(Envelope {
            status: 200,
            message: Some(NO_PROPOSITIONS_MESSAGE.to_string()),
            dados: None,
            links: None,
        });
    }
    Ok(Envelope::ok(attached))
}

async fn proposition_authors(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(params): Query<PropositionParams>,
) -> Result<Envelope<Vec<AuthorDetails>>, ApiError> {
    let id = proposition_id(&params)?;
    let authors = state.propositions.list_authors(id).await?;

    if authors.is_empty() {
        return Ok(Envelope {
            status: 200,
            message: Some("Nenhum autor encontrado.".to_string()),
            dados: None,
            links: None,
        });
    }
    Ok(Envelope::ok(authors).message("Autores encontrados"))
}
