//! Organization (órgão) routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use gd_core::{
    db::{create_organization_repository, ORGANIZATION_DEFAULT_SORT, ORGANIZATION_SORT_COLUMNS},
    Organization, OrganizationUpdate, UNDEFINED_ORGANIZATION_ID,
};
use tracing::{debug, info};
use validator::Validate;

use super::{collection, paginated, path_id};
use crate::auth::AuthenticatedUser;
use crate::dto::{
    CreateOrganizationRequest, Envelope, ListParams, SearchParams, UpdateOrganizationRequest,
};
use crate::error::{ApiError, EntityMessages};
use crate::extract::{ApiJson, RequestOrigin};
use crate::state::AppState;

const MESSAGES: EntityMessages = EntityMessages {
    not_found: "Órgão não encontrado",
    duplicate: "Esse órgão já está cadastrado",
    foreign_key: "O tipo de órgão ou ID do usuário está incorreto",
    restricted: "Não é possível apagar o órgão porque ele está referenciado em outras tabelas.",
};

/// Creates the organization CRUD routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_organizations).post(create_organization))
        .route(
            "/:id",
            get(get_organization)
                .put(update_organization)
                .delete(delete_organization),
        )
}

/// Creates the name search route.
pub fn search_routes() -> Router<AppState> {
    Router::new().route("/orgaosBusca", get(search_organizations))
}

fn not_found() -> ApiError {
    ApiError::NotFound(MESSAGES.not_found.to_string())
}

async fn list_organizations(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    origin: RequestOrigin,
    Query(params): Query<ListParams>,
) -> Result<Envelope<Vec<Organization>>, ApiError> {
    let query = params.list_query(ORGANIZATION_DEFAULT_SORT, ORGANIZATION_SORT_COLUMNS)?;
    let page = create_organization_repository(&state.db)
        .list(&query)
        .await?;

    Ok(paginated(
        page,
        &query,
        &origin,
        "/api/orgaos",
        "órgão(s)",
        "Nenhum órgão registrado",
    ))
}

async fn search_organizations(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(params): Query<SearchParams>,
) -> Result<Envelope<Vec<Organization>>, ApiError> {
    let term = params.term()?;
    let found = create_organization_repository(&state.db)
        .search_by_name(term)
        .await?;

    debug!(term, matches = found.len(), "Organization search");
    Ok(collection(found, "órgão(s)", "Nenhum órgão encontrado"))
}

async fn get_organization(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Envelope<Organization>, ApiError> {
    let id = path_id(&id)?;
    let organization = create_organization_repository(&state.db)
        .get(id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Envelope::ok(organization).message("Órgão encontrado"))
}

async fn create_organization(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiJson(request): ApiJson<CreateOrganizationRequest>,
) -> Result<Envelope<Organization>, ApiError> {
    request.validate()?;
    let new = request.into_new(claims.usuario_id)?;

    let organization = create_organization_repository(&state.db)
        .create(&new)
        .await
        .map_err(|e| ApiError::from_db(e, &MESSAGES))?;

    info!(
        organization_id = organization.id,
        created_by = claims.usuario_id,
        "Organization created"
    );
    Ok(Envelope::created("Órgão criado com sucesso.", organization))
}

async fn update_organization(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateOrganizationRequest>,
) -> Result<Envelope<Organization>, ApiError> {
    let id = path_id(&id)?;
    request.validate()?;

    let update = OrganizationUpdate::from(request);
    if update.is_empty() {
        return Err(ApiError::BadRequest(
            "Nenhum dado enviado para atualização".to_string(),
        ));
    }

    let organization = create_organization_repository(&state.db)
        .update(id, &update)
        .await
        .map_err(|e| ApiError::from_db(e, &MESSAGES))?
        .ok_or_else(|| {
            ApiError::NotFound("Órgão não encontrado ou nenhum dado atualizado".to_string())
        })?;

    info!(organization_id = id, updated_by = claims.usuario_id, "Organization updated");
    Ok(Envelope::ok(organization).message("Órgão atualizado com sucesso."))
}

async fn delete_organization(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Envelope<()>, ApiError> {
    let id = path_id(&id)?;
    // Persons fall back to the placeholder organization.
    if id == UNDEFINED_ORGANIZATION_ID {
        return Err(ApiError::Conflict(MESSAGES.restricted.to_string()));
    }

    let deleted = create_organization_repository(&state.db)
        .delete(id)
        .await
        .map_err(|e| ApiError::from_db(e, &MESSAGES))?;
    if !deleted {
        return Err(not_found());
    }

    info!(organization_id = id, deleted_by = claims.usuario_id, "Organization deleted");
    Ok(Envelope::message_only(
        StatusCode::OK,
        "Órgão apagado com sucesso",
    ))
}
