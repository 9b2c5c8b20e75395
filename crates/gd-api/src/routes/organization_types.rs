//! Organization type catalog routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use gd_core::{db::create_organization_type_repository, OrganizationType};
use tracing::info;
use validator::Validate;

use super::{collection, path_id};
use crate::auth::AuthenticatedUser;
use crate::dto::{CreateOrganizationTypeRequest, Envelope};
use crate::error::{ApiError, EntityMessages};
use crate::extract::ApiJson;
use crate::state::AppState;

const MESSAGES: EntityMessages = EntityMessages {
    not_found: "Tipo de órgão não encontrado",
    duplicate: "Esse tipo de órgão já está cadastrado",
    foreign_key: "Dados de referência do tipo de órgão estão incorretos",
    restricted: "Não é possível apagar esse tipo de órgão porque ele está referenciado em outras tabelas.",
};

/// Creates the organization type routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_types).post(create_type))
        .route("/:id", get(get_type).delete(delete_type))
}

async fn list_types(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> Result<Envelope<Vec<OrganizationType>>, ApiError> {
    let types = create_organization_type_repository(&state.db).list().await?;
    Ok(collection(
        types,
        "tipo(s) de órgão",
        "Nenhum tipo de órgão registrado",
    ))
}

async fn get_type(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Envelope<OrganizationType>, ApiError> {
    let id = path_id(&id)?;
    let found = create_organization_type_repository(&state.db)
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(MESSAGES.not_found.to_string()))?;
    Ok(Envelope::ok(found))
}

async fn create_type(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiJson(request): ApiJson<CreateOrganizationTypeRequest>,
) -> Result<Envelope<OrganizationType>, ApiError> {
    request.validate()?;
    let new = request.into_new()?;

    let created = create_organization_type_repository(&state.db)
        .create(&new)
        .await
        .map_err(|e| ApiError::from_db(e, &MESSAGES))?;

    info!(
        organization_type_id = created.id,
        created_by = claims.usuario_id,
        "Organization type created"
    );
    Ok(Envelope::created("Tipo de órgão criado com sucesso.", created))
}

async fn delete_type(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Envelope<()>, ApiError> {
    let id = path_id(&id)?;

    let deleted = create_organization_type_repository(&state.db)
        .delete(id)
        .await
        .map_err(|e| ApiError::from_db(e, &MESSAGES))?;
    if !deleted {
        return Err(ApiError::NotFound(MESSAGES.not_found.to_string()));
    }

    info!(
        organization_type_id = id,
        deleted_by = claims.usuario_id,
        "Organization type deleted"
    );
    Ok(Envelope::message_only(
        StatusCode::OK,
        "Tipo de órgão apagado com sucesso",
    ))
}
