//! Person type catalog routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use gd_core::{db::create_person_type_repository, PersonType};
use tracing::info;
use validator::Validate;

use super::{collection, path_id};
use crate::auth::AuthenticatedUser;
use crate::dto::{CreatePersonTypeRequest, Envelope};
use crate::error::{ApiError, EntityMessages};
use crate::extract::ApiJson;
use crate::state::AppState;

const MESSAGES: EntityMessages = EntityMessages {
    not_found: "Tipo de pessoa não encontrado",
    duplicate: "Esse tipo de pessoa já está cadastrado",
    foreign_key: "Dados de referência do tipo de pessoa estão incorretos",
    restricted: "Não é possível apagar esse tipo de pessoa porque ele está referenciado em outras tabelas.",
};

/// Creates the person type routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_types).post(create_type))
        .route("/:id", get(get_type).delete(delete_type))
}

async fn list_types(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> Result<Envelope<Vec<PersonType>>, ApiError> {
    let types = create_person_type_repository(&state.db).list().await?;
    Ok(collection(
        types,
        "tipo(s) de pessoa",
        "Nenhum tipo de pessoa registrado",
    ))
}

async fn get_type(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Envelope<PersonType>, ApiError> {
    let id = path_id(&id)?;
    let found = create_person_type_repository(&state.db)
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(MESSAGES.not_found.to_string()))?;
    Ok(Envelope::ok(found))
}

async fn create_type(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiJson(request): ApiJson<CreatePersonTypeRequest>,
) -> Result<Envelope<PersonType>, ApiError> {
    request.validate()?;
    let new = request.into_new()?;

    let created = create_person_type_repository(&state.db)
        .create(&new)
        .await
        .map_err(|e| ApiError::from_db(e, &MESSAGES))?;

    info!(
        person_type_id = created.id,
        created_by = claims.usuario_id,
        "Person type created"
    );
    Ok(Envelope::created("Tipo de pessoa criado com sucesso.", created))
}

async fn delete_type(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Envelope<()>, ApiError> {
    let id = path_id(&id)?;

    let deleted = create_person_type_repository(&state.db)
        .delete(id)
        .await
        .map_err(|e| ApiError::from_db(e, &MESSAGES))?;
    if !deleted {
        return Err(ApiError::NotFound(MESSAGES.not_found.to_string()));
    }

    info!(
        person_type_id = id,
        deleted_by = claims.usuario_id,
        "Person type deleted"
    );
    Ok(Envelope::message_only(
        StatusCode::OK,
        "Tipo de pessoa apagado com sucesso",
    ))
}
