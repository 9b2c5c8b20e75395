//! Person (pessoa) routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use gd_core::{
    db::{create_person_repository, PERSON_DEFAULT_SORT, PERSON_SORT_COLUMNS},
    Person,
};
use tracing::{debug, info};
use validator::Validate;

use super::{collection, paginated, path_id};
use crate::auth::AuthenticatedUser;
use crate::dto::{CreatePersonRequest, Envelope, ListParams, SearchParams, UpdatePersonRequest};
use crate::error::{ApiError, EntityMessages};
use crate::extract::{ApiJson, RequestOrigin};
use crate::state::AppState;

const MESSAGES: EntityMessages = EntityMessages {
    not_found: "Pessoa não encontrada",
    duplicate: "Essa pessoa já está cadastrada",
    foreign_key: "O tipo de pessoa, órgão ou ID do usuário está incorreto",
    restricted: "Não é possível apagar a pessoa porque ela está referenciada em outras tabelas.",
};

/// Creates the person CRUD routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_persons).post(create_person))
        .route(
            "/:id",
            get(get_person).put(update_person).delete(delete_person),
        )
}

/// Creates the name search route.
pub fn search_routes() -> Router<AppState> {
    Router::new().route("/pessoaBusca", get(search_persons))
}

fn not_found() -> ApiError {
    ApiError::NotFound(MESSAGES.not_found.to_string())
}

async fn list_persons(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    origin: RequestOrigin,
    Query(params): Query<ListParams>,
) -> Result<Envelope<Vec<Person>>, ApiError> {
    let query = params.list_query(PERSON_DEFAULT_SORT, PERSON_SORT_COLUMNS)?;
    let page = create_person_repository(&state.db).list(&query).await?;

    Ok(paginated(
        page,
        &query,
        &origin,
        "/api/pessoas",
        "pessoa(s)",
        "Nenhuma pessoa registrada",
    ))
}

async fn search_persons(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(params): Query<SearchParams>,
) -> Result<Envelope<Vec<Person>>, ApiError> {
    let term = params.term()?;
    let found = create_person_repository(&state.db)
        .search_by_name(term)
        .await?;

    debug!(term, matches = found.len(), "Person search");
    Ok(collection(found, "pessoa(s)", "Nenhuma pessoa encontrada"))
}

async fn get_person(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Envelope<Person>, ApiError> {
    let id = path_id(&id)?;
    let person = create_person_repository(&state.db)
        .get(id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Envelope::ok(person).message("Pessoa encontrada"))
}

async fn create_person(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiJson(request): ApiJson<CreatePersonRequest>,
) -> Result<Envelope<Person>, ApiError> {
    request.validate()?;
    let new = request.into_new(claims.usuario_id)?;

    let person = create_person_repository(&state.db)
        .create(&new)
        .await
        .map_err(|e| ApiError::from_db(e, &MESSAGES))?;

    info!(person_id = person.id, created_by = claims.usuario_id, "Person created");
    Ok(Envelope::created("Pessoa criada com sucesso.", person))
}

async fn update_person(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdatePersonRequest>,
) -> Result<Envelope<Person>, ApiError> {
    let id = path_id(&id)?;
    request.validate()?;

    let update = request.into_update()?;
    if update.is_empty() {
        return Err(ApiError::BadRequest(
            "Nenhum dado enviado para atualização".to_string(),
        ));
    }

    let person = create_person_repository(&state.db)
        .update(id, &update)
        .await
        .map_err(|e| ApiError::from_db(e, &MESSAGES))?
        .ok_or_else(|| {
            ApiError::NotFound("Pessoa não encontrada ou nenhum dado atualizado".to_string())
        })?;

    info!(person_id = id, updated_by = claims.usuario_id, "Person updated");
    Ok(Envelope::ok(person).message("Pessoa atualizada com sucesso."))
}

async fn delete_person(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Envelope<()>, ApiError> {
    let id = path_id(&id)?;

    let deleted = create_person_repository(&state.db)
        .delete(id)
        .await
        .map_err(|e| ApiError::from_db(e, &MESSAGES))?;
    if !deleted {
        return Err(not_found());
    }

    info!(person_id = id, deleted_by = claims.usuario_id, "Person deleted");
    Ok(Envelope::message_only(
        StatusCode::OK,
        "Pessoa apagada com sucesso",
    ))
}
