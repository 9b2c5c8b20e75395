//! User management routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use gd_core::{
    db::{create_user_repository, USER_DEFAULT_SORT, USER_SORT_COLUMNS},
    hash_password, User, MASTER_USER_ID,
};
use tracing::info;
use validator::Validate;

use super::{paginated, path_id};
use crate::auth::AuthenticatedUser;
use crate::dto::{CreateUserRequest, Envelope, ListParams, UpdateUserRequest};
use crate::error::{ApiError, EntityMessages};
use crate::extract::{ApiJson, RequestOrigin};
use crate::state::AppState;

const MESSAGES: EntityMessages = EntityMessages {
    not_found: "Usuário não encontrado",
    duplicate: "Esse usuário já está cadastrado",
    foreign_key: "Dados de referência do usuário estão incorretos",
    restricted: "Não é possível apagar o usuário porque ele está referenciado em outras tabelas.",
};

/// Creates the user management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

fn not_found() -> ApiError {
    ApiError::NotFound(MESSAGES.not_found.to_string())
}

/// The master row only backs foreign keys and is not managed through the API.
fn managed_id(raw: &str) -> Result<i64, ApiError> {
    let id = path_id(raw)?;
    if id == MASTER_USER_ID {
        return Err(not_found());
    }
    Ok(id)
}

async fn list_users(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    origin: RequestOrigin,
    Query(params): Query<ListParams>,
) -> Result<Envelope<Vec<User>>, ApiError> {
    let query = params.list_query(USER_DEFAULT_SORT, USER_SORT_COLUMNS)?;
    let page = create_user_repository(&state.db).list(&query).await?;

    Ok(paginated(
        page,
        &query,
        &origin,
        "/api/usuarios",
        "usuário(s)",
        "Nenhum usuário registrado",
    ))
}

async fn get_user(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Envelope<User>, ApiError> {
    let id = managed_id(&id)?;
    let user = create_user_repository(&state.db)
        .get(id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Envelope::ok(user).message("Usuário encontrado"))
}

async fn create_user(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> Result<Envelope<User>, ApiError> {
    request.validate()?;

    let password_hash = hash_password(request.usuario_senha.as_deref().unwrap_or_default())?;
    let new_user = request.into_new_user(password_hash)?;

    let user = create_user_repository(&state.db)
        .create(&new_user)
        .await
        .map_err(|e| ApiError::from_db(e, &MESSAGES))?;

    info!(user_id = user.id, created_by = claims.usuario_id, "User created");
    Ok(Envelope::created("Usuário criado com sucesso.", user))
}

async fn update_user(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> Result<Envelope<User>, ApiError> {
    let id = managed_id(&id)?;
    request.validate()?;

    let password_hash = request
        .usuario_senha
        .as_deref()
        .map(hash_password)
        .transpose()?;
    let update = request.into_update(password_hash)?;
    if update.is_empty() {
        return Err(ApiError::BadRequest(
            "Nenhum dado enviado para atualização".to_string(),
        ));
    }

    let user = create_user_repository(&state.db)
        .update(id, &update)
        .await
        .map_err(|e| ApiError::from_db(e, &MESSAGES))?
        .ok_or_else(|| {
            ApiError::NotFound("Usuário não encontrado ou nenhum dado atualizado".to_string())
        })?;

    info!(user_id = id, updated_by = claims.usuario_id, "User updated");
    Ok(Envelope::ok(user).message("Usuário atualizado com sucesso."))
}

async fn delete_user(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Envelope<()>, ApiError> {
    let id = managed_id(&id)?;

    let deleted = create_user_repository(&state.db)
        .delete(id)
        .await
        .map_err(|e| ApiError::from_db(e, &MESSAGES))?;
    if !deleted {
        return Err(not_found());
    }

    info!(user_id = id, deleted_by = claims.usuario_id, "User deleted");
    Ok(Envelope::message_only(
        StatusCode::OK,
        "Usuário apagado com sucesso",
    ))
}
