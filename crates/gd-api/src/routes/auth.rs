//! Login endpoint.

use axum::{extract::State, routing::post, Json, Router};
use gd_core::{db::create_user_repository, verify_password, TokenSubject, MASTER_USER_ID};
use tracing::{info, warn};

use crate::dto::{LoginRequest, LoginResponse};
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

/// Access level granted to the master account.
const MASTER_LEVEL: i32 = 1;

/// Creates the authentication routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Exchanges credentials for an access token.
///
/// The configured master account is checked first and never touches the
/// database; everyone else is looked up by email.
async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = request.email.as_deref().map(str::trim).unwrap_or_default();
    let password = request.senha.as_deref().unwrap_or_default();

    if email.is_empty() || password.is_empty() {
        return Err(ApiError::BadRequest(
            "Campos obrigatórios não enviados.".to_string(),
        ));
    }

    if state.master.matches(email, password) {
        let token = state.tokens.issue(&TokenSubject {
            id: MASTER_USER_ID,
            name: &state.master.name,
            email: &state.master.email,
            level: MASTER_LEVEL,
        })?;
        info!(user_id = MASTER_USER_ID, "Master account logged in");
        return Ok(Json(success(token)));
    }

    let repo = create_user_repository(&state.db);
    let user = repo
        .get_by_email(email)
        .await?
        .ok_or_else(|| ApiError::NotFound("Usuário não encontrado.".to_string()))?;

    if !user.active {
        warn!(user_id = user.id, "Login attempt on a deactivated account");
        return Err(ApiError::Forbidden("Usuário desativado.".to_string()));
    }

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = user.id, "Login attempt with a wrong password");
        return Err(ApiError::Unauthorized("Senha incorreta.".to_string()));
    }

    let token = state.tokens.issue(&TokenSubject {
        id: user.id,
        name: &user.name,
        email: &user.email,
        level: user.level,
    })?;

    info!(user_id = user.id, "User logged in");
    Ok(Json(success(token)))
}

fn success(token: String) -> LoginResponse {
    LoginResponse {
        status: 200,
        message: "Login bem-sucedido.".to_string(),
        token,
    }
}
