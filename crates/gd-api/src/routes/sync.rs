//! Schema synchronization endpoint.

use axum::{extract::State, http::StatusCode, routing::get, Router};
use gd_core::db::{run_migrations, seed_defaults};
use tracing::info;

use crate::auth::AuthenticatedUser;
use crate::dto::Envelope;
use crate::error::ApiError;
use crate::state::AppState;

/// Creates the sync routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/sync", get(sync_schema))
}

/// Applies pending migrations and idempotent seeds.
async fn sync_schema(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> Result<Envelope<()>, ApiError> {
    run_migrations(&state.db).await?;
    let report = seed_defaults(&state.db, &state.master.seed_options()).await?;

    info!(
        requested_by = claims.usuario_id,
        master_user_created = report.master_user_created,
        organization_types = report.organization_types,
        person_types = report.person_types,
        "Schema synchronized"
    );

    Ok(Envelope::message_only(
        StatusCode::OK,
        "Tabelas sincronizadas com sucesso",
    ))
}
