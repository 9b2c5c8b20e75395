//! API routes.

pub mod auth;
pub mod health;
pub mod organization_types;
pub mod organizations;
pub mod person_types;
pub mod persons;
pub mod propositions;
pub mod sync;
pub mod users;

use axum::{http::StatusCode, Router};
use gd_core::db::{ListQuery, PaginatedResult};
use serde::Serialize;

use crate::dto::{parse_id, Envelope, Links};
use crate::error::ApiError;
use crate::extract::RequestOrigin;
use crate::state::AppState;

/// Message for unknown routes.
pub const NOT_FOUND_MESSAGE: &str = "Endpoint não encontrado";

/// Creates the main API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .nest("/api", api_routes())
        .fallback(not_found)
        .with_state(state)
}

/// Routes under the /api prefix.
fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::routes())
        .merge(sync::routes())
        .nest("/usuarios", users::routes())
        .nest("/tipos-orgaos", organization_types::routes())
        .nest("/orgaos", organizations::routes())
        .merge(organizations::search_routes())
        .nest("/tipos-pessoas", person_types::routes())
        .nest("/pessoas", persons::routes())
        .merge(persons::search_routes())
        .merge(propositions::routes())
}

async fn not_found() -> Envelope<()> {
    Envelope::message_only(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
}

/// Parses an `:id` path segment.
pub(crate) fn path_id(raw: &str) -> Result<i64, ApiError> {
    parse_id(Some(raw), "ID inválido")
}

/// Wraps a page of records in the envelope with pagination links.
///
/// An empty page is a 200 carrying only `empty_message`.
pub(crate) fn paginated<T: Serialize>(
    page: PaginatedResult<T>,
    query: &ListQuery,
    origin: &RequestOrigin,
    path: &str,
    noun: &str,
    empty_message: &str,
) -> Envelope<Vec<T>> {
    if page.is_empty() {
        return Envelope {
            status: StatusCode::OK.as_u16(),
            message: Some(empty_message.to_string()),
            dados: None,
            links: None,
        };
    }

    let links = Links::for_listing(origin, path, query, page.total_pages);
    let message = format!("{} {} encontrado(s)", page.total, noun);
    Envelope::ok(page.items).message(message).links(links)
}

/// Wraps an unpaginated collection, with `empty_message` when it has no items.
pub(crate) fn collection<T: Serialize>(
    items: Vec<T>,
    noun: &str,
    empty_message: &str,
) -> Envelope<Vec<T>> {
    if items.is_empty() {
        return Envelope::ok(items).message(empty_message);
    }
    let message = format!("{} {} encontrado(s)", items.len(), noun);
    Envelope::ok(items).message(message)
}
