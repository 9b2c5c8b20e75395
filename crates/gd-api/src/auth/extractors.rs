//! Axum extractors for authentication.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use gd_core::Claims;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Returns the token of an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively. An empty token counts as absent.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.trim()).filter(|t| !t.is_empty())
}

/// Extractor for authenticated callers.
///
/// Verifies the bearer token against the application's token issuer and
/// yields its claims. Rejects with 401 when the header is missing or the
/// token is invalid or expired.
///
/// # Example
///
/// ```ignore
/// async fn protected_endpoint(
///     AuthenticatedUser(claims): AuthenticatedUser,
/// ) -> impl IntoResponse {
///     format!("Olá, {}!", claims.usuario_nome)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl AuthenticatedUser {
    /// Id of the caller, recorded as the creator of new records.
    pub fn id(&self) -> i64 {
        self.0.usuario_id
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let Some(token) = bearer_token(&parts.headers) else {
            debug!(uri = %parts.uri, "Request without bearer token");
            return Err(ApiError::Unauthorized("Token não fornecido.".to_string()));
        };

        match app_state.tokens.verify(token) {
            Ok(claims) => Ok(AuthenticatedUser(claims)),
            Err(err) => {
                warn!(uri = %parts.uri, error = %err, "Rejected access token");
                Err(ApiError::from(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&headers("bearer  abc.def ")), Some("abc.def"));
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwdw==")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
