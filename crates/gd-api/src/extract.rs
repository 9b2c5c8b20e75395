//! Request extractors shared by the route handlers.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::{header::HOST, request::Parts},
    Json,
};
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use tracing::debug;

use crate::error::ApiError;

/// Header set by reverse proxies that terminate TLS.
pub const FORWARDED_PROTO_HEADER: &str = "X-Forwarded-Proto";

/// JSON body extractor whose rejections render as the error envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => {
                debug!(error = %rejection.body_text(), "Rejected request body");
                Err(match rejection {
                    JsonRejection::MissingJsonContentType(_) => ApiError::BadRequest(
                        "Envie o corpo da requisição como application/json".to_string(),
                    ),
                    JsonRejection::JsonSyntaxError(_) => {
                        ApiError::BadRequest("JSON malformado".to_string())
                    }
                    _ => ApiError::BadRequest(
                        "Todos os campos obrigatórios devem ser preenchidos".to_string(),
                    ),
                })
            }
        }
    }
}

/// Scheme and host the client used to reach the API, for building absolute links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin {
    pub scheme: String,
    pub host: String,
}

impl RequestOrigin {
    /// `scheme://host`, without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }

    fn from_parts(parts: &Parts) -> Self {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        // Proxies may append to the header; the first entry is the client-facing one.
        let scheme = header(FORWARDED_PROTO_HEADER)
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .unwrap_or_else(|| "http".to_string());

        let host = header(HOST.as_str())
            .map(String::from)
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))
            .unwrap_or_else(|| "localhost".to_string());

        Self { scheme, host }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestOrigin
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}
