//! Client metadata extraction for the GraphQL endpoint.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, USER_AGENT};
use axum::http::request::Parts;
use axum::http::HeaderMap;

/// Per-request client data injected into the GraphQL context.
///
/// Extraction never fails: a missing or malformed `Authorization` header just
/// leaves `bearer_token` empty, and resolvers that need an authenticated admin
/// reject the call themselves.
///
/// ```ignore
/// async fn handler(client: ClientInfo) {
///     tracing::debug!(ip = ?client.ip_address, "request");
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    /// Token from `Authorization: Bearer <token>`.
    pub bearer_token: Option<String>,
    pub user_agent: Option<String>,
    /// First hop of `X-Forwarded-For`, else `X-Real-IP`.
    pub ip_address: Option<String>,
}

impl ClientInfo {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let bearer_token = header(AUTHORIZATION.as_str())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let ip_address = header("x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .or_else(|| header("x-real-ip").map(str::to_string));

        Self {
            bearer_token,
            user_agent: header(USER_AGENT.as_str()).map(str::to_string),
            ip_address,
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ClientInfo {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}
