use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::env;
use std::sync::Arc;

use crate::presentation::http::dto::ApiResponse;

#[derive(Clone)]
pub struct AuthConfig {
    api_key: String,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, String> {
        let api_key = env::var("AUTH_API_KEY").map_err(|_| "AUTH_API_KEY not set".to_string())?;
        Ok(Self { api_key })
    }

    #[cfg(test)]
    pub fn with_key(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
        }
    }

    fn authorizes(&self, header_value: Option<&str>) -> bool {
        match header_value.and_then(|value| value.strip_prefix("Bearer ")) {
            Some(token) => token == self.api_key,
            None => false,
        }
    }
}

/// Bearer-token check for every document and batch route. Health stays
/// open.
pub async fn require_auth(
    State(config): State<Arc<AuthConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if !config.authorizes(authorization) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<()>::error(
                "UNAUTHORIZED",
                "Missing or invalid bearer token".to_string(),
                None,
            )),
        )
            .into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_bearer_token() {
        let config = AuthConfig::with_key("secret");
        assert!(config.authorizes(Some("Bearer secret")));
    }

    #[test]
    fn test_wrong_token_rejected() {
        let config = AuthConfig::with_key("secret");
        assert!(!config.authorizes(Some("Bearer other")));
    }

    #[test]
    fn test_missing_header_rejected() {
        let config = AuthConfig::with_key("secret");
        assert!(!config.authorizes(None));
    }

    #[test]
    fn test_non_bearer_scheme_rejected() {
        let config = AuthConfig::with_key("secret");
        assert!(!config.authorizes(Some("Basic secret")));
    }
}
