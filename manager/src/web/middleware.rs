//! Middleware for the web server
//!
//! Provides authentication and other cross-cutting concerns.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};

use crate::web::AppState;

/// Extractor that validates the bearer token from the Authorization header.
/// When no token is configured, the check is disabled (local development).
///
/// # Example
/// ```ignore
/// async fn my_handler(
///     _auth: BearerAuth,  // This validates the token
///     State(state): State<AppState>,
///     Json(request): Json<MyRequest>,
/// ) -> ApiResult<MyResponse> {
///     // Handler logic here - the token is already validated
/// }
/// ```
pub struct BearerAuth;

impl FromRequestParts<AppState> for BearerAuth {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config.api_token.as_deref() else {
            return Ok(BearerAuth);
        };

        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "));

        match auth_header {
            Some(token) if token == expected => Ok(BearerAuth),
            _ => Err(StatusCode::UNAUTHORIZED),
        }
    }
}
