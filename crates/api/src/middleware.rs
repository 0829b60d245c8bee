use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use hrkit_auth::User;
use std::sync::Arc;

use crate::{error::ApiError, AppState};

/// Extract and validate the bearer token from the Authorization header
pub async fn extract_user_from_token(state: &AppState, headers: &HeaderMap) -> Result<User, ApiError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Unauthorized("Missing or invalid Authorization header".to_string()))?;

    Ok(state.auth_service.validate(token.trim()).await?)
}

/// Middleware to require authentication
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = extract_user_from_token(&state, request.headers()).await?;

    // Store user in request extensions for handlers to access
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
