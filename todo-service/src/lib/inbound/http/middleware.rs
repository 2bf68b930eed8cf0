use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::identity::require_active;
use crate::domain::user::models::User;
use crate::inbound::http::router::AppState;

/// Extension type carrying the authenticated, active user of a request
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Middleware that resolves the bearer token to an active user and adds it
/// to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(&req)?.to_string();

    let user = state
        .auth_service
        .resolve_identity(&token)
        .await
        .and_then(require_active)
        .map_err(|e| {
            tracing::warn!(error = %e, "Bearer token rejected");
            ApiError::from(e)
        })?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, ApiError> {
    let not_authenticated = || ApiError::from(AuthError::NotAuthenticated);

    let auth_str = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(not_authenticated)?
        .to_str()
        .map_err(|_| not_authenticated())?;

    auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(not_authenticated)
}
