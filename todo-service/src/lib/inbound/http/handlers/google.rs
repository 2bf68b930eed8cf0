use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::TokenResponseData;
use super::UserResponseData;
use crate::inbound::http::router::AppState;

pub async fn login_google(
    State(state): State<AppState>,
    Json(body): Json<ProviderTokenRequest>,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    state
        .auth_service
        .login_with_provider(&body.access_token)
        .await
        .map_err(ApiError::from)
        .map(|pair| ApiSuccess::new(StatusCode::OK, pair.into()))
}

pub async fn register_google(
    State(state): State<AppState>,
    Json(body): Json<ProviderTokenRequest>,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    state
        .auth_service
        .register_with_provider(&body.access_token)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

/// Access token previously issued to the client by Google.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderTokenRequest {
    access_token: String,
}
