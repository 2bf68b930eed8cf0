use axum::extract::State;
use axum::http::StatusCode;
use axum::Form;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::MessageResponseData;
use super::TokenResponseData;
use crate::inbound::http::router::AppState;

/// OAuth2 password grant: `username` carries the email.
pub async fn login_access_token(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    state
        .auth_service
        .login(&form.username, &form.password)
        .await
        .map_err(ApiError::from)
        .map(|pair| ApiSuccess::new(StatusCode::CREATED, pair.into()))
}

pub async fn refresh_access_token(
    State(state): State<AppState>,
    Json(body): Json<RefreshTokenRequest>,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    state
        .auth_service
        .refresh(&body.grant_type, &body.token)
        .await
        .map_err(ApiError::from)
        .map(|access_token| {
            ApiSuccess::new(
                StatusCode::CREATED,
                TokenResponseData::bearer(access_token, None),
            )
        })
}

pub async fn verify_account(
    State(state): State<AppState>,
    Json(body): Json<VerifyAccountRequest>,
) -> Result<ApiSuccess<MessageResponseData>, ApiError> {
    state
        .auth_service
        .complete_verification(&body.token)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, MessageResponseData::new("Account verified")))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshTokenRequest {
    grant_type: String,
    token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifyAccountRequest {
    token: String,
}
