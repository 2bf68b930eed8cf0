use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::MessageResponseData;
use crate::domain::user::models::EmailAddress;
use crate::inbound::http::router::AppState;

pub async fn recover_password(
    State(state): State<AppState>,
    Json(body): Json<PasswordRecoveryRequest>,
) -> Result<ApiSuccess<MessageResponseData>, ApiError> {
    let email =
        EmailAddress::new(body.email).map_err(|e| ApiError::UnprocessableEntity(e.to_string()))?;

    state
        .auth_service
        .request_password_reset(&email)
        .await
        .map_err(ApiError::from)
        .map(|_| {
            ApiSuccess::new(
                StatusCode::CREATED,
                MessageResponseData::new("Password recovery email sent"),
            )
        })
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<PasswordResetRequest>,
) -> Result<ApiSuccess<MessageResponseData>, ApiError> {
    state
        .auth_service
        .complete_reset(&body.token, &body.password)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, MessageResponseData::new("Password updated")))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PasswordRecoveryRequest {
    email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PasswordResetRequest {
    token: String,
    password: String,
}
