use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::UserResponseData;
use crate::domain::auth::guard;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::user::errors::EmailError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::UserId;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

const DEFAULT_PAGE_LIMIT: i64 = 100;

pub async fn register_user(
    State(state): State<AppState>,
    Json(body): Json<RegisterUserRequest>,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    state
        .auth_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<ApiSuccess<Vec<UserResponseData>>, ApiError> {
    let (offset, limit) = query.validate()?;

    state
        .user_service
        .list_users(offset, limit)
        .await
        .map_err(ApiError::from)
        .map(|users| {
            ApiSuccess::new(
                StatusCode::OK,
                users.iter().map(UserResponseData::from).collect(),
            )
        })
}

pub async fn get_me(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiSuccess<UserResponseData> {
    ApiSuccess::new(StatusCode::OK, (&user).into())
}

pub async fn update_me(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    state
        .user_service
        .update_user(&user.id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

pub async fn delete_me(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<StatusCode, ApiError> {
    state
        .user_service
        .delete_user(&user.id)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}

pub async fn get_user(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    guard::ensure_user_access(&actor, &user_id)?;

    state
        .user_service
        .get_user(&user_id)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(user_id): Path<String>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    guard::ensure_user_access(&actor, &user_id)?;

    state
        .user_service
        .update_user(&user_id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    guard::ensure_user_access(&actor, &user_id)?;

    state
        .user_service
        .delete_user(&user_id)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}

fn parse_user_id(raw: &str) -> Result<UserId, ApiError> {
    UserId::from_string(raw).map_err(|e| ApiError::UnprocessableEntity(e.to_string()))
}

/// HTTP request body for self-registration (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterUserRequest {
    email: String,
    password: String,
    #[serde(default)]
    full_name: Option<String>,
}

#[derive(Debug, Clone, Error)]
enum ParseUserRequestError {
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),
}

impl From<ParseUserRequestError> for ApiError {
    fn from(err: ParseUserRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

impl RegisterUserRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ParseUserRequestError> {
        Ok(RegisterCommand {
            email: EmailAddress::new(self.email)?,
            full_name: self.full_name,
            password: self.password,
        })
    }
}

/// HTTP request body for updating a user; absent fields stay unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

impl UpdateUserRequest {
    fn try_into_command(self) -> Result<UpdateUserCommand, ParseUserRequestError> {
        Ok(UpdateUserCommand {
            email: self.email.map(EmailAddress::new).transpose()?,
            full_name: self.full_name,
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PaginationQuery {
    #[serde(default)]
    offset: Option<i64>,
    #[serde(default)]
    limit: Option<i64>,
}

impl PaginationQuery {
    fn validate(&self) -> Result<(i64, i64), ApiError> {
        let offset = self.offset.unwrap_or(0);
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        if offset < 0 || limit < 0 {
            return Err(ApiError::UnprocessableEntity(
                "offset and limit must not be negative".to_string(),
            ));
        }
        Ok((offset, limit))
    }
}
