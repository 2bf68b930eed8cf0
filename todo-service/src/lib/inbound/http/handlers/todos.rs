use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::TodoResponseData;
use crate::domain::todo::errors::TodoFilterError;
use crate::domain::todo::errors::TodoIdError;
use crate::domain::todo::errors::TodoTitleError;
use crate::domain::todo::models::CreateTodoCommand;
use crate::domain::todo::models::TodoFilter;
use crate::domain::todo::models::TodoId;
use crate::domain::todo::models::TodoTitle;
use crate::domain::todo::models::UpdateTodoCommand;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

pub async fn create_todo(
    State(state): State<AppState>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
    Json(body): Json<CreateTodoRequest>,
) -> Result<ApiSuccess<TodoResponseData>, ApiError> {
    state
        .todo_service
        .create_todo(&owner, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref todo| ApiSuccess::new(StatusCode::CREATED, todo.into()))
}

pub async fn list_todos(
    State(state): State<AppState>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
    Query(query): Query<ListTodosQuery>,
) -> Result<ApiSuccess<Vec<TodoResponseData>>, ApiError> {
    state
        .todo_service
        .list_todos(&owner, query.try_into_filter()?)
        .await
        .map_err(ApiError::from)
        .map(|todos| {
            ApiSuccess::new(
                StatusCode::OK,
                todos.iter().map(TodoResponseData::from).collect(),
            )
        })
}

pub async fn get_todo(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(todo_id): Path<String>,
) -> Result<ApiSuccess<TodoResponseData>, ApiError> {
    let todo_id = TodoId::from_string(&todo_id).map_err(ParseTodoRequestError::from)?;

    state
        .todo_service
        .get_todo(&actor, &todo_id)
        .await
        .map_err(ApiError::from)
        .map(|ref todo| ApiSuccess::new(StatusCode::OK, todo.into()))
}

pub async fn update_todo(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(todo_id): Path<String>,
    Json(body): Json<UpdateTodoRequest>,
) -> Result<ApiSuccess<TodoResponseData>, ApiError> {
    let todo_id = TodoId::from_string(&todo_id).map_err(ParseTodoRequestError::from)?;

    state
        .todo_service
        .update_todo(&actor, &todo_id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref todo| ApiSuccess::new(StatusCode::OK, todo.into()))
}

pub async fn resolve_todo(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(todo_id): Path<String>,
) -> Result<ApiSuccess<TodoResponseData>, ApiError> {
    let todo_id = TodoId::from_string(&todo_id).map_err(ParseTodoRequestError::from)?;

    state
        .todo_service
        .resolve_todo(&actor, &todo_id)
        .await
        .map_err(ApiError::from)
        .map(|ref todo| ApiSuccess::new(StatusCode::OK, todo.into()))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(todo_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let todo_id = TodoId::from_string(&todo_id).map_err(ParseTodoRequestError::from)?;

    state
        .todo_service
        .delete_todo(&actor, &todo_id)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}

#[derive(Debug, Clone, Error)]
enum ParseTodoRequestError {
    #[error("Invalid to-do ID: {0}")]
    Id(#[from] TodoIdError),

    #[error("Invalid title: {0}")]
    Title(#[from] TodoTitleError),

    #[error("Invalid filter: {0}")]
    Filter(#[from] TodoFilterError),
}

impl From<ParseTodoRequestError> for ApiError {
    fn from(err: ParseTodoRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

/// HTTP request body for creating a to-do (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateTodoRequest {
    title: String,
    #[serde(default)]
    description: Option<String>,
}

impl CreateTodoRequest {
    fn try_into_command(self) -> Result<CreateTodoCommand, ParseTodoRequestError> {
        Ok(CreateTodoCommand {
            title: TodoTitle::new(self.title)?,
            description: self.description,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    done: Option<bool>,
}

impl UpdateTodoRequest {
    fn try_into_command(self) -> Result<UpdateTodoCommand, ParseTodoRequestError> {
        Ok(UpdateTodoCommand {
            title: self.title.map(TodoTitle::new).transpose()?,
            description: self.description,
            done: self.done,
        })
    }
}

/// Query string of the to-do listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListTodosQuery {
    #[serde(default)]
    offset: Option<i64>,
    #[serde(default)]
    limit: Option<i64>,
    #[serde(default)]
    done: Option<bool>,
    #[serde(default)]
    start_datetime: Option<DateTime<Utc>>,
    #[serde(default)]
    end_datetime: Option<DateTime<Utc>>,
}

impl ListTodosQuery {
    fn try_into_filter(self) -> Result<TodoFilter, ParseTodoRequestError> {
        Ok(TodoFilter::new(
            self.offset,
            self.limit,
            self.done,
            self.start_datetime,
            self.end_datetime,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_title_is_rejected() {
        let request = CreateTodoRequest {
            title: "   ".to_string(),
            description: None,
        };

        assert!(matches!(
            request.try_into_command(),
            Err(ParseTodoRequestError::Title(TodoTitleError::Empty))
        ));
    }

    #[test]
    fn test_list_query_builds_filter() {
        let query = ListTodosQuery {
            done: Some(true),
            limit: Some(5),
            ..Default::default()
        };

        let filter = query.try_into_filter().expect("valid filter");
        assert_eq!(filter.offset, 0);
        assert_eq!(filter.limit, 5);
        assert_eq!(filter.done, Some(true));
    }

    #[test]
    fn test_list_query_rejects_negative_limit() {
        let query = ListTodosQuery {
            limit: Some(-3),
            ..Default::default()
        };

        assert!(matches!(
            query.try_into_filter(),
            Err(ParseTodoRequestError::Filter(_))
        ));
    }
}
