use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::todo::errors::TodoFilterError;
use crate::domain::todo::errors::TodoIdError;
use crate::domain::todo::errors::TodoTitleError;
use crate::domain::user::models::UserId;

/// A task on a user's list. Ownership never changes after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Todo {
    pub id: TodoId,
    pub title: TodoTitle,
    pub description: Option<String>,
    pub done: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub owner_id: UserId,
}

impl Todo {
    pub fn new(owner_id: UserId, title: TodoTitle, description: Option<String>) -> Self {
        Self {
            id: TodoId::new(),
            title,
            description,
            done: false,
            created_at: Utc::now(),
            completed_at: None,
            owner_id,
        }
    }

    /// Flip completion state.
    ///
    /// `completed_at` is stamped on the transition to done, kept while the
    /// to-do stays done and cleared when it is reopened.
    pub fn set_done(&mut self, done: bool, now: DateTime<Utc>) {
        match (self.done, done) {
            (false, true) => self.completed_at = Some(now),
            (_, false) => self.completed_at = None,
            (true, true) => {}
        }
        self.done = done;
    }
}

/// To-do unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TodoId(pub Uuid);

impl TodoId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a to-do ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, TodoIdError> {
        Uuid::parse_str(s)
            .map(TodoId)
            .map_err(|e| TodoIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// To-do title value type
///
/// Non-blank, at most 255 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoTitle(String);

impl TodoTitle {
    const MAX_LENGTH: usize = 255;

    /// Create a new valid title.
    ///
    /// # Errors
    /// * `Empty` - Title is empty or whitespace only
    /// * `TooLong` - Title longer than 255 characters
    pub fn new(title: String) -> Result<Self, TodoTitleError> {
        if title.trim().is_empty() {
            return Err(TodoTitleError::Empty);
        }

        let length = title.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(TodoTitleError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        Ok(Self(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TodoTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to create a new to-do with domain types
#[derive(Debug)]
pub struct CreateTodoCommand {
    pub title: TodoTitle,
    pub description: Option<String>,
}

/// Command to update an existing to-do.
///
/// All fields are optional to support partial updates.
#[derive(Debug, Default)]
pub struct UpdateTodoCommand {
    pub title: Option<TodoTitle>,
    pub description: Option<String>,
    pub done: Option<bool>,
}

/// Listing criteria for a single owner's to-dos.
///
/// The creation window is inclusive on both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct TodoFilter {
    pub offset: i64,
    pub limit: i64,
    pub done: Option<bool>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
}

impl TodoFilter {
    pub const DEFAULT_LIMIT: i64 = 100;

    /// Build a filter, rejecting negative paging values.
    pub fn new(
        offset: Option<i64>,
        limit: Option<i64>,
        done: Option<bool>,
        created_from: Option<DateTime<Utc>>,
        created_to: Option<DateTime<Utc>>,
    ) -> Result<Self, TodoFilterError> {
        let offset = offset.unwrap_or(0);
        if offset < 0 {
            return Err(TodoFilterError::Negative { field: "offset" });
        }

        let limit = limit.unwrap_or(Self::DEFAULT_LIMIT);
        if limit < 0 {
            return Err(TodoFilterError::Negative { field: "limit" });
        }

        Ok(Self {
            offset,
            limit,
            done,
            created_from,
            created_to,
        })
    }

    /// Whether a to-do passes the `done` and creation-window criteria.
    pub fn matches(&self, todo: &Todo) -> bool {
        self.done.map_or(true, |done| todo.done == done)
            && self.created_from.map_or(true, |from| todo.created_at >= from)
            && self.created_to.map_or(true, |to| todo.created_at <= to)
    }
}

impl Default for TodoFilter {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: Self::DEFAULT_LIMIT,
            done: None,
            created_from: None,
            created_to: None,
        }
    }
}
