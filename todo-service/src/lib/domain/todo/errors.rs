use thiserror::Error;

/// Error for TodoId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TodoIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for TodoTitle validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TodoTitleError {
    #[error("Title must not be empty")]
    Empty,

    #[error("Title too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for to-do listing filters
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TodoFilterError {
    #[error("{field} must not be negative")]
    Negative { field: &'static str },
}

/// Top-level error for all to-do operations
#[derive(Debug, Clone, Error)]
pub enum TodoError {
    #[error("Invalid to-do ID: {0}")]
    InvalidTodoId(#[from] TodoIdError),

    #[error("Invalid title: {0}")]
    InvalidTitle(#[from] TodoTitleError),

    #[error("Invalid filter: {0}")]
    InvalidFilter(#[from] TodoFilterError),

    #[error("ToDo not found: {0}")]
    NotFound(String),

    #[error("ToDo does not belong to current user")]
    NotOwned,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for TodoError {
    fn from(err: anyhow::Error) -> Self {
        TodoError::Unknown(err.to_string())
    }
}
