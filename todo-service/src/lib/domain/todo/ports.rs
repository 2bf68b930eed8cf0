use async_trait::async_trait;

use crate::domain::todo::errors::TodoError;
use crate::domain::todo::models::CreateTodoCommand;
use crate::domain::todo::models::Todo;
use crate::domain::todo::models::TodoFilter;
use crate::domain::todo::models::TodoId;
use crate::domain::todo::models::UpdateTodoCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Port for to-do domain service operations.
///
/// Every operation on an existing to-do is scoped to its owner: a foreign
/// to-do yields `NotOwned` even for superusers.
#[async_trait]
pub trait TodoServicePort: Send + Sync + 'static {
    async fn create_todo(&self, owner: &User, command: CreateTodoCommand)
        -> Result<Todo, TodoError>;

    /// List the owner's to-dos in creation order.
    async fn list_todos(&self, owner: &User, filter: TodoFilter) -> Result<Vec<Todo>, TodoError>;

    /// # Errors
    /// * `NotFound` - To-do does not exist
    /// * `NotOwned` - To-do belongs to someone else
    async fn get_todo(&self, actor: &User, id: &TodoId) -> Result<Todo, TodoError>;

    /// # Errors
    /// * `NotFound` - To-do does not exist
    /// * `NotOwned` - To-do belongs to someone else
    async fn update_todo(
        &self,
        actor: &User,
        id: &TodoId,
        command: UpdateTodoCommand,
    ) -> Result<Todo, TodoError>;

    /// Mark a to-do as done.
    async fn resolve_todo(&self, actor: &User, id: &TodoId) -> Result<Todo, TodoError>;

    async fn delete_todo(&self, actor: &User, id: &TodoId) -> Result<(), TodoError>;
}

/// Persistence operations for to-dos.
#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    async fn create(&self, todo: Todo) -> Result<Todo, TodoError>;

    /// # Returns
    /// Optional to-do (None if not found)
    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, TodoError>;

    /// Owner's to-dos matching `filter`, oldest first, paged by the filter.
    async fn list_by_owner(
        &self,
        owner_id: &UserId,
        filter: &TodoFilter,
    ) -> Result<Vec<Todo>, TodoError>;

    /// # Errors
    /// * `NotFound` - To-do does not exist
    async fn update(&self, todo: Todo) -> Result<Todo, TodoError>;

    /// # Errors
    /// * `NotFound` - To-do does not exist
    async fn delete(&self, id: &TodoId) -> Result<(), TodoError>;
}
