use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::auth::guard;
use crate::domain::todo::errors::TodoError;
use crate::domain::todo::models::CreateTodoCommand;
use crate::domain::todo::models::Todo;
use crate::domain::todo::models::TodoFilter;
use crate::domain::todo::models::TodoId;
use crate::domain::todo::models::UpdateTodoCommand;
use crate::domain::todo::ports::TodoRepository;
use crate::domain::todo::ports::TodoServicePort;
use crate::domain::user::models::User;

/// Domain service implementation for to-do operations.
pub struct TodoService<TR>
where
    TR: TodoRepository,
{
    repository: Arc<TR>,
}

impl<TR> TodoService<TR>
where
    TR: TodoRepository,
{
    pub fn new(repository: Arc<TR>) -> Self {
        Self { repository }
    }

    /// Load a to-do and check the actor owns it.
    async fn owned_todo(&self, actor: &User, id: &TodoId) -> Result<Todo, TodoError> {
        let todo = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(TodoError::NotFound(id.to_string()))?;

        if !guard::can_access_todo(actor, &todo) {
            tracing::warn!(
                user_id = %actor.id,
                todo_id = %id,
                "Rejected access to foreign to-do"
            );
            return Err(TodoError::NotOwned);
        }

        Ok(todo)
    }
}

#[async_trait]
impl<TR> TodoServicePort for TodoService<TR>
where
    TR: TodoRepository,
{
    async fn create_todo(
        &self,
        owner: &User,
        command: CreateTodoCommand,
    ) -> Result<Todo, TodoError> {
        let todo = Todo::new(owner.id, command.title, command.description);

        let created = self.repository.create(todo).await?;
        tracing::info!(user_id = %owner.id, todo_id = %created.id, "ToDo created");

        Ok(created)
    }

    async fn list_todos(&self, owner: &User, filter: TodoFilter) -> Result<Vec<Todo>, TodoError> {
        self.repository.list_by_owner(&owner.id, &filter).await
    }

    async fn get_todo(&self, actor: &User, id: &TodoId) -> Result<Todo, TodoError> {
        self.owned_todo(actor, id).await
    }

    async fn update_todo(
        &self,
        actor: &User,
        id: &TodoId,
        command: UpdateTodoCommand,
    ) -> Result<Todo, TodoError> {
        let mut todo = self.owned_todo(actor, id).await?;

        if let Some(title) = command.title {
            todo.title = title;
        }

        if let Some(description) = command.description {
            todo.description = Some(description);
        }

        if let Some(done) = command.done {
            todo.set_done(done, Utc::now());
        }

        let updated = self.repository.update(todo).await?;
        tracing::info!(user_id = %actor.id, todo_id = %id, "ToDo updated");

        Ok(updated)
    }

    async fn resolve_todo(&self, actor: &User, id: &TodoId) -> Result<Todo, TodoError> {
        self.update_todo(
            actor,
            id,
            UpdateTodoCommand {
                done: Some(true),
                ..Default::default()
            },
        )
        .await
    }

    async fn delete_todo(&self, actor: &User, id: &TodoId) -> Result<(), TodoError> {
        self.owned_todo(actor, id).await?;
        self.repository.delete(id).await?;
        tracing::info!(user_id = %actor.id, todo_id = %id, "ToDo deleted");

        Ok(())
    }
}
