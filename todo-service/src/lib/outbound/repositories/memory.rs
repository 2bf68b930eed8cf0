use std::sync::Arc;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;

use async_trait::async_trait;

use crate::domain::todo::errors::TodoError;
use crate::domain::todo::models::Todo;
use crate::domain::todo::models::TodoFilter;
use crate::domain::todo::models::TodoId;
use crate::domain::todo::ports::TodoRepository;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    todos: Vec<Todo>,
}

/// Process-local store backing both repositories.
///
/// Users and to-dos share one lock so deleting a user and its to-dos is a
/// single step. Rows keep insertion order, which is creation order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, String> {
        self.tables
            .read()
            .map_err(|_| "in-memory store lock poisoned".to_string())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, String> {
        self.tables
            .write()
            .map_err(|_| "in-memory store lock poisoned".to_string())
    }
}

fn page<T: Clone>(items: impl Iterator<Item = T>, offset: i64, limit: i64) -> Vec<T> {
    items
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut tables = self.write().map_err(UserError::DatabaseError)?;

        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let tables = self.read().map_err(UserError::DatabaseError)?;
        Ok(tables.users.iter().find(|u| u.id == *id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let tables = self.read().map_err(UserError::DatabaseError)?;
        Ok(tables
            .users
            .iter()
            .find(|u| u.email.as_str() == email)
            .cloned())
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<User>, UserError> {
        let tables = self.read().map_err(UserError::DatabaseError)?;
        Ok(page(tables.users.iter().cloned(), offset, limit))
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut tables = self.write().map_err(UserError::DatabaseError)?;

        if tables
            .users
            .iter()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        let slot = tables
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(UserError::NotFound(user.id.to_string()))?;
        *slot = user.clone();

        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let mut tables = self.write().map_err(UserError::DatabaseError)?;

        let before = tables.users.len();
        tables.users.retain(|u| u.id != *id);
        if tables.users.len() == before {
            return Err(UserError::NotFound(id.to_string()));
        }

        tables.todos.retain(|t| t.owner_id != *id);
        Ok(())
    }
}

#[async_trait]
impl TodoRepository for InMemoryStore {
    async fn create(&self, todo: Todo) -> Result<Todo, TodoError> {
        let mut tables = self.write().map_err(TodoError::DatabaseError)?;

        // mirrors the foreign key on todos.owner_id
        if !tables.users.iter().any(|u| u.id == todo.owner_id) {
            return Err(TodoError::DatabaseError(format!(
                "owner {} does not exist",
                todo.owner_id
            )));
        }

        tables.todos.push(todo.clone());
        Ok(todo)
    }

    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, TodoError> {
        let tables = self.read().map_err(TodoError::DatabaseError)?;
        Ok(tables.todos.iter().find(|t| t.id == *id).cloned())
    }

    async fn list_by_owner(
        &self,
        owner_id: &UserId,
        filter: &TodoFilter,
    ) -> Result<Vec<Todo>, TodoError> {
        let tables = self.read().map_err(TodoError::DatabaseError)?;
        let owned = tables
            .todos
            .iter()
            .filter(|t| t.owner_id == *owner_id && filter.matches(t))
            .cloned();

        Ok(page(owned, filter.offset, filter.limit))
    }

    async fn update(&self, todo: Todo) -> Result<Todo, TodoError> {
        let mut tables = self.write().map_err(TodoError::DatabaseError)?;

        let slot = tables
            .todos
            .iter_mut()
            .find(|t| t.id == todo.id)
            .ok_or(TodoError::NotFound(todo.id.to_string()))?;
        *slot = todo.clone();

        Ok(todo)
    }

    async fn delete(&self, id: &TodoId) -> Result<(), TodoError> {
        let mut tables = self.write().map_err(TodoError::DatabaseError)?;

        let before = tables.todos.len();
        tables.todos.retain(|t| t.id != *id);
        if tables.todos.len() == before {
            return Err(TodoError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
