use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::todo::errors::TodoError;
use crate::domain::todo::models::Todo;
use crate::domain::todo::models::TodoFilter;
use crate::domain::todo::models::TodoId;
use crate::domain::todo::models::TodoTitle;
use crate::domain::todo::ports::TodoRepository;
use crate::domain::user::models::UserId;

pub struct PostgresTodoRepository {
    pool: PgPool,
}

impl PostgresTodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TodoRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    done: bool,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    owner_id: Uuid,
}

impl TryFrom<TodoRow> for Todo {
    type Error = TodoError;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        Ok(Todo {
            id: TodoId(row.id),
            title: TodoTitle::new(row.title)?,
            description: row.description,
            done: row.done,
            created_at: row.created_at,
            completed_at: row.completed_at,
            owner_id: UserId(row.owner_id),
        })
    }
}

#[async_trait]
impl TodoRepository for PostgresTodoRepository {
    async fn create(&self, todo: Todo) -> Result<Todo, TodoError> {
        sqlx::query(
            r#"
            INSERT INTO todos (id, title, description, done, created_at, completed_at, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(todo.id.0)
        .bind(todo.title.as_str())
        .bind(todo.description.as_deref())
        .bind(todo.done)
        .bind(todo.created_at)
        .bind(todo.completed_at)
        .bind(todo.owner_id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| TodoError::DatabaseError(e.to_string()))?;

        Ok(todo)
    }

    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, TodoError> {
        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT id, title, description, done, created_at, completed_at, owner_id
            FROM todos
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TodoError::DatabaseError(e.to_string()))?;

        row.map(Todo::try_from).transpose()
    }

    async fn list_by_owner(
        &self,
        owner_id: &UserId,
        filter: &TodoFilter,
    ) -> Result<Vec<Todo>, TodoError> {
        let rows = sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT id, title, description, done, created_at, completed_at, owner_id
            FROM todos
            WHERE owner_id = $1
              AND ($2::BOOLEAN IS NULL OR done = $2)
              AND ($3::TIMESTAMPTZ IS NULL OR created_at >= $3)
              AND ($4::TIMESTAMPTZ IS NULL OR created_at <= $4)
            ORDER BY created_at, id
            OFFSET $5
            LIMIT $6
            "#,
        )
        .bind(owner_id.0)
        .bind(filter.done)
        .bind(filter.created_from)
        .bind(filter.created_to)
        .bind(filter.offset)
        .bind(filter.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TodoError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(Todo::try_from).collect()
    }

    async fn update(&self, todo: Todo) -> Result<Todo, TodoError> {
        let result = sqlx::query(
            r#"
            UPDATE todos
            SET title = $2, description = $3, done = $4, completed_at = $5
            WHERE id = $1
            "#,
        )
        .bind(todo.id.0)
        .bind(todo.title.as_str())
        .bind(todo.description.as_deref())
        .bind(todo.done)
        .bind(todo.completed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| TodoError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(TodoError::NotFound(todo.id.to_string()));
        }

        Ok(todo)
    }

    async fn delete(&self, id: &TodoId) -> Result<(), TodoError> {
        let result = sqlx::query(
            r#"
            DELETE FROM todos
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| TodoError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(TodoError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
