//! SQLite persistence for todos.
//!
//! The pool is created once at startup and handed to handlers through
//! `AppState`; every repository call runs in its own statement or
//! transaction. `init_schema` is idempotent.

use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::error::DbError;
use crate::models::{Todo, TodoCreate, TodoUpdate};

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS todos (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT    NOT NULL,
    description TEXT    NOT NULL DEFAULT '',
    completed   BOOLEAN NOT NULL DEFAULT 0,
    created_at  TEXT    NOT NULL
);
CREATE INDEX IF NOT EXISTS ix_todos_title ON todos (title);
"#;

const COLUMNS: &str = "id, title, description, completed, created_at";

pub type DbResult<T> = Result<T, DbError>;

/// Open a pool against `database_url` and make sure the schema exists.
pub async fn connect(database_url: &str) -> DbResult<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(DEFAULT_MAX_CONNECTIONS)
        .connect(database_url)
        .await?;
    init_schema(&pool).await?;
    Ok(pool)
}

/// Single-connection in-memory store. The connection is never recycled,
/// since closing it would drop the database.
pub async fn connect_in_memory() -> DbResult<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    init_schema(&pool).await?;
    Ok(pool)
}

pub async fn init_schema(pool: &SqlitePool) -> DbResult<()> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}

/// Todo repository over a shared pool.
#[derive(Debug, Clone)]
pub struct TodoRepo {
    pool: SqlitePool,
}

impl TodoRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[cfg(test)]
    fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// All todos in insertion order.
    pub async fn list(&self) -> DbResult<Vec<Todo>> {
        let todos = sqlx::query_as::<_, Todo>(&format!("SELECT {COLUMNS} FROM todos ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(todos)
    }

    pub async fn get(&self, id: i64) -> DbResult<Todo> {
        sqlx::query_as::<_, Todo>(&format!("SELECT {COLUMNS} FROM todos WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::NotFound { id })
    }

    pub async fn insert(&self, input: &TodoCreate) -> DbResult<Todo> {
        let todo = insert_with(&self.pool, input).await?;
        tracing::info!(id = todo.id, title = %todo.title, "created todo");
        Ok(todo)
    }

    /// Insert every item in one transaction. Either all rows commit or none.
    pub async fn insert_many(&self, inputs: &[TodoCreate]) -> DbResult<Vec<Todo>> {
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(inputs.len());
        for input in inputs {
            created.push(insert_with(&mut *tx, input).await?);
        }
        tx.commit().await?;

        tracing::info!(count = created.len(), "created todos");
        Ok(created)
    }

    /// Overwrite only the fields present in `changes`.
    pub async fn update(&self, id: i64, changes: &TodoUpdate) -> DbResult<Todo> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "UPDATE todos SET \
                 title = COALESCE(?, title), \
                 description = COALESCE(?, description), \
                 completed = COALESCE(?, completed) \
             WHERE id = ? \
             RETURNING {COLUMNS}"
        ))
        .bind(changes.title.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.completed)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound { id })?;

        tracing::info!(id, completed = todo.completed, "updated todo");
        Ok(todo)
    }

    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound { id });
        }

        tracing::info!(id, "deleted todo");
        Ok(())
    }
}

async fn insert_with<'e, E>(executor: E, input: &TodoCreate) -> DbResult<Todo>
where
    E: Executor<'e, Database = Sqlite>,
{
    let todo = sqlx::query_as::<_, Todo>(&format!(
        "INSERT INTO todos (title, description, completed, created_at) \
         VALUES (?, ?, 0, ?) \
         RETURNING {COLUMNS}"
    ))
    .bind(input.title())
    .bind(input.description())
    .bind(Utc::now())
    .fetch_one(executor)
    .await?;
    Ok(todo)
}
