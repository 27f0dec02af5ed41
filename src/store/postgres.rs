//! PostgreSQL repositories.
//!
//! Queries are built at runtime (`query_as`/`QueryBuilder`), so the crate compiles
//! without a database. Every task statement carries `owner_id = $n` in its WHERE clause.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{StoreError, TaskRepository, UserRepository};
use crate::models::task::UPCOMING_WINDOW_DAYS;
use crate::models::{
    NewTask, NewUser, Task, TaskFilter, TaskSort, TaskStats, TaskUpdate, User, UserCredentials,
};

const USER_COLUMNS: &str = "id, name, email, created_at, updated_at";

const TASK_COLUMNS: &str =
    "id, title, description, status, priority, due_date, owner_id, created_at, updated_at";

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (id, name, email, password_hash) VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db) = &e {
                    if db.is_unique_violation() {
                        return StoreError::EmailTaken;
                    }
                }
                StoreError::from(e)
            })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<UserCredentials>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1");
        let credentials = sqlx::query_as::<_, UserCredentials>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(credentials)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

#[derive(Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escapes `%`, `_` and the escape character itself for use inside an ILIKE pattern.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Builds the listing query for `owner_id`. Conditions are appended only for
/// the filter options that are set.
fn list_query(owner_id: Uuid, filter: &TaskFilter) -> QueryBuilder<'static, Postgres> {
    let mut query =
        QueryBuilder::new(format!("SELECT {TASK_COLUMNS} FROM tasks WHERE owner_id = "));
    query.push_bind(owner_id);

    if let Some(status) = filter.status {
        query.push(" AND status = ").push_bind(status);
    }
    if let Some(priority) = filter.priority {
        query.push(" AND priority = ").push_bind(priority);
    }
    if let Some(due_before) = filter.due_before {
        query.push(" AND due_date <= ").push_bind(due_before);
    }
    if let Some(due_after) = filter.due_after {
        query.push(" AND due_date >= ").push_bind(due_after);
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(search));
        query.push(" AND (title ILIKE ").push_bind(pattern.clone());
        if filter.search_description {
            query.push(" OR description ILIKE ").push_bind(pattern);
        }
        query.push(")");
    }

    query.push(match filter.sort {
        Some(TaskSort::DueDate) => " ORDER BY due_date ASC NULLS LAST, created_at DESC",
        Some(TaskSort::CreatedAt) | None => " ORDER BY created_at DESC",
    });
    query
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn list(&self, owner_id: Uuid, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        let tasks = list_query(owner_id, filter)
            .build_query_as::<Task>()
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn get(&self, owner_id: Uuid, task_id: Uuid) -> Result<Option<Task>, StoreError> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND owner_id = $2");
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(task_id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn insert(&self, owner_id: Uuid, task: NewTask) -> Result<Task, StoreError> {
        let task = Task::new(owner_id, task);
        let sql = format!(
            "INSERT INTO tasks ({TASK_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {TASK_COLUMNS}"
        );

        let created = sqlx::query_as::<_, Task>(&sql)
            .bind(task.id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.status)
            .bind(task.priority)
            .bind(task.due_date)
            .bind(task.owner_id)
            .bind(task.created_at)
            .bind(task.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn update(
        &self,
        owner_id: Uuid,
        task_id: Uuid,
        changes: &TaskUpdate,
    ) -> Result<Option<Task>, StoreError> {
        // $7 says whether due_date was present in the update at all, since
        // a present null must clear the column.
        let sql = format!(
            "UPDATE tasks SET \
                 title = COALESCE($3, title), \
                 description = COALESCE($4, description), \
                 status = COALESCE($5, status), \
                 priority = COALESCE($6, priority), \
                 due_date = CASE WHEN $7 THEN $8 ELSE due_date END, \
                 updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {TASK_COLUMNS}"
        );

        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(task_id)
            .bind(owner_id)
            .bind(changes.title.as_deref())
            .bind(changes.description.as_deref())
            .bind(changes.status)
            .bind(changes.priority)
            .bind(changes.due_date.is_some())
            .bind(changes.due_date.flatten())
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn delete(&self, owner_id: Uuid, task_id: Uuid) -> Result<Option<Task>, StoreError> {
        let sql =
            format!("DELETE FROM tasks WHERE id = $1 AND owner_id = $2 RETURNING {TASK_COLUMNS}");
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(task_id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn stats(&self, owner_id: Uuid, now: DateTime<Utc>) -> Result<TaskStats, StoreError> {
        let stats = sqlx::query_as::<_, TaskStats>(
            "SELECT COUNT(*) AS total, \
                    COUNT(*) FILTER (WHERE status = 'completed') AS completed, \
                    COUNT(*) FILTER (WHERE status = 'pending') AS pending, \
                    COUNT(*) FILTER (WHERE status = 'in_progress') AS in_progress, \
                    COUNT(*) FILTER (WHERE due_date BETWEEN $2 AND $3) AS upcoming \
             FROM tasks WHERE owner_id = $1",
        )
        .bind(owner_id)
        .bind(now)
        .bind(now + Duration::days(UPCOMING_WINDOW_DAYS))
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }
}
