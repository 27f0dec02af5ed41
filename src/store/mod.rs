//! Persistence for users and tasks.
//!
//! Two repository traits describe what the service needs from a backing store:
//! [`UserRepository`] for identity records and [`TaskRepository`] for tasks.
//! [`postgres`] implements both on top of `sqlx`; [`memory`] implements both in
//! process for tests. Every `TaskRepository` method takes the owner id as a
//! mandatory first argument, so no call path can skip the ownership filter.

pub mod memory;
pub mod postgres;
pub mod tasks;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::password::HashError;
use crate::models::{NewTask, NewUser, Task, TaskFilter, TaskStats, TaskUpdate, User, UserCredentials};

pub use memory::{MemoryTaskRepository, MemoryUserRepository};
pub use postgres::{PgTaskRepository, PgUserRepository};
pub use tasks::TaskStore;

/// Failures surfaced by the credential store, the task store and their backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The input breaks a field rule; the client must fix it.
    #[error("validation failed: {0}")]
    ValidationFailed(String),
    /// Another account already uses this email.
    #[error("email already registered")]
    EmailTaken,
    /// Missing, or owned by someone else. Callers cannot tell which.
    #[error("record not found")]
    NotFound,
    #[error(transparent)]
    Hashing(#[from] HashError),
    /// The backing store could not be reached or rejected the statement.
    #[error("backing store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> StoreError {
        StoreError::Unavailable(error.to_string())
    }
}

/// Storage of identity records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persists `user`, failing with [`StoreError::EmailTaken`] on a duplicate email.
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;

    /// Looks up an account by its normalized email, without the password hash.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Looks up an account by its normalized email, including the password hash.
    async fn find_credentials(&self, email: &str) -> Result<Option<UserCredentials>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
}

/// Storage of tasks, always scoped to one owner.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn list(&self, owner_id: Uuid, filter: &TaskFilter) -> Result<Vec<Task>, StoreError>;

    async fn get(&self, owner_id: Uuid, task_id: Uuid) -> Result<Option<Task>, StoreError>;

    async fn insert(&self, owner_id: Uuid, task: NewTask) -> Result<Task, StoreError>;

    /// Applies `changes` to the task if `owner_id` owns it, returning the updated record.
    async fn update(
        &self,
        owner_id: Uuid,
        task_id: Uuid,
        changes: &TaskUpdate,
    ) -> Result<Option<Task>, StoreError>;

    /// Removes the task if `owner_id` owns it, returning the removed record.
    async fn delete(&self, owner_id: Uuid, task_id: Uuid) -> Result<Option<Task>, StoreError>;

    async fn stats(&self, owner_id: Uuid, now: DateTime<Utc>) -> Result<TaskStats, StoreError>;
}
