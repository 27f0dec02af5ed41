use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::{StoreError, TaskRepository};
use crate::models::{NewTask, Task, TaskFilter, TaskInput, TaskStats, TaskUpdate};

/// Ownership-scoped task operations.
///
/// Validates input, applies defaults, and turns "absent for this owner" into
/// [`StoreError::NotFound`], whether the task is missing or belongs to someone else.
#[derive(Clone)]
pub struct TaskStore {
    repository: Arc<dyn TaskRepository>,
}

impl TaskStore {
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self, owner_id: Uuid, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        self.repository.list(owner_id, filter).await
    }

    pub async fn get(&self, owner_id: Uuid, task_id: Uuid) -> Result<Task, StoreError> {
        self.repository
            .get(owner_id, task_id)
            .await?
            .ok_or(StoreError::NotFound)
    }

    pub async fn create(&self, owner_id: Uuid, input: TaskInput) -> Result<Task, StoreError> {
        input
            .validate()
            .map_err(|e| StoreError::ValidationFailed(e.to_string()))?;
        self.repository.insert(owner_id, NewTask::from(input)).await
    }

    pub async fn update(
        &self,
        owner_id: Uuid,
        task_id: Uuid,
        mut changes: TaskUpdate,
    ) -> Result<Task, StoreError> {
        changes
            .validate()
            .map_err(|e| StoreError::ValidationFailed(e.to_string()))?;
        changes.title = changes.title.map(|title| title.trim().to_string());

        self.repository
            .update(owner_id, task_id, &changes)
            .await?
            .ok_or(StoreError::NotFound)
    }

    pub async fn delete(&self, owner_id: Uuid, task_id: Uuid) -> Result<Task, StoreError> {
        self.repository
            .delete(owner_id, task_id)
            .await?
            .ok_or(StoreError::NotFound)
    }

    /// Counters for the owner's profile, with "upcoming" measured from now.
    pub async fn stats(&self, owner_id: Uuid) -> Result<TaskStats, StoreError> {
        self.repository.stats(owner_id, Utc::now()).await
    }
}
