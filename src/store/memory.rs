//! In-process repositories used by the test suite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, TaskRepository, UserRepository};
use crate::models::{NewTask, NewUser, Task, TaskFilter, TaskStats, TaskUpdate, User, UserCredentials};

/// Users keyed by id. Email uniqueness is checked under the write lock.
#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<Uuid, UserCredentials>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|existing| existing.user.email == user.email) {
            return Err(StoreError::EmailTaken);
        }

        let now = Utc::now();
        let record = UserCredentials {
            user: User {
                id: Uuid::new_v4(),
                name: user.name,
                email: user.email,
                created_at: now,
                updated_at: now,
            },
            password_hash: user.password_hash,
        };
        let created = record.user.clone();
        users.insert(created.id, record);
        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.find_credentials(email).await?.map(|record| record.user))
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<UserCredentials>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|record| record.user.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.get(&id).map(|record| record.user.clone()))
    }
}

#[derive(Default)]
pub struct MemoryTaskRepository {
    tasks: RwLock<HashMap<Uuid, Task>>,
}

impl MemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for MemoryTaskRepository {
    async fn list(&self, owner_id: Uuid, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        let mut owned: Vec<Task> = tasks
            .values()
            .filter(|task| task.owner_id == owner_id && filter.matches(task))
            .cloned()
            .collect();
        filter.sort(&mut owned);
        Ok(owned)
    }

    async fn get(&self, owner_id: Uuid, task_id: Uuid) -> Result<Option<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        Ok(tasks
            .get(&task_id)
            .filter(|task| task.owner_id == owner_id)
            .cloned())
    }

    async fn insert(&self, owner_id: Uuid, task: NewTask) -> Result<Task, StoreError> {
        let task = Task::new(owner_id, task);
        self.tasks.write().await.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update(
        &self,
        owner_id: Uuid,
        task_id: Uuid,
        changes: &TaskUpdate,
    ) -> Result<Option<Task>, StoreError> {
        let mut tasks = self.tasks.write().await;
        match tasks.get_mut(&task_id) {
            Some(task) if task.owner_id == owner_id => {
                changes.apply(task);
                Ok(Some(task.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, owner_id: Uuid, task_id: Uuid) -> Result<Option<Task>, StoreError> {
        let mut tasks = self.tasks.write().await;
        if !tasks.get(&task_id).is_some_and(|task| task.owner_id == owner_id) {
            return Ok(None);
        }
        Ok(tasks.remove(&task_id))
    }

    async fn stats(&self, owner_id: Uuid, now: DateTime<Utc>) -> Result<TaskStats, StoreError> {
        let tasks = self.tasks.read().await;
        Ok(TaskStats::tally(
            tasks.values().filter(|task| task.owner_id == owner_id),
            now,
        ))
    }
}
