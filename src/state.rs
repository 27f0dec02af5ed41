use sqlx::PgPool;
use std::sync::Arc;

use crate::auth::{CredentialStore, PasswordHasher, TokenService};
use crate::config::Config;
use crate::store::{
    MemoryTaskRepository, MemoryUserRepository, PgTaskRepository, PgUserRepository,
    TaskRepository, TaskStore, UserRepository,
};

/// Process-wide services shared by every request. Built once at startup and
/// never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub credentials: CredentialStore,
    pub tasks: TaskStore,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tasks: Arc<dyn TaskRepository>,
        tokens: TokenService,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            credentials: CredentialStore::new(users, hasher),
            tasks: TaskStore::new(tasks),
            tokens,
        }
    }

    /// State backed by PostgreSQL, with secret and hash cost taken from `config`.
    pub fn postgres(pool: PgPool, config: &Config) -> Self {
        Self::new(
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgTaskRepository::new(pool)),
            TokenService::new(config.jwt_secret.as_bytes()),
            PasswordHasher::new(config.bcrypt_cost),
        )
    }

    /// State backed by fresh in-memory repositories.
    pub fn in_memory(tokens: TokenService, hasher: PasswordHasher) -> Self {
        Self::new(
            Arc::new(MemoryUserRepository::new()),
            Arc::new(MemoryTaskRepository::new()),
            tokens,
            hasher,
        )
    }
}
