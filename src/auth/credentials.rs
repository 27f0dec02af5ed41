use std::sync::Arc;
use tokio::sync::OnceCell;
use uuid::Uuid;

use super::password::{HashError, PasswordHasher};
use crate::models::{normalize_email, NewUser, User, UserCredentials};
use crate::store::{StoreError, UserRepository};

/// Registration and lookup of user identities.
///
/// Owns email normalization and password hashing, so nothing else ever writes a
/// password hash. Lookups return the hash only through
/// [`CredentialStore::find_credentials_by_email`].
#[derive(Clone)]
pub struct CredentialStore {
    repository: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    /// Digest checked when the email is unknown, so both login failures cost one bcrypt run.
    decoy: Arc<OnceCell<String>>,
}

impl CredentialStore {
    pub fn new(repository: Arc<dyn UserRepository>, hasher: PasswordHasher) -> Self {
        Self {
            repository,
            hasher,
            decoy: Arc::new(OnceCell::new()),
        }
    }

    /// Registers a new account.
    pub async fn create(&self, name: &str, email: &str, password: &str) -> Result<User, StoreError> {
        let name = name.trim();
        let email = normalize_email(email);
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(StoreError::ValidationFailed(
                "name, email and password are required".into(),
            ));
        }

        let password_hash = self.hash_off_thread(password.to_owned()).await?;
        let user = self
            .repository
            .insert(NewUser {
                name: name.to_owned(),
                email,
                password_hash,
            })
            .await?;

        log::info!("registered user {}", user.id);
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.repository.find_by_email(&normalize_email(email)).await
    }

    /// Same lookup as [`CredentialStore::find_by_email`], with the password hash included.
    pub async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, StoreError> {
        self.repository.find_credentials(&normalize_email(email)).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        self.repository.find_by_id(id).await
    }

    /// Checks an email/password pair. Unknown email and wrong password both yield `None`.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>, StoreError> {
        let Some(credentials) = self.find_credentials_by_email(email).await? else {
            let decoy = self
                .decoy
                .get_or_try_init(|| self.hash_off_thread(Uuid::new_v4().to_string()))
                .await?;
            self.verify_off_thread(password.to_owned(), decoy.clone()).await?;
            return Ok(None);
        };

        let matches = self
            .verify_off_thread(password.to_owned(), credentials.password_hash)
            .await?;
        Ok(matches.then_some(credentials.user))
    }

    // bcrypt blocks for the whole cost factor; keep it off the async workers.
    async fn hash_off_thread(&self, password: String) -> Result<String, HashError> {
        let hasher = self.hasher;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| HashError(e.to_string()))?
    }

    async fn verify_off_thread(&self, password: String, digest: String) -> Result<bool, HashError> {
        let hasher = self.hasher;
        tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
            .await
            .map_err(|e| HashError(e.to_string()))?
    }
}
