use bcrypt::{hash, verify};

/// Cost factor used when none is configured.
pub const DEFAULT_HASH_COST: u32 = 10;

/// Hashing or verification failed inside bcrypt (bad cost, malformed digest, ...).
#[derive(Debug, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct HashError(pub String);

/// Salted, one-way password hashing with an explicit bcrypt cost factor.
///
/// The cost is fixed at construction so tests can use a cheap hasher while
/// production keeps verification in the tens of milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Produces a salted digest of `password`.
    pub fn hash(&self, password: &str) -> Result<String, HashError> {
        hash(password, self.cost).map_err(|e| HashError(e.to_string()))
    }

    /// Checks `password` against a digest produced by [`PasswordHasher::hash`].
    pub fn verify(&self, password: &str, hashed_password: &str) -> Result<bool, HashError> {
        verify(password, hashed_password).map_err(|e| HashError(e.to_string()))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_COST)
    }
}
