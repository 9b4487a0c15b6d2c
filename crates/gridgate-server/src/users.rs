//! In-memory user registry with argon2 password hashing.
//!
//! Durable credential storage is out of scope for the portal; this
//! registry is the seam a database-backed store would plug into. The
//! user record itself mirrors what the external sheet receives on
//! sync: username and email.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

/// Errors from user registration.
#[derive(Debug, Error)]
pub enum RegisterError {
    /// The username is already registered.
    #[error("username is already taken")]
    UsernameTaken,

    /// Password hashing failed.
    #[error("failed to hash password: {0}")]
    HashingFailed(String),
}

/// A registered local user.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub username: String,
    pub email: String,
    /// Argon2 PHC string.
    password_hash: String,
}

/// Process-local user store keyed by username.
#[derive(Default)]
pub struct UserRegistry {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a user. Fails if the username is taken.
    pub fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserRecord, RegisterError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| RegisterError::HashingFailed(e.to_string()))?
            .to_string();

        let record = UserRecord {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
        };

        let mut users = self.users.write().unwrap();
        if users.contains_key(username) {
            return Err(RegisterError::UsernameTaken);
        }
        users.insert(username.to_string(), record.clone());
        Ok(record)
    }

    /// Check a username/password pair.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let users = self.users.read().unwrap();
        let Some(record) = users.get(username) else {
            return false;
        };
        let Ok(parsed) = PasswordHash::new(&record.password_hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// Look up a user by username.
    pub fn get(&self, username: &str) -> Option<UserRecord> {
        self.users.read().unwrap().get(username).cloned()
    }
}
