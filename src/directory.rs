//! User directory: registration, authentication, credential change
//!
//! The directory is a trait so the backend is pluggable; the in-memory
//! implementation is the process default. Secrets are stored as salted
//! SHA-256 hashes, never as plaintext.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::info;

use crate::error::DirectoryError;

/// An authenticated user, as seen by the session layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub identifier: String,
}

/// Credential storage contract.
///
/// Identifiers are unique and case-sensitive. No operation here touches
/// session state.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Add a new user. Fails with `DuplicateIdentifier` when the
    /// identifier is already registered; the first registration's secret
    /// is retained.
    async fn register(&self, identifier: &str, secret: &str) -> Result<(), DirectoryError>;

    /// Check credentials. An unknown identifier and a wrong secret are
    /// indistinguishable to the caller.
    async fn authenticate(&self, identifier: &str, secret: &str) -> Result<User, DirectoryError>;

    /// Replace a user's secret, proving the current one first.
    ///
    /// The old-secret proof is checked before the confirmation match, so a
    /// request that is wrong on both counts reports `WrongOldSecret`.
    async fn change_secret(
        &self,
        identifier: &str,
        old_secret: &str,
        new_secret: &str,
        confirm_secret: &str,
    ) -> Result<(), DirectoryError>;
}

#[derive(Debug)]
struct StoredUser {
    salt: [u8; 16],
    hash: String,
}

fn hash_secret(salt: &[u8; 16], secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// In-memory directory behind an async lock.
///
/// Mutations take the write lock across check-and-insert, so two
/// concurrent registrations of one identifier cannot both succeed.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    users: RwLock<HashMap<String, StoredUser>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for MemoryDirectory {
    async fn register(&self, identifier: &str, secret: &str) -> Result<(), DirectoryError> {
        let mut users = self.users.write().await;
        if users.contains_key(identifier) {
            return Err(DirectoryError::DuplicateIdentifier(identifier.to_string()));
        }
        let salt: [u8; 16] = rand::random();
        let hash = hash_secret(&salt, secret);
        users.insert(identifier.to_string(), StoredUser { salt, hash });
        info!("Registered user '{}'", identifier);
        Ok(())
    }

    async fn authenticate(&self, identifier: &str, secret: &str) -> Result<User, DirectoryError> {
        let users = self.users.read().await;
        let stored = users
            .get(identifier)
            .ok_or(DirectoryError::InvalidCredentials)?;
        if hash_secret(&stored.salt, secret) != stored.hash {
            return Err(DirectoryError::InvalidCredentials);
        }
        Ok(User {
            identifier: identifier.to_string(),
        })
    }

    async fn change_secret(
        &self,
        identifier: &str,
        old_secret: &str,
        new_secret: &str,
        confirm_secret: &str,
    ) -> Result<(), DirectoryError> {
        let mut users = self.users.write().await;
        let stored = users
            .get_mut(identifier)
            .ok_or(DirectoryError::InvalidCredentials)?;
        if hash_secret(&stored.salt, old_secret) != stored.hash {
            return Err(DirectoryError::WrongOldSecret);
        }
        if new_secret != confirm_secret {
            return Err(DirectoryError::ConfirmationMismatch);
        }
        let salt: [u8; 16] = rand::random();
        stored.hash = hash_secret(&salt, new_secret);
        stored.salt = salt;
        info!("Changed password for user '{}'", identifier);
        Ok(())
    }
}
