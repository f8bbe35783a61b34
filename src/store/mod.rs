//! Credential storage for registered users.
//!
//! The service talks to the [`CredentialStore`] trait so the in-memory
//! backend can be swapped for a persistent one without touching the auth flow.

pub mod memory;
pub mod models;

use async_trait::async_trait;

use crate::error::StoreError;

pub use memory::InMemoryCredentialStore;
pub use models::{User, UserProfile};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// True iff a user with exactly this username is present.
    async fn exists(&self, username: &str) -> Result<bool, StoreError>;

    /// Appends without any uniqueness check.
    async fn add(&self, user: User) -> Result<(), StoreError>;

    async fn find(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Appends `user` unless the username is already taken, as one atomic step.
    /// Returns whether the user was inserted.
    async fn insert_if_absent(&self, user: User) -> Result<bool, StoreError>;

    async fn len(&self) -> Result<usize, StoreError>;
}
