use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StoreError;
use crate::store::{CredentialStore, User};

/// Process-lifetime store keeping users in registration order.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    users: RwLock<Vec<User>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn exists(&self, username: &str) -> Result<bool, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().any(|u| u.username == username))
    }

    async fn add(&self, user: User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        debug!("Adding user {}", user.username);
        users.push(user);
        Ok(())
    }

    async fn find(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn insert_if_absent(&self, user: User) -> Result<bool, StoreError> {
        // Check and append under one write guard so concurrent registrations
        // of the same name cannot both succeed.
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == user.username) {
            return Ok(false);
        }
        debug!("Inserting user {}", user.username);
        users.push(user);
        Ok(true)
    }

    async fn len(&self) -> Result<usize, StoreError> {
        Ok(self.users.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test_log::test(tokio::test)]
    async fn test_add_and_find() {
        let store = InMemoryCredentialStore::new();
        assert!(!store.exists("alice").await.unwrap());

        store.add(User::new("alice", "hash-a")).await.unwrap();

        assert!(store.exists("alice").await.unwrap());
        let found = store.find("alice").await.unwrap().unwrap();
        assert_eq!(found.password_hash, "hash-a");
        assert!(store.find("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_usernames_are_case_sensitive() {
        let store = InMemoryCredentialStore::new();
        store.add(User::new("Alice", "hash")).await.unwrap();

        assert!(store.exists("Alice").await.unwrap());
        assert!(!store.exists("alice").await.unwrap());
        assert!(store.find("ALICE").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_does_not_enforce_uniqueness() {
        let store = InMemoryCredentialStore::new();
        store.add(User::new("alice", "first")).await.unwrap();
        store.add(User::new("alice", "second")).await.unwrap();

        assert_eq!(store.len().await.unwrap(), 2);
        // Lookups return the earliest registration.
        assert_eq!(store.find("alice").await.unwrap().unwrap().password_hash, "first");
    }

    #[tokio::test]
    async fn test_insert_if_absent() {
        let store = InMemoryCredentialStore::new();
        assert!(store.insert_if_absent(User::new("alice", "first")).await.unwrap());
        assert!(!store.insert_if_absent(User::new("alice", "second")).await.unwrap());

        assert_eq!(store.len().await.unwrap(), 1);
        assert_eq!(store.find("alice").await.unwrap().unwrap().password_hash, "first");
    }

    #[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 4))]
    async fn test_concurrent_insert_if_absent_keeps_one() {
        let store = Arc::new(InMemoryCredentialStore::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .insert_if_absent(User::new("racer", format!("hash-{}", i)))
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut inserted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                inserted += 1;
            }
        }

        assert_eq!(inserted, 1);
        assert_eq!(store.len().await.unwrap(), 1);
    }
}
