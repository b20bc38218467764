use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::identity::{AccountRef, AccountRole, Identity};

use super::RepositoryError;

/// Account lookup consumed by identity resolution.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_account(&self, account: &AccountRef) -> Result<Option<Identity>, RepositoryError>;
}

#[derive(Default)]
pub struct InMemoryIdentityStore {
    accounts: RwLock<HashMap<AccountRef, Identity>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an account. Malformed ids are skipped with a warning.
    pub async fn insert(&self, id: &str, name: &str, role: AccountRole) {
        let Some(account) = AccountRef::parse(id) else {
            tracing::warn!(account = %id, "Skipping account with malformed id");
            return;
        };

        let identity = Identity {
            id: account.clone(),
            name: name.to_string(),
            role,
        };

        self.accounts.write().await.insert(account, identity);
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn find_account(&self, account: &AccountRef) -> Result<Option<Identity>, RepositoryError> {
        Ok(self.accounts.read().await.get(account).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = InMemoryIdentityStore::new();
        store.insert("v1", "Quick Print", AccountRole::Vendor).await;

        let found = store
            .find_account(&AccountRef::parse("v1").unwrap())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.name, "Quick Print");
        assert_eq!(found.role, AccountRole::Vendor);
    }

    #[tokio::test]
    async fn test_malformed_insert_is_ignored() {
        let store = InMemoryIdentityStore::new();
        store.insert("bad id", "Nobody", AccountRole::Customer).await;
        assert!(store.accounts.read().await.is_empty());
    }
}
