use std::sync::Arc;

use crate::store::{IdentityStore, RepositoryError};

use super::value_objects::{AccountRef, Identity};

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("account not found: {0}")]
    NotFound(String),

    #[error("identity lookup failed")]
    Store(#[source] RepositoryError),
}

/// Resolves customer references to display identities. Fails closed and
/// keeps no cache, so every lookup reflects the current account record.
#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn IdentityStore>,
}

impl IdentityResolver {
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    pub async fn resolve(&self, customer_ref: &str) -> Result<Identity, IdentityError> {
        let account_ref = AccountRef::parse(customer_ref)
            .ok_or_else(|| IdentityError::NotFound(customer_ref.to_string()))?;

        match self.store.find_account(&account_ref).await {
            Ok(Some(identity)) => Ok(identity),
            Ok(None) => Err(IdentityError::NotFound(customer_ref.to_string())),
            Err(e) => Err(IdentityError::Store(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::AccountRole;
    use crate::store::InMemoryIdentityStore;
    use async_trait::async_trait;

    struct BrokenStore;

    #[async_trait]
    impl IdentityStore for BrokenStore {
        async fn find_account(
            &self,
            _account: &AccountRef,
        ) -> Result<Option<Identity>, RepositoryError> {
            Err(RepositoryError::Storage("connection refused".to_string()))
        }
    }

    async fn resolver_with_alice() -> IdentityResolver {
        let store = InMemoryIdentityStore::new();
        store.insert("u1", "Alice", AccountRole::Customer).await;
        IdentityResolver::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_resolves_known_account() {
        let identity = resolver_with_alice().await.resolve("u1").await.unwrap();
        assert_eq!(identity.name, "Alice");
        assert_eq!(identity.role, AccountRole::Customer);
    }

    #[tokio::test]
    async fn test_unknown_account_is_not_found() {
        let err = resolver_with_alice().await.resolve("u2").await.unwrap_err();
        assert!(matches!(err, IdentityError::NotFound(ref r) if r == "u2"));
    }

    #[tokio::test]
    async fn test_malformed_reference_is_not_found() {
        let resolver = resolver_with_alice().await;
        assert!(matches!(resolver.resolve("").await, Err(IdentityError::NotFound(_))));
        assert!(matches!(resolver.resolve("u 1").await, Err(IdentityError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_store_failure_is_not_reported_as_missing() {
        let resolver = IdentityResolver::new(Arc::new(BrokenStore));
        assert!(matches!(resolver.resolve("u1").await, Err(IdentityError::Store(_))));
    }

    #[tokio::test]
    async fn test_no_caching_between_lookups() {
        let store = Arc::new(InMemoryIdentityStore::new());
        store.insert("u1", "Alice", AccountRole::Customer).await;
        let resolver = IdentityResolver::new(store.clone());

        assert_eq!(resolver.resolve("u1").await.unwrap().name, "Alice");
        store.insert("u1", "Alicia", AccountRole::Customer).await;
        assert_eq!(resolver.resolve("u1").await.unwrap().name, "Alicia");
    }
}
