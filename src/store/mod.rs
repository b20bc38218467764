// ============================================================================
// Storage Layer
// ============================================================================
//
// Repositories behind traits so the intake pipeline can run against ScyllaDB
// in production and in-memory maps in tests and local development.
//
// ============================================================================

mod identity_store;
mod order_repository;
mod scylla_backend;

use scylla::client::session_builder::SessionBuilder;
use std::sync::Arc;

use crate::config::{AppConfig, StorageBackend};

pub use identity_store::{IdentityStore, InMemoryIdentityStore};
pub use order_repository::{InMemoryOrderRepository, OrderRepository};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("storage backend failure: {0}")]
    Storage(String),

    #[error("failed to encode record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("corrupt record {id}: {reason}")]
    Corrupt { id: String, reason: String },
}

/// Repositories selected by configuration.
pub struct Storage {
    pub orders: Arc<dyn OrderRepository>,
    pub identities: Arc<dyn IdentityStore>,
}

impl Storage {
    pub async fn connect(config: &AppConfig) -> anyhow::Result<Self> {
        match config.storage {
            StorageBackend::Scylla => {
                tracing::info!(node = %config.scylla_node, "Connecting to ScyllaDB...");
                let session = SessionBuilder::new()
                    .known_node(&config.scylla_node)
                    .build()
                    .await?;

                scylla_backend::ensure_schema(&session, &config.scylla_keyspace).await?;

                let session = Arc::new(session);
                Ok(Self {
                    orders: Arc::new(scylla_backend::ScyllaOrderRepository::new(session.clone())),
                    identities: Arc::new(scylla_backend::ScyllaIdentityStore::new(session)),
                })
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; orders are lost on restart");
                let identities = InMemoryIdentityStore::new();
                for account in &config.memory_accounts {
                    identities.insert(&account.id, &account.name, account.role).await;
                    tracing::debug!(account = %account.id, role = account.role.as_str(), "Seeded account");
                }

                Ok(Self {
                    orders: Arc::new(InMemoryOrderRepository::new()),
                    identities: Arc::new(identities),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::AccountRef;

    #[tokio::test]
    async fn test_memory_backend_seeds_accounts() {
        let config = AppConfig::from_lookup(|key| match key {
            "STORAGE_BACKEND" => Some("memory".to_string()),
            "MEMORY_ACCOUNTS" => Some("u1=Alice".to_string()),
            _ => None,
        })
        .unwrap();

        let storage = Storage::connect(&config).await.unwrap();

        let alice = storage
            .identities
            .find_account(&AccountRef::parse("u1").unwrap())
            .await
            .unwrap();
        assert_eq!(alice.map(|i| i.name), Some("Alice".to_string()));
        assert!(storage.orders.find_all().await.unwrap().is_empty());
    }
}
