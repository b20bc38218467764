use std::str::FromStr;

use crate::domain::identity::{AccountRef, AccountRole};

/// Service configuration.
///
/// Every key can be set in the environment or in a `.env` file:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | PORT | 4000 | HTTP API port |
/// | METRICS_PORT | 9090 | Prometheus scrape port |
/// | STORAGE_BACKEND | scylla | `scylla` or `memory` |
/// | SCYLLA_NODE | 127.0.0.1:9042 | ScyllaDB contact point |
/// | SCYLLA_KEYSPACE | print_orders | keyspace for orders and accounts |
/// | SUBSCRIBER_BUFFER | 64 | queued notifications per live subscriber |
/// | BROADCAST_MAILBOX | 1024 | pending publishes before the broadcaster sheds load |
/// | CLIENT_URL | http://localhost:5173 | storefront origin allowed on the live stream |
/// | MEMORY_ACCOUNTS | (empty) | `id=Name[:role],...` seeded into the memory backend |
///
/// `CLIENT_URL` must name a single origin: the API allows credentials, so a
/// wildcard is rejected at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub storage: StorageBackend,
    pub scylla_node: String,
    pub scylla_keyspace: String,
    pub subscriber_buffer: usize,
    pub broadcast_mailbox: usize,
    pub client_url: String,
    pub memory_accounts: Vec<SeedAccount>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Scylla,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scylla" => Ok(StorageBackend::Scylla),
            "memory" => Ok(StorageBackend::Memory),
            other => anyhow::bail!("Unknown STORAGE_BACKEND {:?} (expected scylla or memory)", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedAccount {
    pub id: String,
    pub name: String,
    pub role: AccountRole,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let storage = match lookup("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::Scylla,
        };

        let client_url = lookup("CLIENT_URL").unwrap_or_else(|| "http://localhost:5173".into());
        if client_url.trim().is_empty() || client_url.trim() == "*" {
            anyhow::bail!("CLIENT_URL must be an explicit origin, got {:?}", client_url);
        }

        Ok(Self {
            port: parse_or(&lookup, "PORT", 4000),
            metrics_port: parse_or(&lookup, "METRICS_PORT", 9090),
            storage,
            scylla_node: lookup("SCYLLA_NODE").unwrap_or_else(|| "127.0.0.1:9042".into()),
            scylla_keyspace: lookup("SCYLLA_KEYSPACE").unwrap_or_else(|| "print_orders".into()),
            subscriber_buffer: parse_or(&lookup, "SUBSCRIBER_BUFFER", 64),
            broadcast_mailbox: parse_or(&lookup, "BROADCAST_MAILBOX", 1024),
            client_url,
            memory_accounts: lookup("MEMORY_ACCOUNTS")
                .map(|raw| parse_seed_accounts(&raw))
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key = key, value = %raw, "Ignoring unparseable setting, using default");
            default
        }),
        None => default,
    }
}

/// Parse `id=Name[:role]` pairs separated by commas. Role defaults to customer.
///
/// Only a trailing `:word` of lowercase letters is read as a role, so names
/// like `Dr: Who` stay intact.
fn parse_seed_accounts(raw: &str) -> anyhow::Result<Vec<SeedAccount>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (id, rest) = entry
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("MEMORY_ACCOUNTS entry {:?} is missing '='", entry))?;

            let id = id.trim();
            if AccountRef::parse(id).is_none() {
                anyhow::bail!("MEMORY_ACCOUNTS entry {:?} has a malformed account id", entry);
            }

            let (name, role) = match rest.rsplit_once(':') {
                Some((name, role)) if is_role_token(role) => {
                    (name, role.parse::<AccountRole>().map_err(anyhow::Error::msg)?)
                }
                _ => (rest, AccountRole::Customer),
            };

            let name = name.trim();
            if name.is_empty() {
                anyhow::bail!("MEMORY_ACCOUNTS entry {:?} has no name", entry);
            }

            Ok(SeedAccount {
                id: id.to_string(),
                name: name.to_string(),
                role,
            })
        })
        .collect()
}

fn is_role_token(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_lowercase())
}
