//! User directory: profile rows stored next to the provider's auth records.

use super::metrics::record_provider_call;
use super::supabase::error_message;
use crate::config::SupabaseConfig;
use crate::models::DirectoryUser;
use async_trait::async_trait;
use dashmap::DashMap;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Directory rejected write: {0}")]
    Rejected(String),

    #[error("Directory unreachable: {0}")]
    Connection(String),
}

#[async_trait]
pub trait DirectoryStore: Send + Sync {
    async fn insert_user(&self, user: &DirectoryUser) -> Result<(), DirectoryError>;
}

/// PostgREST table client (Supabase `/rest/v1`).
#[derive(Clone)]
pub struct PostgrestDirectory {
    client: Client,
    table_url: String,
    service_role_key: Secret<String>,
}

impl PostgrestDirectory {
    pub fn new(client: Client, config: &SupabaseConfig) -> Self {
        Self {
            client,
            table_url: format!("{}/rest/v1/{}", config.url, config.users_table),
            service_role_key: config.service_role_key.clone(),
        }
    }
}

#[async_trait]
impl DirectoryStore for PostgrestDirectory {
    async fn insert_user(&self, user: &DirectoryUser) -> Result<(), DirectoryError> {
        let key = self.service_role_key.expose_secret();
        let response = self
            .client
            .post(&self.table_url)
            .header("apikey", key.as_str())
            .bearer_auth(key)
            .header("Prefer", "return=minimal")
            .json(user)
            .send()
            .await
            .map_err(|e| {
                record_provider_call("directory", "insert_user", false);
                DirectoryError::Connection(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            record_provider_call("directory", "insert_user", false);
            let body = response.text().await.unwrap_or_default();
            return Err(DirectoryError::Rejected(error_message(status, &body)));
        }

        record_provider_call("directory", "insert_user", true);
        tracing::debug!(user_id = %user.id, "Directory row inserted");
        Ok(())
    }
}

/// In-memory directory for tests.
pub struct MockDirectory {
    rows: DashMap<String, DirectoryUser>,
    failure: Option<String>,
    insert_calls: AtomicU64,
}

impl Default for MockDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDirectory {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
            failure: None,
            insert_calls: AtomicU64::new(0),
        }
    }

    /// A directory whose every insert fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::new()
        }
    }

    pub fn get(&self, id: &str) -> Option<DirectoryUser> {
        self.rows.get(id).map(|row| row.clone())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn insert_calls(&self) -> u64 {
        self.insert_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DirectoryStore for MockDirectory {
    async fn insert_user(&self, user: &DirectoryUser) -> Result<(), DirectoryError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.failure {
            return Err(DirectoryError::Rejected(message.clone()));
        }

        if self.rows.contains_key(&user.id) {
            return Err(DirectoryError::Rejected(format!(
                "duplicate key value violates unique constraint \"users_pkey\" ({})",
                user.id
            )));
        }

        self.rows.insert(user.id.clone(), user.clone());
        Ok(())
    }
}
