//! Identity provider client.
//!
//! The provider owns credentials and sessions. This service only forwards
//! sign-up, password sign-in and sign-out and relays what comes back.

use super::metrics::record_provider_call;
use super::supabase::error_message;
use crate::config::SupabaseConfig;
use crate::models::{ProviderSession, ProviderUser};
use async_trait::async_trait;
use dashmap::DashMap;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider refused the request. Carries its message verbatim.
    #[error("{0}")]
    Rejected(String),

    #[error("Identity provider unreachable: {0}")]
    Connection(String),

    #[error("Unexpected identity provider response: {0}")]
    InvalidResponse(String),
}

/// Account to create on the provider.
#[derive(Debug, Clone, Serialize)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    /// Mark the address as confirmed so the account can sign in immediately.
    pub email_confirm: bool,
}

impl NewAccount {
    pub fn confirmed(email: String, password: String) -> Self {
        Self {
            email,
            password,
            email_confirm: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn create_user(&self, account: &NewAccount) -> Result<ProviderUser, IdentityError>;
    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<ProviderSession, IdentityError>;
    /// Invalidate every session belonging to the holder of `access_token`.
    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError>;
}

/// GoTrue (Supabase Auth) REST client.
#[derive(Clone)]
pub struct SupabaseIdentity {
    client: Client,
    auth_url: String,
    service_role_key: Secret<String>,
}

impl SupabaseIdentity {
    pub fn new(client: Client, config: &SupabaseConfig) -> Self {
        Self {
            client,
            auth_url: format!("{}/auth/v1", config.url),
            service_role_key: config.service_role_key.clone(),
        }
    }

    fn key(&self) -> &str {
        self.service_role_key.expose_secret()
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, IdentityError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IdentityError::Rejected(error_message(status, &body)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| IdentityError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for SupabaseIdentity {
    async fn create_user(&self, account: &NewAccount) -> Result<ProviderUser, IdentityError> {
        let result: Result<ProviderUser, IdentityError> = async {
            let response = self
                .client
                .post(format!("{}/admin/users", self.auth_url))
                .header("apikey", self.key())
                .bearer_auth(self.key())
                .json(account)
                .send()
                .await
                .map_err(|e| IdentityError::Connection(e.to_string()))?;

            Self::parse::<ProviderUser>(response).await
        }
        .await;

        record_provider_call("identity", "create_user", result.is_ok());
        match &result {
            Ok(user) => tracing::info!(user_id = %user.id, "Provider account created"),
            Err(e) => tracing::warn!(error = %e, "Provider rejected account creation"),
        }
        result
    }

    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<ProviderSession, IdentityError> {
        let result: Result<ProviderSession, IdentityError> = async {
            let response = self
                .client
                .post(format!("{}/token", self.auth_url))
                .query(&[("grant_type", "password")])
                .header("apikey", self.key())
                .json(credentials)
                .send()
                .await
                .map_err(|e| IdentityError::Connection(e.to_string()))?;

            Self::parse::<ProviderSession>(response).await
        }
        .await;

        record_provider_call("identity", "sign_in_with_password", result.is_ok());
        if let Err(e) = &result {
            tracing::info!(error = %e, "Password sign-in failed");
        }
        result
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
        let result: Result<(), IdentityError> = async {
            let response = self
                .client
                .post(format!("{}/logout", self.auth_url))
                .query(&[("scope", "global")])
                .header("apikey", self.key())
                .bearer_auth(access_token)
                .send()
                .await
                .map_err(|e| IdentityError::Connection(e.to_string()))?;

            let status = response.status();
            if status.is_success() {
                Ok(())
            } else {
                let body = response.text().await.unwrap_or_default();
                Err(IdentityError::Rejected(error_message(status, &body)))
            }
        }
        .await;

        record_provider_call("identity", "sign_out", result.is_ok());
        result
    }
}

struct MockAccount {
    user: ProviderUser,
    password: String,
}

/// In-memory identity provider for tests and local runs.
///
/// Mirrors the provider's observable rules: unique emails, a six character
/// password minimum, opaque access tokens.
pub struct MockIdentityProvider {
    accounts: DashMap<String, MockAccount>,
    sessions: DashMap<String, String>,
    rejection: Option<String>,
    next_id: AtomicU64,
    create_calls: AtomicU64,
    sign_in_calls: AtomicU64,
    sign_out_calls: AtomicU64,
}

impl Default for MockIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            sessions: DashMap::new(),
            rejection: None,
            next_id: AtomicU64::new(0),
            create_calls: AtomicU64::new(0),
            sign_in_calls: AtomicU64::new(0),
            sign_out_calls: AtomicU64::new(0),
        }
    }

    /// A provider that refuses every call with `message`.
    pub fn rejecting(message: impl Into<String>) -> Self {
        Self {
            rejection: Some(message.into()),
            ..Self::new()
        }
    }

    pub fn create_calls(&self) -> u64 {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn sign_in_calls(&self) -> u64 {
        self.sign_in_calls.load(Ordering::SeqCst)
    }

    pub fn sign_out_calls(&self) -> u64 {
        self.sign_out_calls.load(Ordering::SeqCst)
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    fn check_rejection(&self) -> Result<(), IdentityError> {
        match &self.rejection {
            Some(message) => Err(IdentityError::Rejected(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn create_user(&self, account: &NewAccount) -> Result<ProviderUser, IdentityError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check_rejection()?;

        if account.password.chars().count() < 6 {
            return Err(IdentityError::Rejected(
                "Password should be at least 6 characters.".to_string(),
            ));
        }

        let email = account.email.to_lowercase();
        let entry = match self.accounts.entry(email.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                return Err(IdentityError::Rejected(
                    "A user with this email address has already been registered".to_string(),
                ));
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => entry,
        };

        let id = format!("u{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let mut attributes = serde_json::Map::new();
        attributes.insert("email".to_string(), email.clone().into());
        attributes.insert("aud".to_string(), "authenticated".into());
        attributes.insert("role".to_string(), "authenticated".into());
        if account.email_confirm {
            attributes.insert(
                "email_confirmed_at".to_string(),
                chrono::Utc::now().to_rfc3339().into(),
            );
        }

        let user = ProviderUser { id, attributes };
        entry.insert(MockAccount {
            user: user.clone(),
            password: account.password.clone(),
        });

        tracing::info!(user_id = %user.id, "[MOCK] Provider account created");
        Ok(user)
    }

    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<ProviderSession, IdentityError> {
        let call = self.sign_in_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.check_rejection()?;

        let email = credentials.email.to_lowercase();
        let user = self
            .accounts
            .get(&email)
            .filter(|account| account.password == credentials.password)
            .map(|account| account.user.clone())
            .ok_or_else(|| IdentityError::Rejected("Invalid login credentials".to_string()))?;

        let access_token = format!("mock-access-token-{}", call);
        self.sessions.insert(access_token.clone(), email);

        let mut attributes = serde_json::Map::new();
        attributes.insert("token_type".to_string(), "bearer".into());
        attributes.insert("expires_in".to_string(), 3600.into());
        attributes.insert(
            "expires_at".to_string(),
            (chrono::Utc::now().timestamp() + 3600).into(),
        );
        attributes.insert(
            "refresh_token".to_string(),
            format!("mock-refresh-token-{}", call).into(),
        );

        Ok(ProviderSession {
            access_token,
            user,
            attributes,
        })
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        self.check_rejection()?;

        match self.sessions.remove(access_token) {
            Some((_, email)) => {
                // Global scope: drop every other session of the same account too.
                self.sessions.retain(|_, owner| *owner != email);
                Ok(())
            }
            None => Err(IdentityError::Rejected("invalid JWT".to_string())),
        }
    }
}
