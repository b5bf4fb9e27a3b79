//! Identity provider payloads.
//!
//! Only the fields the service reads are typed. Everything else is kept in
//! `attributes` so the objects go back to callers exactly as the provider
//! sent them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderUser {
    pub id: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl ProviderUser {
    pub fn email(&self) -> Option<&str> {
        self.attributes.get("email").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSession {
    pub access_token: String,
    pub user: ProviderUser,
    /// `token_type`, `expires_in`, `refresh_token` and the rest, as sent.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl ProviderSession {
    pub fn expires_in(&self) -> Option<i64> {
        self.attributes.get("expires_in").and_then(Value::as_i64)
    }
}
