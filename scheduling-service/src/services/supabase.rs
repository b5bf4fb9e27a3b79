//! Plumbing shared by the Supabase auth and table clients.

use crate::config::SupabaseConfig;
use reqwest::{Client, StatusCode};
use serde_json::Value;

/// Build the HTTP client used for every provider call.
pub fn http_client(config: &SupabaseConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder();
    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

/// Pull a human readable message out of a provider error body.
///
/// GoTrue answers with `msg` (newer) or `error_description` (older),
/// PostgREST with `message`. Falls back to the raw body, then the status line.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) {
        for key in ["msg", "message", "error_description", "error"] {
            if let Some(Value::String(message)) = fields.get(key) {
                if !message.is_empty() {
                    return message.clone();
                }
            }
        }
    }

    let body = body.trim();
    if body.is_empty() {
        status.to_string()
    } else {
        body.to_string()
    }
}
