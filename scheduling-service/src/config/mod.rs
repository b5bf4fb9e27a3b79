use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct SchedulingConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub supabase: SupabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`.
    pub url: String,
    /// Service-role key. Grants admin access to auth and bypasses row-level security.
    pub service_role_key: Secret<String>,
    /// Directory table that receives one profile row per registered user.
    pub users_table: String,
    /// Per-call timeout for provider requests. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl SupabaseConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl SchedulingConfig {
    pub fn load() -> Result<Self, AppError> {
        // Common config handles .env, APP__* and PORT
        let common = core_config::Config::load()?;

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let timeout_secs = parse_timeout(env::var("PROVIDER_TIMEOUT_SECS").ok())?;

        Ok(SchedulingConfig {
            common,
            log_level: get_env("LOG_LEVEL", Some("info"), false)?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty()),
            supabase: SupabaseConfig {
                url: get_env("SUPABASE_URL", None, is_prod)?
                    .trim_end_matches('/')
                    .to_string(),
                service_role_key: Secret::new(get_env(
                    "SUPABASE_SERVICE_ROLE_KEY",
                    None,
                    is_prod,
                )?),
                users_table: get_env("USERS_TABLE", Some("users"), is_prod)?,
                timeout_secs,
            },
        })
    }
}

/// Unset or blank means no timeout.
fn parse_timeout(raw: Option<String>) -> Result<Option<u64>, AppError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "PROVIDER_TIMEOUT_SECS must be a whole number of seconds: {}",
                e
            ))
        }),
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
