//! Collaborators behind the HTTP layer.
//!
//! Both external services are reached through traits so the router can run
//! against the hosted backend in production and in-memory doubles in tests.

pub mod directory;
pub mod identity;
pub mod metrics;
mod supabase;

pub use directory::{DirectoryError, DirectoryStore, MockDirectory, PostgrestDirectory};
pub use identity::{
    Credentials, IdentityError, IdentityProvider, MockIdentityProvider, NewAccount,
    SupabaseIdentity,
};
pub use metrics::{get_metrics, init_metrics, record_provider_call};
pub use supabase::http_client;
