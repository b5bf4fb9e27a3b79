//! service-core: Shared infrastructure for the scheduling workspace.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
