pub mod auth;
pub mod employees;
pub mod health;
pub mod schedules;

pub use auth::{sign_in, sign_out, sign_up};
pub use health::{health_check, metrics_endpoint, not_found};
