pub mod auth;

pub use auth::{MessageResponse, SignInRequest, SignInResponse, SignUpRequest, SignUpResponse};
