//! Authentication handlers.
//!
//! Credentials never stop here: every operation is one round trip to the
//! identity provider, with the provider's answer relayed to the caller.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use service_core::error::AppError;
use validator::Validate;

use crate::dtos::auth::validation_message;
use crate::dtos::{MessageResponse, SignInRequest, SignInResponse, SignUpRequest, SignUpResponse};
use crate::models::DirectoryUser;
use crate::services::{Credentials, NewAccount};
use crate::utils::{bearer_token, JsonOrForm};
use crate::AppState;

/// Register a new account and its directory profile.
///
/// POST /auth/sign-up
pub async fn sign_up(
    State(state): State<AppState>,
    JsonOrForm(req): JsonOrForm<SignUpRequest>,
) -> Result<(StatusCode, Json<SignUpResponse>), AppError> {
    req.validate()
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!(validation_message(&e))))?;

    let account = NewAccount::confirmed(req.email.clone(), req.password);
    let user = state
        .identity
        .create_user(&account)
        .await
        .map_err(|e| AppError::BadRequest(e.into()))?;

    // The provider account exists from here on; the profile row follows it.
    let profile = DirectoryUser::new_manager(user.id.clone(), req.email, req.full_name);
    if let Err(e) = state.directory.insert_user(&profile).await {
        tracing::error!(
            user_id = %user.id,
            error = %e,
            "Provider account created but directory profile was not saved"
        );
        return Err(AppError::DatabaseError(anyhow::anyhow!(
            "Profile for user {} was not saved: {}",
            user.id,
            e
        )));
    }

    tracing::info!(user_id = %user.id, role = profile.role.as_str(), "User registered");

    Ok((StatusCode::CREATED, Json(SignUpResponse { user })))
}

/// Exchange email and password for a provider session.
///
/// POST /auth/sign-in
pub async fn sign_in(
    State(state): State<AppState>,
    body: Result<JsonOrForm<SignInRequest>, AppError>,
) -> Result<Json<SignInResponse>, AppError> {
    // Sign-in answers 200 or 401, unreadable bodies included.
    let JsonOrForm(req) = body.map_err(|e| match e {
        AppError::BadRequest(err) => AppError::Unauthorized(err),
        other => other,
    })?;
    req.validate()
        .map_err(|e| AppError::Unauthorized(anyhow::anyhow!(validation_message(&e))))?;

    let credentials = Credentials {
        email: req.email,
        password: req.password,
    };
    let session = state
        .identity
        .sign_in_with_password(&credentials)
        .await
        .map_err(|e| AppError::Unauthorized(e.into()))?;

    let user = session.user.clone();
    Ok(Json(SignInResponse { session, user }))
}

/// Invalidate the caller's sessions.
///
/// POST /auth/sign-out
pub async fn sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, AppError> {
    let token = bearer_token(&headers)
        .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("Missing token")))?;

    // The caller is signed out from its own point of view either way.
    if let Err(e) = state.identity.sign_out(token).await {
        tracing::debug!(error = %e, "Provider did not invalidate session");
    }

    Ok(Json(MessageResponse::new("Signed out successfully")))
}
