use axum::http::{header, HeaderMap};

/// Token carried in `Authorization`, with any `Bearer ` prefix removed.
///
/// Returns `None` when the header is absent, not valid UTF-8, or empty
/// once the prefix is gone.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then_some(token)
}
