use crate::models::{ProviderSession, ProviderUser};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationErrors};

/// Missing, null or non-string credentials deserialize as empty strings so
/// the presence check answers with the route's own status instead of a body
/// rejection.
#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    #[serde(default, deserialize_with = "string_or_empty")]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[serde(default, deserialize_with = "string_or_empty")]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// Stored as given. Non-string values keep their JSON text.
    #[serde(default, deserialize_with = "any_as_text")]
    pub full_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignInRequest {
    #[serde(default, deserialize_with = "string_or_empty")]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[serde(default, deserialize_with = "string_or_empty")]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

fn any_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

#[derive(Debug, Serialize)]
pub struct SignUpResponse {
    pub user: ProviderUser,
}

#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub session: ProviderSession,
    pub user: ProviderUser,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Flatten validator output into one line, ordered by field name.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                err.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default_to_empty() {
        let req: SignUpRequest = serde_json::from_str(r#"{"full_name":"A B"}"#).unwrap();
        assert!(req.email.is_empty());
        assert!(req.password.is_empty());
        assert_eq!(req.full_name.as_deref(), Some("A B"));
    }

    #[test]
    fn non_string_credentials_count_as_missing() {
        let req: SignInRequest =
            serde_json::from_str(r#"{"email":null,"password":123456}"#).unwrap();
        assert!(req.email.is_empty());
        assert!(req.password.is_empty());
        assert!(req.validate().is_err());
    }

    #[test]
    fn full_name_is_kept_whatever_its_type() {
        let req: SignUpRequest =
            serde_json::from_str(r#"{"email":"a@b.com","password":"pw","full_name":42}"#).unwrap();
        assert_eq!(req.full_name.as_deref(), Some("42"));

        let req: SignUpRequest =
            serde_json::from_str(r#"{"email":"a@b.com","password":"pw","full_name":null}"#)
                .unwrap();
        assert_eq!(req.full_name, None);
    }

    #[test]
    fn presence_is_the_only_check() {
        let req = SignUpRequest {
            email: "not-an-email".to_string(),
            password: "x".to_string(),
            full_name: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn validation_message_lists_fields_in_order() {
        let req = SignInRequest {
            email: String::new(),
            password: String::new(),
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(
            validation_message(&errors),
            "Email is required; Password is required"
        );
    }
}
