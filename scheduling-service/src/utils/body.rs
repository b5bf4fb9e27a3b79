use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header,
    Form, Json,
};
use serde::de::DeserializeOwned;
use service_core::error::AppError;

/// Request body accepted either as JSON or as an urlencoded form, picked by
/// `Content-Type`. Anything that is not a form is parsed as JSON.
#[derive(Debug)]
pub struct JsonOrForm<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::BadRequest(anyhow::anyhow!(rejection.body_text())))?;
            return Ok(Self(value));
        }

        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(anyhow::anyhow!(rejection.body_text())))?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Login {
        email: String,
        password: String,
    }

    async fn extract(content_type: &str, body: &'static str) -> Result<Login, AppError> {
        let req = axum::http::Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap();
        JsonOrForm::<Login>::from_request(req, &())
            .await
            .map(|JsonOrForm(login)| login)
    }

    #[tokio::test]
    async fn parses_json() {
        let login = extract("application/json", r#"{"email":"a@b.com","password":"pw"}"#)
            .await
            .unwrap();
        assert_eq!(login.email, "a@b.com");
    }

    #[tokio::test]
    async fn parses_urlencoded_form() {
        let login = extract(
            "application/x-www-form-urlencoded",
            "email=a%40b.com&password=pw",
        )
        .await
        .unwrap();
        assert_eq!(
            login,
            Login {
                email: "a@b.com".to_string(),
                password: "pw".to_string()
            }
        );
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let err = extract("application/json", "{not json").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
