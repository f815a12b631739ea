//! JSON body extractor that runs `validator` rules before the handler.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::{ApiError, ValidationRejection};

/// Deserialized and validated request body.
///
/// Malformed or incomplete JSON and rule violations are both answered with
/// 400, so handlers only ever see valid input.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!(error = %rejection.body_text(), "Rejected request body");
            ApiError::Validation(rejection.body_text()).into_response()
        })?;

        value
            .validate()
            .map_err(|errors| ValidationRejection::from(errors).into_response())?;

        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, StatusCode};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Signup {
        #[validate(email(message = "Invalid email address"))]
        email: String,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_accepts_valid_body() {
        let ValidatedJson(signup) =
            ValidatedJson::<Signup>::from_request(json_request(r#"{"email":"a@example.com"}"#), &())
                .await
                .unwrap();
        assert_eq!(signup.email, "a@example.com");
    }

    #[tokio::test]
    async fn test_rule_violation_is_bad_request() {
        let rejection =
            ValidatedJson::<Signup>::from_request(json_request(r#"{"email":"nope"}"#), &())
                .await
                .unwrap_err();
        assert_eq!(rejection.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let rejection = ValidatedJson::<Signup>::from_request(json_request("{}"), &())
            .await
            .unwrap_err();
        assert_eq!(rejection.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let rejection = ValidatedJson::<Signup>::from_request(json_request("{not json"), &())
            .await
            .unwrap_err();
        assert_eq!(rejection.status(), StatusCode::BAD_REQUEST);
    }
}
