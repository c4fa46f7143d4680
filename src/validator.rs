use anyhow::anyhow;
use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Query, Request,
        rejection::{JsonRejection, QueryRejection},
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use quill_core::AppError;

/// Turns a JSON body rejection into the short reason shown to clients.
fn describe_rejection(rejection: &JsonRejection) -> String {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return "Missing 'Content-Type: application/json' header".to_string();
    }

    let error_msg = rejection.body_text();

    if error_msg.contains("missing field") {
        let field = error_msg
            .split("missing field `")
            .nth(1)
            .and_then(|s| s.split('`').next())
            .unwrap_or("unknown");
        return format!("{} is required", field);
    }

    if error_msg.contains("unknown variant") {
        let variant = error_msg
            .split("unknown variant `")
            .nth(1)
            .and_then(|s| s.split('`').next())
            .unwrap_or("unknown");
        return format!("`{}` is not an allowed value", variant);
    }

    if error_msg.contains("invalid type") {
        return "Invalid field type in request".to_string();
    }

    if matches!(rejection, JsonRejection::JsonSyntaxError(_)) {
        return "Malformed JSON body".to_string();
    }

    "Invalid request body".to_string()
}

/// JSON body extractor that runs `validator` rules after deserializing.
///
/// Both failure kinds reject with 400 `Invalid input data; ...`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                AppError::bad_request(anyhow!(
                    "Invalid input data; {}",
                    describe_rejection(&rejection)
                ))
            })?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

/// Query string extractor whose rejection renders like every other client
/// error: 400 `Invalid query string; ...`.
#[derive(Debug, Clone, Default)]
pub struct ParsedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ParsedQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: QueryRejection| {
                AppError::bad_request(anyhow!("Invalid query string; {}", rejection.body_text()))
            })?;

        Ok(ParsedQuery(value))
    }
}
