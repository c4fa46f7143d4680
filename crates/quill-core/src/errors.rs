//! Application error types and HTTP error rendering.
//!
//! Every handler returns `Result<_, AppError>`. Any error converted with `?`
//! is classified by downcasting: query translation errors, store errors and
//! validation errors map to their client status, everything else becomes a
//! 500. Explicitly constructed errors (`not_found`, `unauthorized`, ...) are
//! operational and always render their own message.
//!
//! Rendering depends on [`AppEnv`]: development responses carry the full
//! error chain under `details`, production responses hide non-operational
//! errors behind a generic message.

use std::sync::OnceLock;

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use quill_config::AppEnv;
use serde_json::{Value, json};
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::query::QueryError;

static RENDER_ENV: OnceLock<AppEnv> = OnceLock::new();

/// Sets the environment used when rendering errors. Only the first call has
/// an effect; without a call the environment is read from `APP_ENV`.
pub fn set_render_env(env: AppEnv) {
    let _ = RENDER_ENV.set(env);
}

fn render_env() -> AppEnv {
    *RENDER_ENV.get_or_init(AppEnv::from_env)
}

/// Errors raised by the document store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid _id: {0}")]
    InvalidId(String),

    #[error("Duplicate field value: \"{value}\". Please use another value!")]
    DuplicateKey { field: String, value: String },

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Database unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(err))
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
    /// Operational errors are expected failures whose message is safe to show
    /// to clients in production.
    pub operational: bool,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
            operational: true,
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: err.into(),
            operational: false,
        }
    }

    pub fn internal_error(message: String) -> Self {
        Self::internal(anyhow::anyhow!(message))
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized(message: String) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow::anyhow!(message))
    }

    pub fn forbidden(message: String) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow::anyhow!(message))
    }

    pub fn conflict(message: String) -> Self {
        Self::new(StatusCode::CONFLICT, anyhow::anyhow!(message))
    }

    /// Classifies an arbitrary error by downcasting to the error types the
    /// application knows how to present.
    pub fn classify(error: Error) -> Self {
        if let Some(query) = error.downcast_ref::<QueryError>() {
            let status = match query {
                QueryError::PageOutOfRange { .. } => StatusCode::NOT_FOUND,
                QueryError::MalformedFilter { .. } | QueryError::OperatorField { .. } => {
                    StatusCode::BAD_REQUEST
                }
            };
            return Self::new(status, error);
        }

        if let Some(store) = error.downcast_ref::<StoreError>() {
            return match store {
                StoreError::InvalidId(_)
                | StoreError::DuplicateKey { .. }
                | StoreError::InvalidQuery(_) => Self::new(StatusCode::BAD_REQUEST, error),
                StoreError::Unavailable(_) | StoreError::Backend(_) => Self::internal(error),
            };
        }

        if let Some(validation) = error.downcast_ref::<ValidationErrors>() {
            let message = format!("Invalid input data; {}", validation_messages(validation));
            return Self::new(StatusCode::BAD_REQUEST, error.context(message));
        }

        Self::internal(error)
    }

    /// Status label used in response bodies: `fail` for client errors,
    /// `error` otherwise.
    pub fn status_label(&self) -> &'static str {
        if self.status.is_client_error() {
            "fail"
        } else {
            "error"
        }
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }

    pub fn render(&self, env: AppEnv) -> (StatusCode, Value) {
        if self.status.is_server_error() {
            tracing::error!(
                status = self.status.as_u16(),
                error = ?self.error,
                "Request failed"
            );
        }

        match env {
            AppEnv::Development => (
                self.status,
                json!({
                    "status": self.status_label(),
                    "message": self.message(),
                    "details": self.error.chain().map(|e| e.to_string()).collect::<Vec<_>>(),
                }),
            ),
            AppEnv::Production if self.operational => (
                self.status,
                json!({
                    "status": self.status_label(),
                    "message": self.message(),
                }),
            ),
            AppEnv::Production => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "status": "error",
                    "message": "Something went wrong!",
                }),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.render(render_env());
        (status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::classify(err.into())
    }
}

/// Flattens validation errors into `field message. field message` form,
/// preferring the messages declared on the DTO.
pub fn validation_messages(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect_messages(errors, None, &mut messages);
    messages.sort();
    messages.join(". ")
}

fn collect_messages(errors: &ValidationErrors, prefix: Option<&str>, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{field}"),
            None => field.to_string(),
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = match &error.message {
                        Some(message) => message.to_string(),
                        None => format!("{path} is invalid ({})", error.code),
                    };
                    out.push(message);
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_messages(nested, Some(&path), out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_messages(nested, Some(&format!("{path}[{index}]")), out);
                }
            }
        }
    }
}
