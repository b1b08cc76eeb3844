use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use storehub_cloud::StorageError;
use storehub_core::error::CoreError;
use storehub_db::repositories::OrderError;
use validator::ValidationErrors;

use crate::auth::recaptcha::RecaptchaError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `storehub_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Order placement failure (stock, unknown or inactive product).
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Object storage failure.
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Recaptcha(#[from] RecaptchaError),

    /// A lookup by something other than id found nothing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Core(CoreError::Validation(describe_validation(&errors)))
    }
}

/// Flatten field errors into `field: message` pairs, sorted by field.
fn describe_validation(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let detail = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("{field}: {detail}")
        })
        .collect();
    if parts.is_empty() {
        // Only nested errors; the Display form includes the paths.
        return errors.to_string();
    }
    parts.sort();
    parts.join("; ")
}

fn internal(error: &dyn std::fmt::Display, context: &str) -> (StatusCode, &'static str, String) {
    tracing::error!(error = %error, "{context}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { .. } => {
                    (StatusCode::NOT_FOUND, core.code(), core.to_string())
                }
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, core.code(), msg.clone()),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, core.code(), msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, core.code(), msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, core.code(), msg.clone()),
                CoreError::Internal(msg) => internal(msg, "Internal core error"),
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Order placement ---
            AppError::Order(err) => match err {
                OrderError::InsufficientStock { .. } => {
                    (StatusCode::CONFLICT, "INSUFFICIENT_STOCK", err.to_string())
                }
                OrderError::UnknownProduct { .. } | OrderError::InactiveProduct { .. } => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                }
                OrderError::Database(db) => classify_sqlx_error(db),
            },

            // --- Storage ---
            AppError::Storage(err) => match err {
                StorageError::ForeignUrl(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                }
                StorageError::Put { .. } | StorageError::Delete { .. } => {
                    tracing::error!(error = %err, "Object storage error");
                    (
                        StatusCode::BAD_GATEWAY,
                        "STORAGE_ERROR",
                        "Object storage is unavailable".to_string(),
                    )
                }
            },

            // --- reCAPTCHA ---
            AppError::Recaptcha(err) => match err {
                RecaptchaError::MissingToken | RecaptchaError::Rejected { .. } => {
                    (StatusCode::BAD_REQUEST, "RECAPTCHA_FAILED", err.to_string())
                }
                RecaptchaError::Request(e) => {
                    tracing::error!(error = %e, "reCAPTCHA service error");
                    (
                        StatusCode::BAD_GATEWAY,
                        "RECAPTCHA_UNAVAILABLE",
                        "reCAPTCHA verification is unavailable".to_string(),
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => internal(msg, "Internal error"),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique violations (`23505`) on `uq_*` constraints map to 409.
/// - Foreign key (`23503`) and check (`23514`) violations map to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().as_deref() {
                Some("23505") if constraint.starts_with("uq_") => (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("Duplicate value violates unique constraint: {constraint}"),
                ),
                Some("23503") => (
                    StatusCode::BAD_REQUEST,
                    "FOREIGN_KEY_VIOLATION",
                    format!("Referenced record is missing or still in use: {constraint}"),
                ),
                Some("23514") => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    format!("Value violates check constraint: {constraint}"),
                ),
                _ => internal(db_err, "Database error"),
            }
        }
        other => internal(other, "Database error"),
    }
}
