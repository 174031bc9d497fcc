use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::announcement::AnnouncementError;
use crate::dispatch::DispatchError;
use crate::template::TemplateError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Missing permission: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage is not connected")]
    StorageUnavailable,

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Command is on cooldown for {retry_after_secs} more seconds")]
    CooldownActive { retry_after_secs: u64 },

    #[error("No channel configured for {0}")]
    ChannelNotConfigured(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

impl From<TemplateError> for AppError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::StorageUnavailable => AppError::StorageUnavailable,
            TemplateError::NotFound(name) => {
                AppError::NotFound(format!("No recruitment post named '{}'", name))
            }
            TemplateError::Persistence(msg) => AppError::Persistence(msg),
            TemplateError::Validation(msg) => AppError::Validation(msg),
        }
    }
}

impl From<AnnouncementError> for AppError {
    fn from(err: AnnouncementError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        AppError::Delivery(err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Check if running in production mode (based on RUN_MODE env var)
fn is_production() -> bool {
    std::env::var("RUN_MODE")
        .map(|m| m == "production" || m == "prod")
        .unwrap_or(false)
}

impl AppError {
    /// Status code and stable error code for the response
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Auth(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::StorageUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "STORAGE_UNAVAILABLE")
            }
            AppError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PERSISTENCE_ERROR"),
            AppError::CooldownActive { .. } => (StatusCode::TOO_MANY_REQUESTS, "COOLDOWN"),
            AppError::ChannelNotConfigured(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CHANNEL_NOT_CONFIGURED")
            }
            AppError::Delivery(_) => (StatusCode::BAD_GATEWAY, "DELIVERY_FAILED"),
        }
    }

    /// Message shown to the caller; internals are hidden in production
    fn client_message(&self) -> String {
        let hide = is_production();
        match self {
            AppError::Persistence(_) if hide => "An error occurred while saving the post".to_string(),
            AppError::Delivery(_) if hide => "The message could not be delivered".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let log_message = self.to_string();

        // Always log the detailed error server-side
        if status.is_server_error() {
            tracing::error!(
                code = %code,
                status = %status.as_u16(),
                message = %log_message,
                "API error"
            );
        } else {
            tracing::debug!(
                code = %code,
                status = %status.as_u16(),
                message = %log_message,
                "API request rejected"
            );
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.client_message(),
            },
        };

        let mut response = (status, Json(body)).into_response();

        if let AppError::CooldownActive { retry_after_secs } = self {
            if let Ok(v) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, v);
            }
        }

        response
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
