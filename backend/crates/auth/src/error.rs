//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, conversions::is_unique_violation, kind::ErrorKind};
use platform::password::PasswordHashError;
use platform::token::TokenError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing or bad credentials, token, or permission
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    /// Duplicate email, business name, or store unique violation
    #[error("{0}")]
    Conflict(String),

    /// Request is well-formed but not allowed in the current state
    #[error("{0}")]
    InvalidOperation(String),

    #[error("{0}")]
    BadRequest(String),

    /// Credential-reset abuse guard tripped; do not retry automatically
    #[error("{0}")]
    RateLimited(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        AuthError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AuthError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        AuthError::Conflict(message.into())
    }

    pub fn invalid_operation(message: impl Into<String>) -> Self {
        AuthError::InvalidOperation(message.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AuthError::NotFound(_) => StatusCode::NOT_FOUND,
            AuthError::Conflict(_) => StatusCode::CONFLICT,
            AuthError::InvalidOperation(_) | AuthError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AuthError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Unauthorized(_) => ErrorKind::Unauthorized,
            AuthError::NotFound(_) => ErrorKind::NotFound,
            AuthError::Conflict(_) => ErrorKind::Conflict,
            AuthError::InvalidOperation(_) | AuthError::BadRequest(_) => ErrorKind::BadRequest,
            AuthError::RateLimited(_) => ErrorKind::TooManyRequests,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Server-side details stay in the logs.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Database(_) | AuthError::Internal(_) => {
                AppError::internal("An unexpected error occurred")
            }
            AuthError::RateLimited(message) => AppError::too_many_requests(message.clone())
                .with_action("Please wait before trying again"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::Unauthorized(msg) => {
                tracing::warn!(message = %msg, "Unauthorized request");
            }
            AuthError::RateLimited(msg) => {
                tracing::warn!(message = %msg, "Credential reset rate limited");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        if !is_unique_violation(&err) {
            return AuthError::Database(err);
        }

        let constraint = err
            .as_database_error()
            .and_then(|db| db.constraint())
            .unwrap_or_default();

        let message = if constraint.starts_with("users_email") {
            "A user with this email already exists"
        } else if constraint.starts_with("businesses_name") {
            "A business with this name already exists"
        } else if constraint.starts_with("business_users_user") {
            "User already belongs to a business"
        } else {
            "Resource already exists"
        };

        AuthError::Conflict(message.to_string())
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        let message = err.message().to_string();
        match err.kind() {
            ErrorKind::BadRequest | ErrorKind::UnprocessableEntity => AuthError::BadRequest(message),
            ErrorKind::Unauthorized | ErrorKind::Forbidden => AuthError::Unauthorized(message),
            ErrorKind::NotFound => AuthError::NotFound(message),
            ErrorKind::Conflict => AuthError::Conflict(message),
            ErrorKind::TooManyRequests => AuthError::RateLimited(message),
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<PasswordHashError> for AuthError {
    fn from(err: PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthError::unauthorized("Token has expired"),
            TokenError::Invalid(_) => AuthError::unauthorized("Invalid token"),
            TokenError::WeakSecret | TokenError::Encoding(_) => AuthError::Internal(err.to_string()),
        }
    }
}
