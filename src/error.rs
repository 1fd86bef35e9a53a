//! Request-level error type.
//!
//! Every failure in the flows ends up as an [`AppError`]. Its
//! `IntoResponse` impl sets the status and attaches an [`ErrorReport`];
//! the error-page middleware turns that report into a rendered page with
//! the caller's session context.

use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const ACCESS_DENIED: &str = "Access denied";
pub const INVALID_FORM: &str = "Invalid form submission";

#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or missing input (400).
    #[error("{0}")]
    Validation(String),

    /// Uniqueness violation (400).
    #[error("{0}")]
    Conflict(String),

    /// Bad credentials (400). Same text for unknown email and wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// No session on a page that needs one (302 to the login form).
    #[error("login required")]
    LoginRequired,

    /// Authenticated but not allowed (403).
    #[error("{0}")]
    Forbidden(String),

    /// Referenced entity absent (404).
    #[error("{0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

/// What the error-page middleware needs to render an error.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub status: StatusCode,
    pub message: String,
    /// Set for 500s; the message is only shown in development.
    pub internal: bool,
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn forbidden() -> Self {
        Self::Forbidden(ACCESS_DENIED.to_string())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl ToString) -> Self {
        Self::Internal(msg.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Conflict(_) | Self::InvalidCredentials => {
                StatusCode::BAD_REQUEST
            }
            Self::LoginRequired => StatusCode::FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True for the kinds a form page shows inline instead of the error page.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Conflict(_) | Self::InvalidCredentials
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::LoginRequired = self {
            return crate::routes::found("/auth/login");
        }

        let status = self.status();
        let internal = status.is_server_error();
        if internal {
            tracing::error!(error = %self, "request failed");
        }

        let report = ErrorReport {
            status,
            message: self.to_string(),
            internal,
        };
        let mut response = (status, report.message.clone()).into_response();
        response.extensions_mut().insert(report);
        response
    }
}

/// A body that is not a decodable urlencoded form.
impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Rejected form body");
        Self::Validation(INVALID_FORM.to_string())
    }
}

/// Storage constraint violations map to the nearest request-level kind.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound("Record not found".to_string()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::Conflict("Record already exists".to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                Self::NotFound("Referenced record not found".to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_check_violation() => {
                Self::Validation("Value out of range".to_string())
            }
            _ => Self::Database(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::validation("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::conflict("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::forbidden().status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::internal("boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_invalid_credentials_message() {
        assert_eq!(AppError::InvalidCredentials.to_string(), INVALID_CREDENTIALS);
    }

    #[test]
    fn test_forbidden_message() {
        assert_eq!(AppError::forbidden().to_string(), "Access denied");
    }

    #[test]
    fn test_into_response_attaches_report() {
        let response = AppError::not_found("Translator not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let report = response.extensions().get::<ErrorReport>().expect("report");
        assert_eq!(report.message, "Translator not found");
        assert!(!report.internal);
    }

    #[test]
    fn test_internal_report_is_flagged() {
        let response = AppError::internal("pool closed").into_response();
        let report = response.extensions().get::<ErrorReport>().expect("report");
        assert!(report.internal);
        assert_eq!(report.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_login_required_redirects() {
        let response = AppError::LoginRequired.into_response();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()["location"], "/auth/login");
        assert!(response.extensions().get::<ErrorReport>().is_none());
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_user_errors() {
        assert!(AppError::validation("x").is_user_error());
        assert!(AppError::InvalidCredentials.is_user_error());
        assert!(!AppError::forbidden().is_user_error());
    }

    // ==================== Constraint Violations ====================

    /// Temp database with one user (id 1) already stored
    async fn seeded_db() -> (crate::db::Database, tempfile::TempDir) {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("errors.db");
        let db = crate::db::Database::new(path.to_str().expect("utf-8 path"))
            .await
            .expect("Failed to create database");
        sqlx::query(
            "INSERT INTO users (id, email, password, name, role)
             VALUES (1, 'taken@example.com', 'hash', 'Taken', 'client')",
        )
        .execute(db.pool())
        .await
        .expect("seed user");
        (db, temp_dir)
    }

    async fn failing(db: &crate::db::Database, sql: &str) -> AppError {
        sqlx::query(sql)
            .execute(db.pool())
            .await
            .expect_err("statement should violate a constraint")
            .into()
    }

    #[tokio::test]
    async fn test_unique_violation_maps_to_conflict() {
        let (db, _temp) = seeded_db().await;
        let err = failing(
            &db,
            "INSERT INTO users (email, password, name, role)
             VALUES ('taken@example.com', 'hash', 'Other', 'client')",
        )
        .await;
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_foreign_key_violation_maps_to_not_found() {
        let (db, _temp) = seeded_db().await;
        let err = failing(
            &db,
            "INSERT INTO reviews (translator_id, client_id, rating) VALUES (999, 1, 5)",
        )
        .await;
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_check_violation_maps_to_validation() {
        let (db, _temp) = seeded_db().await;
        let err = failing(
            &db,
            "INSERT INTO users (email, password, name, role)
             VALUES ('admin@example.com', 'hash', 'Admin', 'admin')",
        )
        .await;
        assert!(matches!(err, AppError::Validation(_)));
    }
}
