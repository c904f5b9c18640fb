use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use super::dto::ErrorEnvelope;

/// Failures reported by a [`UserStore`](super::repo::UserStore).
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("no row matched")]
    NotFound,

    #[error("username already taken")]
    Conflict,

    #[error("email already taken")]
    EmailConflict,

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl RepoError {
    /// Classifies a driver error, pulling unique violations out as conflicts.
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => RepoError::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::conflict_on(db.constraint())
            }
            _ => RepoError::Database(e),
        }
    }

    /// Like [`from_sqlx`](Self::from_sqlx), but a row that cannot be decoded
    /// counts as absent.
    pub fn from_scan(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::Decode(_) => RepoError::NotFound,
            e => Self::from_sqlx(e),
        }
    }

    // Postgres names the inline UNIQUE constraints `users_<column>_key`
    fn conflict_on(constraint: Option<&str>) -> Self {
        match constraint {
            Some(name) if name.contains("email") => RepoError::EmailConflict,
            _ => RepoError::Conflict,
        }
    }
}

#[derive(Debug, Error)]
pub enum UserError {
    #[error("all fields are required")]
    AllFieldsRequired,

    #[error("invalid password")]
    InvalidPassword,

    #[error("invalid email")]
    InvalidEmail,

    #[error("empty query param")]
    EmptyQueryParam,

    #[error("user not found")]
    UserNotFound,

    #[error("user already exists")]
    UserAlreadyExists,

    #[error("email already in use")]
    EmailAlreadyInUse,

    #[error("error creating user")]
    CreateFailed(#[source] RepoError),

    #[error("error searching user")]
    SearchFailed(#[source] RepoError),

    #[error("error deleting user")]
    DeleteFailed(#[source] RepoError),

    #[error("error updating user")]
    UpdateFailed(#[source] RepoError),

    #[error("error changing user password")]
    ChangePasswordFailed(#[source] RepoError),

    #[error("password hashing error")]
    PasswordHash(#[source] anyhow::Error),
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    pub fn status(&self) -> StatusCode {
        match self {
            UserError::AllFieldsRequired
            | UserError::InvalidPassword
            | UserError::InvalidEmail
            | UserError::EmptyQueryParam => StatusCode::BAD_REQUEST,
            UserError::UserNotFound => StatusCode::NOT_FOUND,
            UserError::UserAlreadyExists | UserError::EmailAlreadyInUse => StatusCode::CONFLICT,
            UserError::CreateFailed(_)
            | UserError::SearchFailed(_)
            | UserError::DeleteFailed(_)
            | UserError::UpdateFailed(_)
            | UserError::ChangePasswordFailed(_)
            | UserError::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code sent to clients.
    pub fn code(&self) -> &'static str {
        match self {
            UserError::AllFieldsRequired => "all_fields_required",
            UserError::InvalidPassword => "invalid_password",
            UserError::InvalidEmail => "invalid_email",
            UserError::EmptyQueryParam => "empty_query_param",
            UserError::UserNotFound => "user_not_found",
            UserError::UserAlreadyExists => "user_already_exists",
            UserError::EmailAlreadyInUse => "email_already_in_use",
            UserError::CreateFailed(_) => "create_failed",
            UserError::SearchFailed(_) => "search_failed",
            UserError::DeleteFailed(_) => "delete_failed",
            UserError::UpdateFailed(_) => "update_failed",
            UserError::ChangePasswordFailed(_) => "change_password_failed",
            UserError::PasswordHash(_) => "internal_error",
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            UserError::CreateFailed(source)
            | UserError::SearchFailed(source)
            | UserError::DeleteFailed(source)
            | UserError::UpdateFailed(source)
            | UserError::ChangePasswordFailed(source) => {
                // Storage detail stays in the logs
                error!(error = %source, code = self.code(), "{}", self);
                self.to_string()
            }
            UserError::PasswordHash(source) => {
                error!(error = %source, "password hashing failed");
                "internal error".to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(ErrorEnvelope::new(self.code(), message))).into_response()
    }
}
