use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum GeneralError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Rejections raised before anything reaches the store.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum ValidationError {
    #[error("Title is required")]
    MissingTitle,

    #[error("Content is required")]
    MissingContent,

    #[error("Category is required")]
    MissingCategory,

    #[error("Scheduled time {at} is in the past (now {now})")]
    ScheduleInPast {
        at: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    #[error("No articles selected")]
    EmptySelection,

    #[error("Category name is required")]
    MissingCategoryName,

    #[error("Invalid slug '{0}'")]
    InvalidSlug(String),

    #[error("Invalid color '{0}', expected #rrggbb")]
    InvalidColor(String),
}

#[derive(Error, Debug)]
pub enum ArticleError {
    #[error("Article with ID {0} not found")]
    NotFound(Uuid),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Error, Debug)]
pub enum CategoryError {
    #[error("Category with ID {0} not found")]
    NotFound(Uuid),

    #[error("Category with name or slug '{0}' already exists")]
    AlreadyExists(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Session missing or expired")]
    Unauthorized,

    #[error("Password hashing error: {0}")]
    Hash(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(err: argon2::password_hash::Error) -> Self {
        AuthError::Hash(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
        }
        _ => false,
    }
}
