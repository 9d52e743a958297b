use rusqlite::{ErrorCode, ffi};
use thiserror::Error;

/// Outcome of a failed write. The write has always been rolled back by the
/// time one of these is returned.
#[derive(Debug, Error)]
pub enum WriteError {
    /// A UNIQUE or PRIMARY KEY constraint rejected the row.
    #[error("conflict: {0}")]
    Conflict(String),

    /// NOT NULL, CHECK, FOREIGN KEY or datatype rules rejected the row.
    #[error("invalid row: {0}")]
    Invalid(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for WriteError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(failure, message) = &err {
            let detail = message.clone().unwrap_or_else(|| failure.to_string());
            match failure.code {
                ErrorCode::ConstraintViolation => {
                    return if matches!(
                        failure.extended_code,
                        ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                    ) {
                        WriteError::Conflict(detail)
                    } else {
                        WriteError::Invalid(detail)
                    };
                }
                ErrorCode::TypeMismatch => return WriteError::Invalid(detail),
                _ => {}
            }
        }
        WriteError::Internal(err.into())
    }
}
