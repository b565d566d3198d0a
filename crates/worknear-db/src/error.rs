//! Database error types.

use thiserror::Error;

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// Unique index violation on the worker phone number.
    #[error("phone number already registered")]
    DuplicatePhone,

    #[error("server returned a non-ObjectId insert id")]
    UnexpectedInsertId,

    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),
}

/// True if the error is a duplicate-key write failure (code 11000).
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    match &*err.kind {
        ErrorKind::Write(WriteFailure::WriteError(we)) => we.code == 11000,
        ErrorKind::Command(ce) => ce.code == 11000,
        _ => false,
    }
}
