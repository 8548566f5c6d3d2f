use rusqlite::ErrorCode;
use thiserror::Error;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    /// UNIQUE, FOREIGN KEY or NOT NULL failure reported by SQLite.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("no fields to update")]
    EmptyChangeSet,
    #[error("storage is closed")]
    Closed,
    #[error("sqlite error: {0}")]
    Sqlite(rusqlite::Error),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(failure, message)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                let message = message.clone().unwrap_or_else(|| failure.to_string());
                StorageError::ConstraintViolation(message)
            }
            _ => StorageError::Sqlite(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::ffi;

    #[test]
    fn constraint_failures_are_classified() {
        let err = rusqlite::Error::SqliteFailure(
            ffi::Error::new(ffi::SQLITE_CONSTRAINT_UNIQUE),
            Some("UNIQUE constraint failed: Users.email".to_string()),
        );
        match StorageError::from(err) {
            StorageError::ConstraintViolation(msg) => {
                assert_eq!(msg, "UNIQUE constraint failed: Users.email")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn other_failures_stay_opaque() {
        let err = StorageError::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(matches!(err, StorageError::Sqlite(_)));
    }
}
