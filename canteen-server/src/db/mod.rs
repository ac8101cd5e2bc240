//! Embedded database layer

pub mod storage;

pub use storage::{Storage, StorageError, StorageResult};

use shared::AppError;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err.to_string())
    }
}
