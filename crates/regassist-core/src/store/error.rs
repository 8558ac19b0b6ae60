//! Record store error types

use thiserror::Error;

/// Errors that can occur while reading or writing the store file
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("Unexpected header in {path}: expected Name,email,dob, found {found}")]
    HeaderMismatch { path: String, found: String },
}

pub type StoreResult<T> = Result<T, StoreError>;
