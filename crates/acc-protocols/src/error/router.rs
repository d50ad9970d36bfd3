//! Message router errors.

use thiserror::Error;

use super::StoreError;

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unknown message type: {0}")]
    UnknownType(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
