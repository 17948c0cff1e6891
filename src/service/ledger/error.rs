use crate::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The store could not be read or written. Retrying the whole user action is safe.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] StorageError),
    #[error("Invalid user id: {0}")]
    InvalidUserId(String),
}
