use thiserror::Error;

/// Errors that can occur when interacting with a cart store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing storage could not be reached or failed mid-operation.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A write referenced an entity that does not exist.
    #[error("referential integrity violation: {0}")]
    Integrity(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
