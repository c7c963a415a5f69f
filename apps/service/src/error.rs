use thiserror::Error;

/// Errors raised by monitor stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Monitor not found: {0}")]
    NotFound(String),

    #[error("Monitor already exists: {0}")]
    Conflict(String),

    #[error("Database query failed: {0}")]
    Backend(#[from] libsql::Error),

    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors surfaced by the exposed monitor operations
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Monitor not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(_) => ServiceError::NotFound,
            StoreError::Conflict(id) => {
                ServiceError::BadRequest(format!("Monitor already exists: {id}"))
            }
            other => ServiceError::Store(other),
        }
    }
}
