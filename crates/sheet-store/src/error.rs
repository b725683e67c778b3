use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{collection}/{id} not found")]
    NotFound { collection: String, id: String },
    #[error("{collection}/{id} already exists")]
    AlreadyExists { collection: String, id: String },
    #[error("cannot move from {from} to {to}")]
    InvalidTransition { from: String, to: String },
    #[error("invalid object key {0:?}")]
    InvalidKey(String),
    #[error("{0}")]
    Invalid(String),
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
