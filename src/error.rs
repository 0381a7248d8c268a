use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("could not encode stored record: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown display order `{0}` (expected `created` or `manual`)")]
    UnknownOrder(String),
    #[error("{name} must not be empty")]
    Empty { name: &'static str },
}
