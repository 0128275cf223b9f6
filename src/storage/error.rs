use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("invalid game mode '{0}'")]
    InvalidMode(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
