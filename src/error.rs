use std::path::PathBuf;

use crate::security::EndpointRejection;

#[derive(Debug, thiserror::Error)]
pub enum IslandHookError {
    #[error("invalid hook input: {reason}")]
    InvalidInput { reason: String },

    #[error("endpoint rejected: {0}")]
    EndpointRejected(#[from] EndpointRejection),

    #[error("no usable credential")]
    CredentialUnavailable,

    #[error("config parse error in {path}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    #[error("ipc error: {reason}")]
    Ipc { reason: String },

    #[error("authority timeout after {timeout_secs}s")]
    AuthorityTimeout { timeout_secs: u64 },

    #[error("message exceeds {limit} bytes")]
    MessageTooLarge { limit: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, IslandHookError>;
