use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Invalid environment variable value: {0}")]
    InvalidEnvVar(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Server error ({status_code}): {message}")]
    ServerError { status_code: u16, message: String },

    #[error("RPC error ({code}): {message}")]
    Rpc { code: i64, message: String },

    #[error("RPC response carried neither result nor error")]
    EmptyRpcResult,

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid felt value: {0}")]
    InvalidFelt(String),
}

pub type Result<T> = std::result::Result<T, HistoryError>;
