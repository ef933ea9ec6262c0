//! Client-wide error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Contract interface error: {0}")]
    Abi(String),

    #[error("No wallet available")]
    WalletUnavailable,

    #[error("Wallet request rejected: {0}")]
    WalletRejected(String),

    #[error("Wallet returned no accounts")]
    NoAccounts,

    #[error("Contract call failed: {0}")]
    Contract(String),

    #[error("Could not decode contract response: {0}")]
    Decode(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Transaction 0x{0} was dropped before confirmation")]
    TransactionDropped(String),

    #[error("Transaction 0x{0} reverted")]
    TransactionReverted(String),

    #[error("{0}")]
    Auth(String),

    #[error("Backend responded with status {0}")]
    Backend(u16),
}

pub type Result<T> = std::result::Result<T, ClientError>;
