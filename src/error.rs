//! Error types for the Tariswap client

use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, TariswapError>;

#[derive(Debug, Error)]
pub enum TariswapError {
    #[error("HTTP request to wallet daemon failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON (de)serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Wallet daemon returned error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Transaction {transaction_id} rejected: {reason}")]
    TransactionRejected {
        transaction_id: String,
        reason: String,
    },

    #[error("Transaction {transaction_id} not finalized after {attempts} polls")]
    TransactionTimeout {
        transaction_id: String,
        attempts: u32,
    },

    #[error("Substate {id} is not a {expected}")]
    UnexpectedSubstate { id: String, expected: &'static str },

    #[error("No value at path {path}")]
    PathNotFound { path: String },

    #[error("Malformed path {path:?}, expected `$` or `$.a.b`")]
    InvalidPath { path: String },

    #[error("Value at {path} is not {expected}")]
    UnexpectedValue { path: String, expected: &'static str },

    #[error("Invalid {kind} address: {value:?}")]
    InvalidAddress { kind: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}
