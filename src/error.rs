//! Error types for HeartLedger

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    /// Index, timestamp or payload refused by the block hashing gate.
    #[error("Invalid data provided to block")]
    InvalidBlockData,

    #[error("Invalid block linkage: previous hash does not match the chain tip")]
    InvalidBlockLinkage,

    #[error("Invalid block: {0}")]
    InvalidBlock(String),

    #[error("Invalid chain: {0}")]
    InvalidChain(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for ChainError {
    fn from(err: toml::de::Error) -> Self {
        ChainError::Config(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;
