pub mod config;
pub mod fetch;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("{0}")]
    Core(#[from] pickup_core::PickupError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Credential store error: {0}")]
    Store(#[from] pickup_core::auth_store::StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CommandError>;
