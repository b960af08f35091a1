//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] chatdesk_storage::StorageError),

    #[error("Backend error: {0}")]
    Gateway(#[from] chatdesk_gateway::GatewayError),

    #[error("Session error: {0}")]
    Session(#[from] chatdesk_session::SessionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    ConfigFile(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
