//! Session error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session name already exists or is invalid: {0:?}")]
    InvalidName(String),

    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Backend error: {0}")]
    Gateway(#[from] chatdesk_gateway::GatewayError),
}
