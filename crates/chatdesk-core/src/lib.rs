//! Chatdesk Core
//!
//! Wires storage, gateway and session management into one [`Client`] that a
//! front end drives. The front end supplies the [`Surface`] and [`Confirm`]
//! implementations; the client owns everything else.

mod client;
mod config;
mod error;

pub use client::Client;
pub use config::Config;
pub use error::CoreError;

// Re-export core components
pub use chatdesk_gateway::{Gateway, GatewayError, HttpGateway, Message, QueryMode, SessionId};
pub use chatdesk_session::{
    Confirm, ConversationController, Entry, Removal, SessionError, SessionManager, Submission,
    Surface, ERROR_REPLY, GREETING, INVALID_NAME_ALERT,
};
pub use chatdesk_storage::{Database, SessionPointer, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
