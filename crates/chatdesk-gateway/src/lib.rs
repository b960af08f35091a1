//! Chatdesk Backend Gateway
//!
//! One method per remote operation of the chat backend. Every call is a single
//! request/response: nothing here retries, caches or times out on its own.

mod client;
mod error;
mod types;

pub use client::{Gateway, HttpGateway};
pub use error::GatewayError;
pub use types::{Message, QueryMode, SessionId};

pub type Result<T> = std::result::Result<T, GatewayError>;
