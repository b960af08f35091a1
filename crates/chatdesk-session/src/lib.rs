//! Chatdesk Session Management
//!
//! - The registry is the single in-memory source of truth: display order,
//!   active session, and lazily loaded transcripts
//! - Only the pointer to the last used session is stored locally
//! - Create and rename apply locally before the backend confirms and are not
//!   rolled back on failure; delete waits for the backend
//! - Interleaved completions resolve last-response-wins

mod conversation;
mod error;
mod manager;
mod registry;
mod surface;

#[cfg(test)]
mod testing;

pub use conversation::{ConversationController, Submission};
pub use error::SessionError;
pub use manager::{Removal, SessionManager};
pub use registry::SessionRegistry;
pub use surface::{Confirm, Entry, Surface, ERROR_REPLY, GREETING, INVALID_NAME_ALERT};

pub use chatdesk_gateway::{Message, QueryMode, SessionId};

pub type Result<T> = std::result::Result<T, SessionError>;
