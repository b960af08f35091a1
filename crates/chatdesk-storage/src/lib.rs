//! Chatdesk Storage Layer
//!
//! SQLite-backed key-value settings. The only value the session core keeps
//! durably is the pointer to the last used session; transcripts live on the
//! backend.

mod database;
mod error;
mod migrations;
mod pointer;

pub use database::Database;
pub use error::StorageError;
pub use pointer::{SessionPointer, LAST_USED_SESSION_KEY};

pub type Result<T> = std::result::Result<T, StorageError>;
