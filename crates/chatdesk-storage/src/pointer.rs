//! Durable pointer to the last used session.
//!
//! Reads and writes are best-effort: a broken store must never interrupt a
//! session switch, so failures are logged and swallowed.

use crate::database::Database;

pub const LAST_USED_SESSION_KEY: &str = "last_used_session";

#[derive(Clone)]
pub struct SessionPointer {
    db: Database,
}

impl SessionPointer {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Last session name written, if any
    pub fn get(&self) -> Option<String> {
        match self.db.get_setting(LAST_USED_SESSION_KEY) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read last used session");
                None
            }
        }
    }

    pub fn set(&self, session: &str) {
        if let Err(e) = self.db.set_setting(LAST_USED_SESSION_KEY, session) {
            tracing::warn!(session = %session, error = %e, "Failed to store last used session");
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.db.delete_setting(LAST_USED_SESSION_KEY) {
            tracing::warn!(error = %e, "Failed to clear last used session");
        }
    }
}
