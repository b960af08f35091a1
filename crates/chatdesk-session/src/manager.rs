//! Session Manager
//!
//! Reconciles the in-memory registry with the backend and the durable
//! last-session pointer, and pushes every visible change to the surface.
//!
//! Local mutations that are optimistic happen before the request is sent;
//! mutations gated on the backend happen after it answers. No lock is held
//! across an `.await`, so overlapping operations interleave and whichever
//! completion lands last wins. A transcript load that finishes after its
//! session was removed still draws its rows, though nothing is cached.

use parking_lot::RwLock;
use std::sync::Arc;

use chatdesk_gateway::{Gateway, Message, SessionId};
use chatdesk_storage::SessionPointer;

use crate::error::SessionError;
use crate::registry::SessionRegistry;
use crate::surface::{Confirm, Entry, Surface, GREETING, INVALID_NAME_ALERT};
use crate::Result;

/// Outcome of [`SessionManager::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    /// The user answered "no"; nothing was sent or changed.
    Declined,
}

pub struct SessionManager {
    /// Registry state; this manager is its only writer
    state: Arc<RwLock<SessionRegistry>>,
    gateway: Arc<dyn Gateway>,
    pointer: SessionPointer,
    surface: Arc<dyn Surface>,
    confirm: Arc<dyn Confirm>,
}

impl SessionManager {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        pointer: SessionPointer,
        surface: Arc<dyn Surface>,
        confirm: Arc<dyn Confirm>,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionRegistry::new())),
            gateway,
            pointer,
            surface,
            confirm,
        }
    }

    /// Session names in display order
    pub fn sessions(&self) -> Vec<SessionId> {
        self.state.read().sessions().to_vec()
    }

    pub fn active_session(&self) -> Option<SessionId> {
        self.state.read().active().map(str::to_string)
    }

    /// Cached transcript, if it has been loaded
    pub fn transcript(&self, id: &str) -> Option<Vec<Message>> {
        self.state.read().transcript(id).map(<[Message]>::to_vec)
    }

    pub(crate) fn record_exchange(&self, id: &str, message: Message) {
        if !self.state.write().append_message(id, message) {
            tracing::debug!(session = %id, "Transcript not cached, exchange not recorded locally");
        }
    }

    /// Replace the registry with the backend's session list and restore the
    /// last used session if it still exists.
    pub async fn bootstrap(&self) -> Result<()> {
        let sessions = match self.gateway.list_sessions().await {
            Ok(sessions) => sessions,
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch sessions");
                return Err(e.into());
            }
        };

        self.state.write().replace_all(sessions);
        self.redraw();

        let count = self.state.read().len();
        tracing::info!(count, "Loaded sessions");

        let Some(last) = self.pointer.get() else {
            return Ok(());
        };

        let known = self.state.read().contains(&last);
        if known {
            self.switch(&last).await
        } else {
            tracing::debug!(session = %last, "Last used session no longer exists");
            Ok(())
        }
    }

    /// Add a session at the top of the list, then save it on the backend.
    ///
    /// The list entry stays even if the backend rejects it.
    pub async fn create(&self, name: &str) -> Result<()> {
        let name = name.trim();

        let inserted = self.state.write().prepend(name);
        if let Err(e) = inserted {
            self.surface.alert(INVALID_NAME_ALERT);
            return Err(e);
        }
        self.redraw();

        if let Err(e) = self.gateway.create_session(name).await {
            tracing::error!(session = %name, error = %e, "Failed to save session");
            return Err(e.into());
        }

        tracing::info!(session = %name, "Created session");

        self.switch(name).await?;
        self.pointer.set(name);
        Ok(())
    }

    /// Delete a session after the user confirms and the backend agrees.
    pub async fn remove(&self, id: &str) -> Result<Removal> {
        let known = self.state.read().contains(id);
        if !known {
            return Err(SessionError::NotFound(id.to_string()));
        }

        let prompt = format!("Are you sure you want to delete the session \"{id}\"?");
        if !self.confirm.confirm(&prompt).await {
            return Ok(Removal::Declined);
        }

        if let Err(e) = self.gateway.delete_session(id).await {
            tracing::error!(session = %id, error = %e, "Failed to delete session");
            return Err(e.into());
        }

        let was_active = self.state.write().remove(id);
        self.redraw();

        if was_active {
            self.surface.clear_input();
            self.surface.clear_transcript();
            self.pointer.clear();
        }

        tracing::info!(session = %id, was_active, "Deleted session");

        Ok(Removal::Removed)
    }

    /// Relabel a session in place, then rename it on the backend.
    ///
    /// Like `create`, the local relabel is kept if the backend fails.
    pub async fn rename(&self, old_id: &str, new_name: &str) -> Result<()> {
        let new_name = new_name.trim();

        let relabeled = self.state.write().relabel(old_id, new_name);
        if let Err(e) = relabeled {
            if matches!(e, SessionError::InvalidName(_)) {
                self.surface.alert(INVALID_NAME_ALERT);
            }
            return Err(e);
        }
        self.redraw();

        if let Err(e) = self.gateway.rename_session(old_id, new_name).await {
            tracing::error!(
                old = %old_id,
                new = %new_name,
                error = %e,
                "Failed to rename session"
            );
            return Err(e.into());
        }

        tracing::info!(old = %old_id, new = %new_name, "Renamed session");

        self.switch(new_name).await?;
        self.pointer.set(new_name);
        Ok(())
    }

    /// Make `id` the active session and load its transcript.
    ///
    /// A transcript that cannot be loaded is replaced by a greeting. The
    /// pointer is written either way.
    pub async fn switch(&self, id: &str) -> Result<()> {
        {
            let mut state = self.state.write();
            if state.active() == Some(id) {
                return Ok(());
            }
            state.set_active(id)?;
        }

        self.surface.clear_transcript();
        self.surface.mark_active(id);
        self.pointer.set(id);

        tracing::info!(session = %id, "Switched to session");

        match self.gateway.load_transcript(id).await {
            Ok(messages) => {
                for message in &messages {
                    self.surface.append(Entry::User(message.user.clone()));
                    self.surface.append(Entry::Bot(message.bot.clone()));
                }
                self.surface.scroll_to_latest();
                self.state.write().cache_transcript(id, messages);
            }
            Err(e) => {
                if e.is_not_found() {
                    // The backend has no stored exchanges for it yet
                    tracing::debug!(session = %id, "No stored transcript");
                    self.state.write().cache_transcript(id, Vec::new());
                } else {
                    tracing::warn!(session = %id, error = %e, "Failed to load session");
                }
                self.surface.append(Entry::Bot(GREETING.to_string()));
            }
        }

        Ok(())
    }

    fn redraw(&self) {
        let (sessions, active) = {
            let state = self.state.read();
            (
                state.sessions().to_vec(),
                state.active().map(str::to_string),
            )
        };
        self.surface.render_sessions(&sessions, active.as_deref());
    }
}

impl Clone for SessionManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            gateway: Arc::clone(&self.gateway),
            pointer: self.pointer.clone(),
            surface: Arc::clone(&self.surface),
            confirm: Arc::clone(&self.confirm),
        }
    }
}
