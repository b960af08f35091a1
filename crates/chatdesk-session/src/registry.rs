//! Session Registry
//!
//! Display order, active session and transcript cache. Every mutation keeps
//! two invariants: no duplicate ids in `order`, and `active` (if set) is one
//! of them.

use std::collections::HashMap;

use chatdesk_gateway::{Message, SessionId};

use crate::error::SessionError;
use crate::Result;

#[derive(Debug, Default, Clone)]
pub struct SessionRegistry {
    /// Display order, newest created first
    order: Vec<SessionId>,
    /// Transcripts loaded so far
    transcripts: HashMap<SessionId, Vec<Message>>,
    active: Option<SessionId>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sessions(&self) -> &[SessionId] {
        &self.order
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.order.iter().any(|s| s == id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Reject blank names and exact duplicates. `excluding` lets a rename
    /// keep its own current name.
    pub fn validate_name(&self, name: &str, excluding: Option<&str>) -> Result<()> {
        if name.trim().is_empty() {
            return Err(SessionError::InvalidName(name.to_string()));
        }

        let taken = self
            .order
            .iter()
            .any(|s| s == name && Some(s.as_str()) != excluding);
        if taken {
            return Err(SessionError::InvalidName(name.to_string()));
        }

        Ok(())
    }

    /// Replace everything with the backend's list. Duplicates keep their
    /// first position.
    pub fn replace_all(&mut self, sessions: Vec<SessionId>) {
        self.order.clear();
        self.transcripts.clear();
        self.active = None;

        for id in sessions {
            if !self.contains(&id) {
                self.order.push(id);
            }
        }
    }

    /// Insert a new session at the front.
    pub fn prepend(&mut self, name: &str) -> Result<()> {
        self.validate_name(name, None)?;
        self.order.insert(0, name.to_string());
        Ok(())
    }

    /// Rename in place. The cached transcript and active marker follow.
    pub fn relabel(&mut self, old_id: &str, new_name: &str) -> Result<()> {
        let index = self
            .order
            .iter()
            .position(|s| s == old_id)
            .ok_or_else(|| SessionError::NotFound(old_id.to_string()))?;
        self.validate_name(new_name, Some(old_id))?;

        if old_id == new_name {
            return Ok(());
        }

        self.order[index] = new_name.to_string();
        if let Some(messages) = self.transcripts.remove(old_id) {
            self.transcripts.insert(new_name.to_string(), messages);
        }
        if self.active.as_deref() == Some(old_id) {
            self.active = Some(new_name.to_string());
        }

        Ok(())
    }

    /// Drop a session and its transcript. Returns whether it was active.
    pub fn remove(&mut self, id: &str) -> bool {
        self.order.retain(|s| s != id);
        self.transcripts.remove(id);

        if self.active.as_deref() == Some(id) {
            self.active = None;
            true
        } else {
            false
        }
    }

    pub fn set_active(&mut self, id: &str) -> Result<()> {
        if !self.contains(id) {
            return Err(SessionError::NotFound(id.to_string()));
        }
        self.active = Some(id.to_string());
        Ok(())
    }

    pub fn transcript(&self, id: &str) -> Option<&[Message]> {
        self.transcripts.get(id).map(Vec::as_slice)
    }

    /// Cache a loaded transcript. Ignored for ids no longer registered.
    pub fn cache_transcript(&mut self, id: &str, messages: Vec<Message>) {
        if self.contains(id) {
            self.transcripts.insert(id.to_string(), messages);
        }
    }

    /// Append to a transcript that has already been loaded.
    pub fn append_message(&mut self, id: &str, message: Message) -> bool {
        match self.transcripts.get_mut(id) {
            Some(messages) => {
                messages.push(message);
                true
            }
            None => false,
        }
    }
}
