//! Presentation seams.
//!
//! The core pushes every visible change through [`Surface`] and never reads
//! back from it. Rendering details (markdown, layout, scrolling) belong to
//! the implementor.

use async_trait::async_trait;

use chatdesk_gateway::SessionId;

/// Shown in place of a transcript that could not be loaded.
pub const GREETING: &str = "Hi, What can I help you with today?";

/// Shown when a query fails.
pub const ERROR_REPLY: &str = "Error fetching response. Please try again.";

pub const INVALID_NAME_ALERT: &str = "Session name already exists or is invalid.";

/// One transcript row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// Plain text typed by the user
    User(String),
    /// Bot reply, markdown
    Bot(String),
    /// Bot-side failure notice, styled apart from replies
    Error(String),
}

pub trait Surface: Send + Sync {
    /// Redraw the session list in display order.
    fn render_sessions(&self, sessions: &[SessionId], active: Option<&str>);

    /// Highlight `id` and un-highlight every other list entry.
    fn mark_active(&self, id: &str);

    fn clear_transcript(&self);

    fn append(&self, entry: Entry);

    fn scroll_to_latest(&self);

    fn clear_input(&self);

    /// Blocking notice, e.g. a rejected session name.
    fn alert(&self, message: &str);
}

/// Yes/no decision point awaited before destructive operations.
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}
