//! Conversation Controller
//!
//! Sends one user message, waits for the bot, and shows both. The user row is
//! drawn before the request goes out, whatever the network does.

use std::sync::Arc;

use chatdesk_gateway::{Gateway, GatewayError, Message, QueryMode};

use crate::manager::SessionManager;
use crate::surface::{Entry, Surface, ERROR_REPLY};

/// Outcome of [`ConversationController::submit`].
#[derive(Debug)]
pub enum Submission {
    /// Blank input; nothing shown or sent
    Ignored,
    Replied(Message),
    /// The query failed and an error row was shown
    Failed(GatewayError),
}

pub struct ConversationController {
    sessions: SessionManager,
    gateway: Arc<dyn Gateway>,
    surface: Arc<dyn Surface>,
    /// Also store each exchange on the backend via `persist_exchange`
    persist_exchanges: bool,
}

impl ConversationController {
    pub fn new(
        sessions: SessionManager,
        gateway: Arc<dyn Gateway>,
        surface: Arc<dyn Surface>,
    ) -> Self {
        Self {
            sessions,
            gateway,
            surface,
            persist_exchanges: false,
        }
    }

    pub fn with_persist_exchanges(mut self, enabled: bool) -> Self {
        self.persist_exchanges = enabled;
        self
    }

    pub async fn submit(&self, raw: &str, mode: QueryMode) -> Submission {
        let question = raw.trim();
        if question.is_empty() {
            return Submission::Ignored;
        }

        // The exchange belongs to the session it was asked in
        let session = self.sessions.active_session();

        self.surface.append(Entry::User(question.to_string()));
        self.surface.clear_input();

        let reply = match self.gateway.query(question, mode).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(error = %e, %mode, "Failed to fetch response");
                self.surface.append(Entry::Error(ERROR_REPLY.to_string()));
                return Submission::Failed(e);
            }
        };

        self.surface.append(Entry::Bot(reply.clone()));
        self.surface.scroll_to_latest();

        let message = Message::new(question, reply);

        if let Some(session) = session {
            self.sessions.record_exchange(&session, message.clone());

            if self.persist_exchanges {
                if let Err(e) = self
                    .gateway
                    .persist_exchange(&session, &message.user, &message.bot)
                    .await
                {
                    tracing::warn!(session = %session, error = %e, "Failed to save message");
                }
            }
        }

        Submission::Replied(message)
    }
}
