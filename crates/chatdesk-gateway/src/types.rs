//! Domain and wire types for the chat backend

use serde::{Deserialize, Serialize};

/// User-chosen session name. Unique within the registry.
pub type SessionId = String;

/// One user/bot exchange. Transcripts are ordered by arrival.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "user_message")]
    pub user: String,
    #[serde(rename = "bot_response")]
    pub bot: String,
}

impl Message {
    pub fn new(user: impl Into<String>, bot: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            bot: bot.into(),
        }
    }
}

/// How the backend should answer a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// Tool-using agent
    #[default]
    Agent,
    /// Retrieval-augmented answer
    Rag,
}

impl QueryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryMode::Agent => "agent",
            QueryMode::Rag => "rag",
        }
    }
}

impl std::fmt::Display for QueryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for QueryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "agent" => Ok(QueryMode::Agent),
            "rag" => Ok(QueryMode::Rag),
            _ => Err(format!("Unknown query mode: {}", s)),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionList {
    pub sessions: Vec<SessionId>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SessionName<'a> {
    pub session_name: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RenameRequest<'a> {
    pub new_session_name: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Transcript {
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QueryRequest<'a> {
    pub question: &'a str,
    pub mode: QueryMode,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse {
    pub text_response: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SaveMessageRequest<'a> {
    pub session_name: &'a str,
    pub user_message: &'a str,
    pub bot_response: &'a str,
}
