//! Gateway trait and its HTTP implementation

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::GatewayError;
use crate::types::{
    Message, QueryMode, QueryRequest, QueryResponse, RenameRequest, SaveMessageRequest,
    SessionId, SessionList, SessionName, Transcript,
};
use crate::Result;

/// The remote operations the session core depends on.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// All session names known to the backend, in backend order.
    async fn list_sessions(&self) -> Result<Vec<SessionId>>;

    async fn create_session(&self, name: &str) -> Result<()>;

    async fn delete_session(&self, id: &str) -> Result<()>;

    async fn rename_session(&self, old_id: &str, new_name: &str) -> Result<()>;

    /// Stored exchanges of one session. An unknown or empty session is `NotFound`.
    async fn load_transcript(&self, id: &str) -> Result<Vec<Message>>;

    /// Ask the backend a question; returns the reply as markdown text.
    async fn query(&self, question: &str, mode: QueryMode) -> Result<String>;

    /// Append one exchange to the backend's durable transcript of `id`.
    async fn persist_exchange(&self, id: &str, user: &str, bot: &str) -> Result<()>;
}

/// `Gateway` over the backend's JSON HTTP API.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpGateway {
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl AsRef<str>, http: reqwest::Client) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { base_url, http })
    }

    /// Builds `base/segment/...`, percent-encoding each segment so session
    /// names containing `/`, `?` or spaces address a single path element.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let path = response.url().path().to_string();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".into());

        if status == StatusCode::NOT_FOUND {
            Err(GatewayError::NotFound(path))
        } else {
            Err(GatewayError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// A 2xx body that does not decode is reported as `Network`.
    async fn json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let response = Self::check(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn list_sessions(&self) -> Result<Vec<SessionId>> {
        let response = self
            .http
            .get(self.endpoint(&["list_sessions"]))
            .send()
            .await?;
        let list: SessionList = Self::json(response).await?;
        tracing::debug!(count = list.sessions.len(), "Listed sessions");
        Ok(list.sessions)
    }

    async fn create_session(&self, name: &str) -> Result<()> {
        let response = self
            .http
            .post(self.endpoint(&["save_session"]))
            .json(&SessionName { session_name: name })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete_session(&self, id: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.endpoint(&["delete_session", id]))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn rename_session(&self, old_id: &str, new_name: &str) -> Result<()> {
        let response = self
            .http
            .put(self.endpoint(&["rename_session", old_id]))
            .json(&RenameRequest {
                new_session_name: new_name,
            })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn load_transcript(&self, id: &str) -> Result<Vec<Message>> {
        let response = self
            .http
            .get(self.endpoint(&["load_session", id]))
            .send()
            .await?;
        let transcript: Transcript = Self::json(response).await?;
        Ok(transcript.messages)
    }

    async fn query(&self, question: &str, mode: QueryMode) -> Result<String> {
        let response = self
            .http
            .post(self.endpoint(&["query"]))
            .json(&QueryRequest { question, mode })
            .send()
            .await?;
        let reply: QueryResponse = Self::json(response).await?;
        Ok(reply.text_response)
    }

    async fn persist_exchange(&self, id: &str, user: &str, bot: &str) -> Result<()> {
        let response = self
            .http
            .post(self.endpoint(&["save_message"]))
            .json(&SaveMessageRequest {
                session_name: id,
                user_message: user,
                bot_response: bot,
            })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
