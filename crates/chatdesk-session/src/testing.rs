//! In-crate fakes for the gateway and presentation seams.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use chatdesk_gateway::{Gateway, GatewayError, Message, QueryMode, SessionId};
use chatdesk_storage::{Database, SessionPointer};

use crate::manager::SessionManager;
use crate::surface::{Confirm, Entry, Surface};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Create(String),
    Delete(String),
    Rename(String, String),
    Load(String),
    Query(String, QueryMode),
    Persist(String, String, String),
}

/// Scripted backend. Unknown transcripts answer `NotFound`.
#[derive(Default)]
pub struct FakeGateway {
    calls: Mutex<Vec<Call>>,
    sessions: Mutex<Vec<SessionId>>,
    transcripts: Mutex<HashMap<SessionId, Vec<Message>>>,
    failures: Mutex<HashMap<&'static str, GatewayError>>,
    delays: Mutex<HashMap<String, Duration>>,
    reply: Mutex<String>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sessions(self, ids: &[&str]) -> Self {
        *self.sessions.lock() = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_transcript(self, id: &str, messages: Vec<Message>) -> Self {
        self.transcripts.lock().insert(id.to_string(), messages);
        self
    }

    pub fn with_reply(self, reply: &str) -> Self {
        *self.reply.lock() = reply.to_string();
        self
    }

    /// Make every call of `op` ("list", "create", ...) fail with `err`.
    pub fn failing(self, op: &'static str, err: GatewayError) -> Self {
        self.failures.lock().insert(op, err);
        self
    }

    /// Hold `op` calls for `target` for `delay` before answering.
    pub fn delayed(self, op: &str, target: &str, delay: Duration) -> Self {
        self.delays.lock().insert(format!("{op}:{target}"), delay);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| pred(c)).count()
    }

    async fn enter(&self, call: Call, op: &'static str, target: &str) -> Result<(), GatewayError> {
        self.calls.lock().push(call);

        let delay = self.delays.lock().get(&format!("{op}:{target}")).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.failures.lock().get(op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn list_sessions(&self) -> chatdesk_gateway::Result<Vec<SessionId>> {
        self.enter(Call::List, "list", "").await?;
        Ok(self.sessions.lock().clone())
    }

    async fn create_session(&self, name: &str) -> chatdesk_gateway::Result<()> {
        self.enter(Call::Create(name.to_string()), "create", name)
            .await
    }

    async fn delete_session(&self, id: &str) -> chatdesk_gateway::Result<()> {
        self.enter(Call::Delete(id.to_string()), "delete", id).await
    }

    async fn rename_session(&self, old_id: &str, new_name: &str) -> chatdesk_gateway::Result<()> {
        self.enter(
            Call::Rename(old_id.to_string(), new_name.to_string()),
            "rename",
            old_id,
        )
        .await
    }

    async fn load_transcript(&self, id: &str) -> chatdesk_gateway::Result<Vec<Message>> {
        self.enter(Call::Load(id.to_string()), "load", id).await?;
        self.transcripts
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("/load_session/{id}")))
    }

    async fn query(&self, question: &str, mode: QueryMode) -> chatdesk_gateway::Result<String> {
        self.enter(Call::Query(question.to_string(), mode), "query", question)
            .await?;
        Ok(self.reply.lock().clone())
    }

    async fn persist_exchange(
        &self,
        id: &str,
        user: &str,
        bot: &str,
    ) -> chatdesk_gateway::Result<()> {
        self.enter(
            Call::Persist(id.to_string(), user.to_string(), bot.to_string()),
            "persist",
            id,
        )
        .await
    }
}

/// Keeps what a real surface would be showing.
#[derive(Default)]
pub struct RecordingSurface {
    pub list: Mutex<Vec<SessionId>>,
    pub highlighted: Mutex<Option<SessionId>>,
    pub transcript: Mutex<Vec<Entry>>,
    pub alerts: Mutex<Vec<String>>,
    pub redraws: AtomicUsize,
    pub scrolls: AtomicUsize,
    pub input_clears: AtomicUsize,
}

impl RecordingSurface {
    pub fn entries(&self) -> Vec<Entry> {
        self.transcript.lock().clone()
    }
}

impl Surface for RecordingSurface {
    fn render_sessions(&self, sessions: &[SessionId], active: Option<&str>) {
        *self.list.lock() = sessions.to_vec();
        *self.highlighted.lock() = active.map(str::to_string);
        self.redraws.fetch_add(1, Ordering::SeqCst);
    }

    fn mark_active(&self, id: &str) {
        *self.highlighted.lock() = Some(id.to_string());
    }

    fn clear_transcript(&self) {
        self.transcript.lock().clear();
    }

    fn append(&self, entry: Entry) {
        self.transcript.lock().push(entry);
    }

    fn scroll_to_latest(&self) {
        self.scrolls.fetch_add(1, Ordering::SeqCst);
    }

    fn clear_input(&self) {
        self.input_clears.fetch_add(1, Ordering::SeqCst);
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().push(message.to_string());
    }
}

/// Answers every prompt the same way and remembers the prompts.
pub struct FixedConfirm {
    answer: bool,
    pub prompts: Mutex<Vec<String>>,
}

impl FixedConfirm {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Confirm for FixedConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().push(prompt.to_string());
        self.answer
    }
}

pub struct Harness {
    pub manager: SessionManager,
    pub gateway: Arc<FakeGateway>,
    pub surface: Arc<RecordingSurface>,
    pub confirm: Arc<FixedConfirm>,
    pub pointer: SessionPointer,
}

pub fn harness(gateway: FakeGateway, answer: bool) -> Harness {
    let gateway = Arc::new(gateway);
    let surface = Arc::new(RecordingSurface::default());
    let confirm = Arc::new(FixedConfirm::new(answer));
    let pointer = SessionPointer::new(Database::open_in_memory().unwrap());

    let manager = SessionManager::new(
        gateway.clone(),
        pointer.clone(),
        surface.clone(),
        confirm.clone(),
    );

    Harness {
        manager,
        gateway,
        surface,
        confirm,
        pointer,
    }
}
