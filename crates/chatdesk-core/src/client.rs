//! Main client state container
//!
//! Owns the registry, the conversation flow and the local settings store.
//! Front ends only render what the client pushes to their `Surface`.

use std::sync::Arc;

use chatdesk_gateway::{Gateway, HttpGateway, QueryMode};
use chatdesk_session::{
    Confirm, ConversationController, Removal, SessionManager, Submission, Surface,
};
use chatdesk_storage::{Database, SessionPointer};

use crate::config::Config;
use crate::Result;

const QUERY_MODE_KEY: &str = "query_mode";

pub struct Client {
    config: Config,
    db: Database,
    sessions: SessionManager,
    conversation: ConversationController,
    mode: QueryMode,
}

impl Client {
    /// Open the settings database and connect to the configured backend.
    pub fn new(config: Config, surface: Arc<dyn Surface>, confirm: Arc<dyn Confirm>) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;
        let gateway = Arc::new(HttpGateway::new(&config.base_url)?);

        Ok(Self::with_parts(config, db, gateway, surface, confirm))
    }

    pub fn with_parts(
        config: Config,
        db: Database,
        gateway: Arc<dyn Gateway>,
        surface: Arc<dyn Surface>,
        confirm: Arc<dyn Confirm>,
    ) -> Self {
        let sessions = SessionManager::new(
            Arc::clone(&gateway),
            SessionPointer::new(db.clone()),
            Arc::clone(&surface),
            confirm,
        );
        let conversation = ConversationController::new(sessions.clone(), gateway, surface)
            .with_persist_exchanges(config.persist_exchanges);
        let mode = config.default_mode;

        Self {
            config,
            db,
            sessions,
            conversation,
            mode,
        }
    }

    /// Restore the stored query mode and load the session list.
    ///
    /// The stored mode is best effort; any problem with it keeps
    /// `config.default_mode`.
    pub async fn initialize(&mut self) -> Result<()> {
        match self.db.get_setting(QUERY_MODE_KEY) {
            Ok(Some(stored)) => match stored.parse::<QueryMode>() {
                Ok(mode) => self.mode = mode,
                Err(e) => tracing::warn!(error = %e, "Ignoring stored query mode"),
            },
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Failed to read stored query mode"),
        }

        tracing::info!(base_url = %self.config.base_url, mode = %self.mode, "Starting client");

        self.sessions.bootstrap().await?;
        Ok(())
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn mode(&self) -> QueryMode {
        self.mode
    }

    /// Change the query mode and remember it for the next start.
    pub fn set_mode(&mut self, mode: QueryMode) -> Result<()> {
        self.db.set_setting(QUERY_MODE_KEY, mode.as_str())?;
        self.mode = mode;
        Ok(())
    }

    pub async fn send(&self, text: &str) -> Submission {
        self.conversation.submit(text, self.mode).await
    }

    pub async fn create_session(&self, name: &str) -> Result<()> {
        Ok(self.sessions.create(name).await?)
    }

    pub async fn switch_session(&self, id: &str) -> Result<()> {
        Ok(self.sessions.switch(id).await?)
    }

    pub async fn rename_session(&self, old_id: &str, new_name: &str) -> Result<()> {
        Ok(self.sessions.rename(old_id, new_name).await?)
    }

    pub async fn delete_session(&self, id: &str) -> Result<Removal> {
        Ok(self.sessions.remove(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chatdesk_session::{Entry, GREETING};
    use parking_lot::Mutex;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Default)]
    struct Screen {
        list: Mutex<Vec<String>>,
        rows: Mutex<Vec<Entry>>,
    }

    impl Surface for Screen {
        fn render_sessions(&self, sessions: &[String], _active: Option<&str>) {
            *self.list.lock() = sessions.to_vec();
        }
        fn mark_active(&self, _id: &str) {}
        fn clear_transcript(&self) {
            self.rows.lock().clear();
        }
        fn append(&self, entry: Entry) {
            self.rows.lock().push(entry);
        }
        fn scroll_to_latest(&self) {}
        fn clear_input(&self) {}
        fn alert(&self, _message: &str) {}
    }

    struct Yes;

    #[async_trait]
    impl Confirm for Yes {
        async fn confirm(&self, _prompt: &str) -> bool {
            true
        }
    }

    fn client(server: &MockServer, db: Database, screen: Arc<Screen>) -> Client {
        let mut config = Config::new(std::path::PathBuf::from("/unused"));
        config.base_url = server.uri();
        let gateway = Arc::new(HttpGateway::new(server.uri()).unwrap());
        Client::with_parts(config, db, gateway, screen, Arc::new(Yes))
    }

    #[tokio::test]
    async fn test_restart_restores_last_session_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/list_sessions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "sessions": ["rome", "oslo"] })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/load_session/oslo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "messages": [{ "user_message": "cold?", "bot_response": "Very." }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/load_session/rome"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let db = Database::open_in_memory().unwrap();

        let screen = Arc::new(Screen::default());
        let mut first = client(&server, db.clone(), screen.clone());
        first.initialize().await.unwrap();
        first.switch_session("oslo").await.unwrap();
        first.set_mode(QueryMode::Rag).unwrap();

        let screen = Arc::new(Screen::default());
        let mut second = client(&server, db, screen.clone());
        second.initialize().await.unwrap();

        assert_eq!(second.mode(), QueryMode::Rag);
        assert_eq!(second.sessions().active_session().as_deref(), Some("oslo"));
        assert_eq!(*screen.list.lock(), vec!["rome", "oslo"]);
        assert_eq!(
            *screen.rows.lock(),
            vec![Entry::User("cold?".into()), Entry::Bot("Very.".into())]
        );

        second.switch_session("rome").await.unwrap();
        assert_eq!(*screen.rows.lock(), vec![Entry::Bot(GREETING.into())]);
    }

    #[tokio::test]
    async fn test_unreadable_mode_setting_still_bootstraps() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/list_sessions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sessions": ["rome"] })))
            .mount(&server)
            .await;

        let db = Database::open_in_memory().unwrap();
        db.with_connection(|conn| {
            conn.execute_batch("DROP TABLE settings")?;
            Ok(())
        })
        .unwrap();

        let mut config = Config::new(std::path::PathBuf::from("/unused"));
        config.base_url = server.uri();
        config.default_mode = QueryMode::Rag;
        let gateway = Arc::new(HttpGateway::new(server.uri()).unwrap());
        let screen = Arc::new(Screen::default());
        let mut client = Client::with_parts(config, db, gateway, screen.clone(), Arc::new(Yes));

        client.initialize().await.unwrap();

        assert_eq!(client.mode(), QueryMode::Rag);
        assert_eq!(client.sessions().sessions(), vec!["rome"]);
        assert_eq!(*screen.list.lock(), vec!["rome"]);
    }

    #[tokio::test]
    async fn test_send_uses_current_mode() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .and(body_json(json!({ "question": "hi", "mode": "rag" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "text_response": "hello" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let screen = Arc::new(Screen::default());
        let mut client = client(&server, Database::open_in_memory().unwrap(), screen.clone());
        client.set_mode(QueryMode::Rag).unwrap();

        let outcome = client.send("hi").await;

        assert!(matches!(outcome, Submission::Replied(_)));
        assert_eq!(
            *screen.rows.lock(),
            vec![Entry::User("hi".into()), Entry::Bot("hello".into())]
        );
    }
}
