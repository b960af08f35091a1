//! Terminal rendering and input

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use chatdesk_core::{Confirm, Entry, SessionId, Surface};

/// Prints every change straight to stdout. Bot replies are shown as their
/// raw markdown.
pub struct TerminalSurface;

impl TerminalSurface {
    fn print(&self, text: &str) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{text}");
    }
}

impl Surface for TerminalSurface {
    fn render_sessions(&self, sessions: &[SessionId], active: Option<&str>) {
        if sessions.is_empty() {
            self.print("(no sessions, create one with /new <name>)");
            return;
        }

        self.print("Sessions:");
        for session in sessions {
            let marker = if Some(session.as_str()) == active { '*' } else { ' ' };
            self.print(&format!(" {marker} {session}"));
        }
    }

    fn mark_active(&self, id: &str) {
        self.print(&format!("── {id} ──"));
    }

    fn clear_transcript(&self) {
        self.print("");
    }

    fn append(&self, entry: Entry) {
        match entry {
            Entry::User(text) => self.print(&format!("you> {text}")),
            Entry::Bot(text) => self.print(&format!("bot> {text}")),
            Entry::Error(text) => self.print(&format!("bot! {text}")),
        }
    }

    fn scroll_to_latest(&self) {}

    fn clear_input(&self) {}

    fn alert(&self, message: &str) {
        eprintln!("! {message}");
    }
}

/// Shared stdin reader, used both by the prompt loop and by confirmations.
#[derive(Clone)]
pub struct Input {
    lines: Arc<Mutex<Lines<BufReader<Stdin>>>>,
}

impl Input {
    pub fn stdin() -> Self {
        Self {
            lines: Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines())),
        }
    }

    /// Next line, or `None` at end of input.
    pub async fn next_line(&self, prompt: &str) -> std::io::Result<Option<String>> {
        {
            let mut out = std::io::stdout().lock();
            write!(out, "{prompt}")?;
            out.flush()?;
        }
        self.lines.lock().await.next_line().await
    }
}

#[async_trait]
impl Confirm for Input {
    async fn confirm(&self, prompt: &str) -> bool {
        match self.next_line(&format!("{prompt} [y/N] ")).await {
            Ok(Some(answer)) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read confirmation");
                false
            }
        }
    }
}
