//! Slash commands typed at the prompt
//!
//! - `/new <name>` : create a session
//! - `/switch <name>` : open a session
//! - `/rename <new>` or `/rename <old> -> <new>` : rename a session
//! - `/delete [name]` : delete a session (default: the open one)
//! - `/list` : show sessions
//! - `/mode [agent|rag]` : show or change the query mode
//! - `/quit`
//!
//! Anything else is a message for the bot.

use chatdesk_core::QueryMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    New(String),
    Switch(String),
    /// `None` old name means the active session
    Rename { old: Option<String>, new: String },
    Delete(Option<String>),
    List,
    Mode(Option<QueryMode>),
    Quit,
    /// Recognized command with bad arguments
    Usage(&'static str),
}

impl Command {
    /// Parse a command line; `None` if the input is a chat message.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        let without_prefix = input.strip_prefix('/')?;

        let mut parts = without_prefix.splitn(2, ' ');
        let command = parts.next()?.to_lowercase();
        let arg = parts
            .next()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let command = match command.as_str() {
            "new" | "n" => match arg {
                Some(name) => Command::New(name),
                None => Command::Usage("/new <name>"),
            },
            "switch" | "s" => match arg {
                Some(name) => Command::Switch(name),
                None => Command::Usage("/switch <name>"),
            },
            "rename" | "r" => match arg {
                Some(arg) => match arg.split_once("->") {
                    Some((old, new)) => Command::Rename {
                        old: Some(old.trim().to_string()),
                        new: new.trim().to_string(),
                    },
                    None => Command::Rename { old: None, new: arg },
                },
                None => Command::Usage("/rename <new> | /rename <old> -> <new>"),
            },
            "delete" | "d" => Command::Delete(arg),
            "list" | "ls" => Command::List,
            "mode" | "m" => match arg.map(|m| m.parse::<QueryMode>()) {
                None => Command::Mode(None),
                Some(Ok(mode)) => Command::Mode(Some(mode)),
                Some(Err(_)) => Command::Usage("/mode [agent|rag]"),
            },
            "quit" | "exit" | "q" => Command::Quit,
            _ => return None,
        };

        Some(command)
    }
}
